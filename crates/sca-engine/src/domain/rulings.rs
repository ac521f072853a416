//! Ruling-table parsing.
//!
//! Tribunal rulings arrive as a text blob: one row per line, fields
//! separated by commas or tabs, optional double-quoted fields, optional
//! header row. Columns in order: sheet number, line position (1-5), status
//! keyword, rejection-cause keyword (optional).
//!
//! Parsing is per-row: a malformed row is reported with its 1-based
//! physical row number and skipped; it never aborts the batch.

use sca_types::{LegalStatus, RejectionCause};

/// A validated ruling row ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulingRow {
    pub sheet_number: u64,
    pub line: u8,
    pub status: LegalStatus,
    pub cause: Option<RejectionCause>,
}

/// Outcome of parsing a ruling blob.
#[derive(Debug, Default)]
pub struct ParsedRulings {
    pub rows: Vec<RulingRow>,
    pub invalid_rows: Vec<String>,
}

/// Splits the blob into rows of trimmed cells.
///
/// Quote state toggles on every `"`; separators inside quotes are literal
/// characters. The quotes themselves are dropped.
pub fn split_rows(content: &str) -> Vec<Vec<String>> {
    content.trim().lines().map(split_cells).collect()
}

fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' | '\t' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Header heuristic: any cell starting with a letter, or a first cell
/// containing "hoja" or "numero" case-insensitively.
pub fn is_header(cells: &[String]) -> bool {
    cells
        .iter()
        .any(|c| c.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic()))
        || cells.first().is_some_and(|c| {
            let lower = c.to_lowercase();
            lower.contains("hoja") || lower.contains("numero")
        })
}

/// Uppercases a keyword and replaces each internal whitespace character
/// with an underscore, so "revision tse" matches "REVISION_TSE".
pub fn normalize_keyword(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Parses the blob into validated rows plus row-indexed messages for the
/// rows that failed validation.
///
/// Row numbers are 1-based over the physical rows, header included. An
/// absent or unrecognized cause keyword is null, never a row failure.
pub fn parse_rulings(content: &str) -> ParsedRulings {
    let rows = split_rows(content);
    let mut parsed = ParsedRulings::default();
    if rows.is_empty() {
        return parsed;
    }

    let start = if is_header(&rows[0]) { 1 } else { 0 };

    for (idx, cells) in rows.iter().enumerate().skip(start) {
        let row_no = idx + 1;
        let sheet_raw = cells.first().map(String::as_str).unwrap_or("");
        let line_raw = cells.get(1).map(String::as_str).unwrap_or("");
        let status_raw = cells.get(2).map(String::as_str).unwrap_or("");
        let cause_raw = cells.get(3).map(String::as_str).unwrap_or("");

        let sheet_number = match sheet_raw.parse::<u64>() {
            Ok(n) if n >= 1 => n,
            _ => {
                parsed
                    .invalid_rows
                    .push(format!("Fila {row_no}: número de hoja inválido"));
                continue;
            }
        };

        let line = match line_raw.parse::<u8>() {
            Ok(l) if (1..=5).contains(&l) => l,
            _ => {
                parsed
                    .invalid_rows
                    .push(format!("Fila {row_no}: línea debe ser 1-5"));
                continue;
            }
        };

        let status = match LegalStatus::from_keyword(&normalize_keyword(status_raw)) {
            Some(s) => s,
            None => {
                parsed
                    .invalid_rows
                    .push(format!("Fila {row_no}: estado inválido \"{status_raw}\""));
                continue;
            }
        };

        let cause = RejectionCause::from_keyword(&normalize_keyword(cause_raw));

        parsed.rows.push(RulingRow {
            sheet_number,
            line,
            status,
            cause,
        });
    }

    parsed
}
