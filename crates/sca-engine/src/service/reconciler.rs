//! Ruling reconciliation.

use std::sync::Arc;

use sca_types::{require_role, CallerContext, Role};

use crate::domain::rulings::parse_rulings;
use crate::ports::{AdhesionStore, ImportRulingsResult, SheetStore};

/// Applies an externally produced ruling dataset to the stored adhesion
/// lines, matching rows by sheet number and line position.
///
/// Row failures are isolated: an invalid row or a failed write is reported
/// in `invalid_rows` and the remaining rows continue. Rows whose sheet or
/// line cannot be resolved only increment `skipped`.
pub struct RulingReconciler<S, A>
where
    S: SheetStore,
    A: AdhesionStore,
{
    sheets: Arc<S>,
    adhesions: Arc<A>,
}

impl<S, A> RulingReconciler<S, A>
where
    S: SheetStore,
    A: AdhesionStore,
{
    pub fn new(sheets: Arc<S>, adhesions: Arc<A>) -> Self {
        Self { sheets, adhesions }
    }

    /// Imports a tabular ruling blob. Requires the administrator or
    /// data-entry role.
    pub async fn import_rulings(&self, ctx: &CallerContext, content: &str) -> ImportRulingsResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator, Role::DataEntry]) {
            return ImportRulingsResult {
                success: false,
                error: Some(e.to_string()),
                updated: 0,
                skipped: 0,
                invalid_rows: Vec::new(),
            };
        }

        if content.trim().is_empty() {
            return ImportRulingsResult {
                success: false,
                error: Some("El archivo CSV está vacío.".to_string()),
                updated: 0,
                skipped: 0,
                invalid_rows: Vec::new(),
            };
        }

        let parsed = parse_rulings(content);
        let mut invalid_rows = parsed.invalid_rows;
        let mut updated = 0u32;
        let mut skipped = 0u32;

        for row in parsed.rows {
            // Unresolved rows are data for sheets this system never
            // allocated; they are counted, not reported.
            let sheet = match self.sheets.find_sheet_by_number(row.sheet_number).await {
                Ok(Some(sheet)) => sheet,
                _ => {
                    skipped += 1;
                    continue;
                }
            };
            let mut line = match self.adhesions.find_line(sheet.id, row.line).await {
                Ok(Some(line)) => line,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            line.status = row.status;
            line.cause = if row.status.is_rejection() {
                row.cause
            } else {
                None
            };

            if let Err(e) = self.adhesions.update_line(&line).await {
                invalid_rows.push(format!(
                    "Hoja {} línea {}: {e}",
                    row.sheet_number, row.line
                ));
                continue;
            }
            updated += 1;
        }

        if !invalid_rows.is_empty() {
            tracing::warn!(invalid = invalid_rows.len(), "ruling import had invalid rows");
        }
        tracing::info!(updated, skipped, "ruling import finished");

        ImportRulingsResult {
            success: invalid_rows.is_empty(),
            error: None,
            updated,
            skipped,
            invalid_rows,
        }
    }
}
