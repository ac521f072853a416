//! Inbound operation result shapes.
//!
//! Every public operation returns one of these values. Errors are rendered
//! into the `error`/`errors` fields rather than raised across the boundary,
//! so callers always branch on a value.

use std::fmt;

use sca_types::{AdhesionLine, LeaderId, LegalStatus, RejectionCause, SheetId};
use serde::{Deserialize, Serialize};

/// 1-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    /// Pages are clamped to 1; a zero page is treated as the first.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * self.page_size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
        }
    }
}

/// One line of input for the five-line save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdhesionLineInput {
    /// 1-based position; input at index `i` must carry `i + 1`.
    pub line: u8,
    pub citizen_dpi: Option<String>,
    pub citizen_name: Option<String>,
    /// Declared outcome; duplicate detection may override it.
    pub status: LegalStatus,
    pub cause: Option<RejectionCause>,
}

/// Result of a bulk sheet allocation.
#[derive(Debug, Clone, Serialize)]
pub struct AssignBulkResult {
    pub success: bool,
    pub created: u32,
    pub skipped: u32,
    pub errors: Vec<String>,
}

impl AssignBulkResult {
    /// Failure before any number was processed.
    pub(crate) fn rejected(message: String) -> Self {
        Self {
            success: false,
            created: 0,
            skipped: 0,
            errors: vec![message],
        }
    }
}

/// Result of a single mutation (custody transition, leader edit, ...).
#[derive(Debug, Clone, Serialize)]
pub struct MutationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl MutationResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn fail(error: impl fmt::Display) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Result of the five-line save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveAdhesionsResult {
    pub success: bool,
    pub error: Option<String>,
    /// Human-readable duplicate alerts; populated even on success.
    pub duplicate_alerts: Vec<String>,
}

/// Result of a ruling import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRulingsResult {
    /// True iff no row failed validation or writing; skipped rows do not
    /// affect it.
    pub success: bool,
    pub error: Option<String>,
    pub updated: u32,
    pub skipped: u32,
    pub invalid_rows: Vec<String>,
}

/// Sheet resolved by number together with its five lines.
#[derive(Debug, Clone, Serialize)]
pub struct SheetLinesResult {
    pub sheet_id: Option<SheetId>,
    pub lines: Option<Vec<AdhesionLine>>,
    pub error: Option<String>,
}

/// Envelope for single-payload reads.
#[derive(Debug, Clone, Serialize)]
pub struct DataResult<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> DataResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl fmt::Display) -> Self {
        Self {
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Paginated report payload.
///
/// `data` is `None` when the caller failed the role check and `Some` (often
/// empty) otherwise, mirroring the distinction between "may not ask" and
/// "asked and got nothing".
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Option<Vec<T>>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub error: Option<String>,
}

impl<T> Paginated<T> {
    pub fn ok(data: Vec<T>, total: u64, page: Page) -> Self {
        Self {
            data: Some(data),
            total,
            page: page.page,
            page_size: page.page_size,
            error: None,
        }
    }

    pub fn denied(error: impl fmt::Display, page: Page) -> Self {
        Self {
            data: None,
            total: 0,
            page: page.page,
            page_size: page.page_size,
            error: Some(error.to_string()),
        }
    }

    /// Store failure after the role check: empty data plus the message.
    pub fn failed(error: impl fmt::Display, page: Page) -> Self {
        Self {
            data: Some(Vec::new()),
            total: 0,
            page: page.page,
            page_size: page.page_size,
            error: Some(error.to_string()),
        }
    }
}

/// Leaderboard row for one active leader.
#[derive(Debug, Clone, Serialize)]
pub struct TopPerformerRow {
    pub leader_id: LeaderId,
    pub name: String,
    pub zone: Option<String>,
    pub accepted: u64,
    pub rejected: u64,
    pub tse_review: u64,
    pub effectiveness: f64,
    pub sheets_assigned: u64,
    pub sheets_received: u64,
    pub compliance: f64,
}

/// Fraud alert row for one active leader.
#[derive(Debug, Clone, Serialize)]
pub struct FraudAlertRow {
    pub leader_id: LeaderId,
    pub name: String,
    pub zone: Option<String>,
    pub total_rejected: u64,
    pub fraud_cause_rejected: u64,
    pub fraud_cause_percentage: f64,
}

/// KPI set for a single leader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderKpis {
    pub sheets_assigned: u64,
    pub sheets_received: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub tse_review: u64,
    pub effectiveness: f64,
    pub compliance: f64,
}

/// One bucket of a dashboard breakdown, keyed by the raw enum keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Global dashboard counters.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardKpis {
    pub active_leaders: u64,
    pub sheets_assigned: u64,
    pub sheets_received: u64,
    pub total_adhesions: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub pending: u64,
    pub global_effectiveness: f64,
}

/// Dashboard summary: counters plus per-keyword breakdowns. Every stored
/// row is counted under its literal keyword; none is dropped.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub kpis: DashboardKpis,
    pub adhesions_by_status: Vec<StatusCount>,
    pub sheets_by_state: Vec<StatusCount>,
}
