//! Outbound store ports.
//!
//! The relational store is an external collaborator; the engine depends on
//! these traits only. Uniqueness and foreign-key constraints live behind
//! them and surface as [`StoreError`] values. No method retries: a failure
//! is reported to the caller attributed to the item being processed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sca_types::{
    Activity, AdhesionLine, Leader, LeaderId, LegalStatus, RejectionCause, Sheet, SheetId,
    SheetState, StoreResult,
};

use crate::ports::api::Page;

/// New leader row.
#[derive(Debug, Clone)]
pub struct NewLeader {
    pub name: String,
    pub zone: Option<String>,
    pub dpi: String,
    pub activity: Activity,
}

/// New sheet row.
#[derive(Debug, Clone)]
pub struct NewSheet {
    pub sheet_number: u64,
    pub leader_id: LeaderId,
    pub state: SheetState,
    pub assigned_at: DateTime<Utc>,
}

/// New adhesion-line row.
#[derive(Debug, Clone)]
pub struct NewAdhesionLine {
    pub sheet_id: SheetId,
    pub line: u8,
    pub citizen_dpi: Option<String>,
    pub citizen_name: Option<String>,
    pub status: LegalStatus,
    pub cause: Option<RejectionCause>,
}

/// Leader directory access.
#[async_trait]
pub trait LeaderStore: Send + Sync {
    /// Inserts a leader. DPI uniqueness is enforced by the store and
    /// surfaces as [`StoreError::Conflict`].
    async fn insert_leader(&self, leader: NewLeader) -> StoreResult<Leader>;

    async fn get_leader(&self, id: LeaderId) -> StoreResult<Option<Leader>>;

    /// Non-deleted leaders ordered by name, with the exact total count
    /// before pagination.
    async fn list_leaders(&self, page: Page) -> StoreResult<(Vec<Leader>, u64)>;

    /// Non-deleted leaders ordered by name, un-paginated.
    async fn list_all_leaders(&self) -> StoreResult<Vec<Leader>>;

    /// Active (non-deleted, activity = active) leaders ordered by name,
    /// with the exact total count before pagination.
    async fn list_active_leaders(&self, page: Page) -> StoreResult<(Vec<Leader>, u64)>;

    async fn count_active_leaders(&self) -> StoreResult<u64>;

    async fn update_leader(&self, leader: &Leader) -> StoreResult<()>;
}

/// Sheet table access.
#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn find_sheet_by_number(&self, sheet_number: u64) -> StoreResult<Option<Sheet>>;

    async fn get_sheet(&self, id: SheetId) -> StoreResult<Option<Sheet>>;

    /// Inserts a sheet. Sheet-number uniqueness and the owning-leader
    /// foreign key are enforced by the store.
    async fn insert_sheet(&self, sheet: NewSheet) -> StoreResult<Sheet>;

    async fn update_sheet(&self, sheet: &Sheet) -> StoreResult<()>;

    /// Compensation path for failed allocations; cascades to the sheet's
    /// lines.
    async fn delete_sheet(&self, id: SheetId) -> StoreResult<()>;

    async fn list_sheets_by_leader(&self, leader_id: LeaderId) -> StoreResult<Vec<Sheet>>;

    async fn list_all_sheets(&self) -> StoreResult<Vec<Sheet>>;
}

/// Adhesion-line table access.
#[async_trait]
pub trait AdhesionStore: Send + Sync {
    /// Inserts a batch of lines; on failure the caller compensates at the
    /// sheet level.
    async fn insert_lines(&self, lines: Vec<NewAdhesionLine>) -> StoreResult<()>;

    async fn insert_line(&self, line: NewAdhesionLine) -> StoreResult<AdhesionLine>;

    async fn update_line(&self, line: &AdhesionLine) -> StoreResult<()>;

    /// Lines of one sheet ordered by line position.
    async fn list_lines_by_sheet(&self, sheet_id: SheetId) -> StoreResult<Vec<AdhesionLine>>;

    async fn find_line(&self, sheet_id: SheetId, line: u8) -> StoreResult<Option<AdhesionLine>>;

    async fn list_lines_by_sheets(&self, sheet_ids: &[SheetId]) -> StoreResult<Vec<AdhesionLine>>;

    async fn list_all_lines(&self) -> StoreResult<Vec<AdhesionLine>>;

    /// Whether `dpi` already appears with a DPI-holding status (PENDIENTE
    /// or ACEPTADO) on a line of a sheet other than `exclude`.
    async fn dpi_active_elsewhere(&self, dpi: &str, exclude: SheetId) -> StoreResult<bool>;
}
