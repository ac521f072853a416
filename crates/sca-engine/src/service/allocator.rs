//! Bulk sheet allocation.

use std::sync::Arc;

use chrono::Utc;
use sca_types::{
    require_role, CallerContext, LeaderId, LeaderStatus, LegalStatus, Role, SheetState,
    LINES_PER_SHEET,
};

use crate::domain::{EngineError, EngineResult};
use crate::ports::{
    AdhesionStore, AssignBulkResult, LeaderStore, NewAdhesionLine, NewSheet, SheetStore,
};

/// Allocates contiguous blocks of numbered sheets to a leader, five blank
/// adhesion lines per sheet.
///
/// Allocation is best effort per sheet: a failing number is compensated by
/// deleting its sheet row, reported in `errors`, and the rest of the range
/// continues. There is no cross-sheet transaction.
pub struct SheetAllocator<S, A, L>
where
    S: SheetStore,
    A: AdhesionStore,
    L: LeaderStore,
{
    sheets: Arc<S>,
    adhesions: Arc<A>,
    leaders: Arc<L>,
}

impl<S, A, L> SheetAllocator<S, A, L>
where
    S: SheetStore,
    A: AdhesionStore,
    L: LeaderStore,
{
    pub fn new(sheets: Arc<S>, adhesions: Arc<A>, leaders: Arc<L>) -> Self {
        Self {
            sheets,
            adhesions,
            leaders,
        }
    }

    /// Creates every missing sheet in `[from, to]` for `leader_id`.
    ///
    /// Numbers that already exist are skipped. `success` is false iff any
    /// number failed. Requires the administrator role.
    pub async fn assign_bulk(
        &self,
        ctx: &CallerContext,
        leader_id: LeaderId,
        from: u64,
        to: u64,
    ) -> AssignBulkResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return AssignBulkResult::rejected(e.to_string());
        }
        if from > to {
            return AssignBulkResult::rejected(
                "El número inicial no puede ser mayor que el final.".to_string(),
            );
        }
        if let Err(e) = self.check_leader(leader_id).await {
            return AssignBulkResult::rejected(e.to_string());
        }

        let mut created = 0u32;
        let mut skipped = 0u32;
        let mut errors = Vec::new();

        for number in from..=to {
            match self.sheets.find_sheet_by_number(number).await {
                Ok(Some(_)) => {
                    skipped += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    errors.push(format!("Hoja {number}: {e}"));
                    continue;
                }
            }

            let sheet = match self
                .sheets
                .insert_sheet(NewSheet {
                    sheet_number: number,
                    leader_id,
                    state: SheetState::PendingDelivery,
                    assigned_at: Utc::now(),
                })
                .await
            {
                Ok(sheet) => sheet,
                Err(e) => {
                    errors.push(format!("Hoja {number}: {e}"));
                    continue;
                }
            };

            let blanks = (1..=LINES_PER_SHEET)
                .map(|line| NewAdhesionLine {
                    sheet_id: sheet.id,
                    line,
                    citizen_dpi: None,
                    citizen_name: None,
                    status: LegalStatus::Pending,
                    cause: None,
                })
                .collect();

            if let Err(e) = self.adhesions.insert_lines(blanks).await {
                errors.push(format!("Hoja {number}: error al crear adhesiones: {e}"));
                // Compensating delete, best effort; the line failure above
                // is the error of record for this number.
                let _ = self.sheets.delete_sheet(sheet.id).await;
                continue;
            }

            created += 1;
        }

        tracing::info!(
            %leader_id,
            from,
            to,
            created,
            skipped,
            errors = errors.len(),
            "bulk sheet assignment finished"
        );

        AssignBulkResult {
            success: errors.is_empty(),
            created,
            skipped,
            errors,
        }
    }

    async fn check_leader(&self, leader_id: LeaderId) -> EngineResult<()> {
        match self.leaders.get_leader(leader_id).await? {
            None => Err(EngineError::LeaderNotFound),
            Some(leader) => match leader.status {
                LeaderStatus::Active => Ok(()),
                LeaderStatus::Deleted { .. } => Err(EngineError::LeaderDeleted),
            },
        }
    }
}
