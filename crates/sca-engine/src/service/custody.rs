//! Physical custody transitions.

use std::sync::Arc;

use chrono::Utc;
use sca_types::{
    require_role, CallerContext, LeaderId, LeaderStatus, Role, SheetId, SheetState,
};

use crate::domain::{EngineError, EngineResult};
use crate::ports::{LeaderStore, MutationResult, SheetStore};

/// Advances sheets through the physical custody lifecycle.
///
/// The only guarded transition is reception (CIRCULACION → RECIBIDA); the
/// external states EN_TSE and PROCESADA are reachable only through the
/// administrative override.
pub struct CustodyService<S, L>
where
    S: SheetStore,
    L: LeaderStore,
{
    sheets: Arc<S>,
    leaders: Arc<L>,
}

impl<S, L> CustodyService<S, L>
where
    S: SheetStore,
    L: LeaderStore,
{
    pub fn new(sheets: Arc<S>, leaders: Arc<L>) -> Self {
        Self { sheets, leaders }
    }

    /// Marks a circulating sheet as physically received and stamps the
    /// reception time. Any other current state is reported and nothing is
    /// mutated. Requires the administrator role.
    pub async fn receive_sheet(&self, ctx: &CallerContext, sheet_number: u64) -> MutationResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return MutationResult::fail(e);
        }
        match self.receive_inner(sheet_number).await {
            Ok(()) => MutationResult::ok(),
            Err(e) => MutationResult::fail(e),
        }
    }

    async fn receive_inner(&self, sheet_number: u64) -> EngineResult<()> {
        let mut sheet = self
            .sheets
            .find_sheet_by_number(sheet_number)
            .await?
            .ok_or(EngineError::SheetNotFound)?;

        if sheet.state != SheetState::Circulation {
            return Err(EngineError::NotInCirculation {
                current: sheet.state,
            });
        }

        sheet.state = SheetState::Received;
        sheet.received_at = Some(Utc::now());
        self.sheets.update_sheet(&sheet).await?;

        tracing::info!(sheet_number, "sheet received");
        Ok(())
    }

    /// Administrative override: sets any custody state directly and may
    /// reassign the owning leader. Stamps the reception time whenever the
    /// target state is RECIBIDA. Requires the administrator role.
    pub async fn override_sheet(
        &self,
        ctx: &CallerContext,
        sheet_id: SheetId,
        new_state: SheetState,
        new_leader: Option<LeaderId>,
    ) -> MutationResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return MutationResult::fail(e);
        }
        match self.override_inner(sheet_id, new_state, new_leader).await {
            Ok(()) => MutationResult::ok(),
            Err(e) => MutationResult::fail(e),
        }
    }

    async fn override_inner(
        &self,
        sheet_id: SheetId,
        new_state: SheetState,
        new_leader: Option<LeaderId>,
    ) -> EngineResult<()> {
        let mut sheet = self
            .sheets
            .get_sheet(sheet_id)
            .await?
            .ok_or(EngineError::SheetNotFound)?;

        if let Some(leader_id) = new_leader {
            match self.leaders.get_leader(leader_id).await? {
                None => return Err(EngineError::LeaderNotFound),
                Some(leader) => match leader.status {
                    LeaderStatus::Active => sheet.leader_id = leader_id,
                    LeaderStatus::Deleted { .. } => return Err(EngineError::LeaderDeleted),
                },
            }
        }

        sheet.state = new_state;
        if new_state == SheetState::Received {
            sheet.received_at = Some(Utc::now());
        }
        self.sheets.update_sheet(&sheet).await?;

        tracing::info!(
            sheet_number = sheet.sheet_number,
            state = %new_state,
            "sheet state overridden"
        );
        Ok(())
    }
}
