//! Leader directory.

use std::sync::Arc;

use chrono::Utc;
use sca_types::{
    require_role, Activity, CallerContext, Leader, LeaderId, LeaderStatus, Role, StoreError,
};

use crate::domain::{EngineError, EngineResult};
use crate::ports::{DataResult, LeaderStore, MutationResult, NewLeader, Page, Paginated};

const READ_ROLES: [Role; 3] = [Role::Administrator, Role::DataEntry, Role::Auditor];

/// Creates, lists, edits, and soft-deletes leaders.
///
/// Leaders are never hard-deleted: a delete stamps
/// [`LeaderStatus::Deleted`] and the record drops out of listings while its
/// sheets keep their history.
pub struct LeaderDirectory<L>
where
    L: LeaderStore,
{
    leaders: Arc<L>,
}

impl<L> LeaderDirectory<L>
where
    L: LeaderStore,
{
    pub fn new(leaders: Arc<L>) -> Self {
        Self { leaders }
    }

    /// Registers a leader. Inputs are trimmed; a blank zone is null.
    /// Requires the administrator role.
    pub async fn create_leader(
        &self,
        ctx: &CallerContext,
        name: &str,
        zone: &str,
        dpi: &str,
    ) -> MutationResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return MutationResult::fail(e);
        }

        let zone = zone.trim();
        let new = NewLeader {
            name: name.trim().to_string(),
            zone: (!zone.is_empty()).then(|| zone.to_string()),
            dpi: dpi.trim().to_string(),
            activity: Activity::Active,
        };

        match self.leaders.insert_leader(new).await {
            Ok(leader) => {
                tracing::info!(leader_id = %leader.id, "leader created");
                MutationResult::ok()
            }
            Err(StoreError::Conflict { .. }) => {
                MutationResult::fail("Ya existe un líder con ese DPI.")
            }
            Err(e) => MutationResult::fail(e),
        }
    }

    /// Paginated directory listing ordered by name; soft-deleted leaders
    /// are excluded. Requires any read role.
    pub async fn list_leaders(&self, ctx: &CallerContext, page: Page) -> Paginated<Leader> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return Paginated::denied(e, page);
        }
        match self.leaders.list_leaders(page).await {
            Ok((rows, total)) => Paginated::ok(rows, total, page),
            Err(e) => Paginated::denied(e, page),
        }
    }

    /// Un-paginated listing for selection lists. Requires any read role.
    pub async fn list_all_leaders(&self, ctx: &CallerContext) -> DataResult<Vec<Leader>> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return DataResult::fail(e);
        }
        match self.leaders.list_all_leaders().await {
            Ok(rows) => DataResult::ok(rows),
            Err(e) => DataResult::fail(e),
        }
    }

    /// Edits name, zone, and activity. A soft-deleted leader rejects any
    /// further edit. Requires the administrator role.
    pub async fn update_leader(
        &self,
        ctx: &CallerContext,
        id: LeaderId,
        name: &str,
        zone: &str,
        activity: Activity,
    ) -> MutationResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return MutationResult::fail(e);
        }
        match self.update_inner(id, name, zone, activity).await {
            Ok(()) => MutationResult::ok(),
            Err(e) => MutationResult::fail(e),
        }
    }

    async fn update_inner(
        &self,
        id: LeaderId,
        name: &str,
        zone: &str,
        activity: Activity,
    ) -> EngineResult<()> {
        let mut leader = self.live_leader(id).await?;
        let zone = zone.trim();
        leader.name = name.trim().to_string();
        leader.zone = (!zone.is_empty()).then(|| zone.to_string());
        leader.activity = activity;
        leader.updated_at = Utc::now();
        self.leaders.update_leader(&leader).await?;
        Ok(())
    }

    /// Stamps the soft-delete timestamp. Deleting an already-deleted
    /// leader is rejected like any other edit. Requires the administrator
    /// role.
    pub async fn soft_delete_leader(&self, ctx: &CallerContext, id: LeaderId) -> MutationResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator]) {
            return MutationResult::fail(e);
        }
        match self.soft_delete_inner(id).await {
            Ok(()) => MutationResult::ok(),
            Err(e) => MutationResult::fail(e),
        }
    }

    async fn soft_delete_inner(&self, id: LeaderId) -> EngineResult<()> {
        let mut leader = self.live_leader(id).await?;
        leader.status = LeaderStatus::Deleted { at: Utc::now() };
        leader.updated_at = Utc::now();
        self.leaders.update_leader(&leader).await?;
        tracing::info!(leader_id = %id, "leader soft-deleted");
        Ok(())
    }

    async fn live_leader(&self, id: LeaderId) -> EngineResult<Leader> {
        let leader = self
            .leaders
            .get_leader(id)
            .await?
            .ok_or(EngineError::LeaderNotFound)?;
        match leader.status {
            LeaderStatus::Active => Ok(leader),
            LeaderStatus::Deleted { .. } => Err(EngineError::LeaderDeleted),
        }
    }
}
