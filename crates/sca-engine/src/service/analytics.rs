//! Read-only KPIs and fraud analytics.

use std::collections::BTreeMap;
use std::sync::Arc;

use sca_types::{
    require_role, AdhesionLine, CallerContext, LeaderId, LegalStatus, Role, Sheet, SheetState,
};

use crate::domain::metrics::{compliance, effectiveness, percentage};
use crate::ports::{
    AdhesionStore, DashboardKpis, DashboardSummary, DataResult, FraudAlertRow, LeaderKpis,
    LeaderStore, Page, Paginated, SheetStore, StatusCount, TopPerformerRow,
};

const READ_ROLES: [Role; 3] = [Role::Administrator, Role::DataEntry, Role::Auditor];

/// Analytics configuration.
#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
    /// Minimum fraud-cause percentage for a leader to appear in the alert
    /// list.
    pub fraud_threshold_percent: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            fraud_threshold_percent: 15.0,
        }
    }
}

/// Computes leaderboard, fraud, and dashboard figures from current entity
/// state. Every operation is non-mutating.
pub struct AnalyticsService<L, S, A>
where
    L: LeaderStore,
    S: SheetStore,
    A: AdhesionStore,
{
    config: AnalyticsConfig,
    leaders: Arc<L>,
    sheets: Arc<S>,
    adhesions: Arc<A>,
}

/// Adjudication counters for one leader.
#[derive(Debug, Default, Clone, Copy)]
struct LeaderCounters {
    sheets_assigned: u64,
    sheets_received: u64,
    accepted: u64,
    rejected: u64,
    tse_review: u64,
}

impl LeaderCounters {
    fn tally(sheets: &[Sheet], lines: &[AdhesionLine]) -> Self {
        let mut counters = Self {
            sheets_assigned: sheets.len() as u64,
            sheets_received: sheets
                .iter()
                .filter(|s| s.state == SheetState::Received)
                .count() as u64,
            ..Self::default()
        };
        for line in lines {
            match line.status {
                LegalStatus::Accepted => counters.accepted += 1,
                s if s.is_rejection() => counters.rejected += 1,
                LegalStatus::TseReview => counters.tse_review += 1,
                _ => {}
            }
        }
        counters
    }

    fn kpis(&self) -> LeaderKpis {
        LeaderKpis {
            sheets_assigned: self.sheets_assigned,
            sheets_received: self.sheets_received,
            accepted: self.accepted,
            rejected: self.rejected,
            tse_review: self.tse_review,
            effectiveness: effectiveness(self.accepted, self.rejected, self.tse_review),
            compliance: compliance(self.sheets_received, self.sheets_assigned),
        }
    }
}

impl<L, S, A> AnalyticsService<L, S, A>
where
    L: LeaderStore,
    S: SheetStore,
    A: AdhesionStore,
{
    pub fn new(config: AnalyticsConfig, leaders: Arc<L>, sheets: Arc<S>, adhesions: Arc<A>) -> Self {
        Self {
            config,
            leaders,
            sheets,
            adhesions,
        }
    }

    /// Sheets and lines for one leader. Store failures read as empty data;
    /// report pages never fail on a single leader.
    async fn counters_lenient(&self, leader_id: LeaderId) -> (Vec<Sheet>, Vec<AdhesionLine>) {
        let sheets = self
            .sheets
            .list_sheets_by_leader(leader_id)
            .await
            .unwrap_or_default();
        let ids: Vec<_> = sheets.iter().map(|s| s.id).collect();
        let lines = if ids.is_empty() {
            Vec::new()
        } else {
            self.adhesions
                .list_lines_by_sheets(&ids)
                .await
                .unwrap_or_default()
        };
        (sheets, lines)
    }

    /// Leaderboard page over active leaders, sorted descending by
    /// effectiveness. The sort is stable: ties keep the store's name order.
    pub async fn top_performers(
        &self,
        ctx: &CallerContext,
        page: Page,
    ) -> Paginated<TopPerformerRow> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return Paginated::denied(e, page);
        }

        let (leaders, total) = match self.leaders.list_active_leaders(page).await {
            Ok(window) => window,
            Err(e) => return Paginated::failed(e, page),
        };

        let mut rows = Vec::with_capacity(leaders.len());
        for leader in leaders {
            let (sheets, lines) = self.counters_lenient(leader.id).await;
            let kpis = LeaderCounters::tally(&sheets, &lines).kpis();
            rows.push(TopPerformerRow {
                leader_id: leader.id,
                name: leader.name,
                zone: leader.zone,
                accepted: kpis.accepted,
                rejected: kpis.rejected,
                tse_review: kpis.tse_review,
                effectiveness: kpis.effectiveness,
                sheets_assigned: kpis.sheets_assigned,
                sheets_received: kpis.sheets_received,
                compliance: kpis.compliance,
            });
        }
        rows.sort_by(|a, b| b.effectiveness.total_cmp(&a.effectiveness));

        Paginated::ok(rows, total, page)
    }

    /// KPI set for a single leader's assigned sheets.
    pub async fn leader_kpis(
        &self,
        ctx: &CallerContext,
        leader_id: LeaderId,
    ) -> DataResult<LeaderKpis> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return DataResult::fail(e);
        }

        let sheets = match self.sheets.list_sheets_by_leader(leader_id).await {
            Ok(sheets) => sheets,
            Err(e) => return DataResult::fail(e),
        };
        let ids: Vec<_> = sheets.iter().map(|s| s.id).collect();
        let lines = if ids.is_empty() {
            Vec::new()
        } else {
            match self.adhesions.list_lines_by_sheets(&ids).await {
                Ok(lines) => lines,
                Err(e) => return DataResult::fail(e),
            }
        };

        DataResult::ok(LeaderCounters::tally(&sheets, &lines).kpis())
    }

    /// Active leaders whose fraud-indicator share of rejections reaches the
    /// threshold (default from config), sorted descending by that share.
    /// Leaders without sheets or without rejections are left out entirely.
    pub async fn fraud_alerts(
        &self,
        ctx: &CallerContext,
        threshold_percent: Option<f64>,
        page: Page,
    ) -> Paginated<FraudAlertRow> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return Paginated::denied(e, page);
        }
        let threshold = threshold_percent.unwrap_or(self.config.fraud_threshold_percent);

        let (leaders, total) = match self.leaders.list_active_leaders(page).await {
            Ok(window) => window,
            Err(e) => return Paginated::failed(e, page),
        };

        let mut rows = Vec::new();
        for leader in leaders {
            let (sheets, lines) = self.counters_lenient(leader.id).await;
            if sheets.is_empty() {
                continue;
            }

            let mut total_rejected = 0u64;
            let mut fraud_cause_rejected = 0u64;
            for line in &lines {
                if line.status.is_rejection() {
                    total_rejected += 1;
                    if line.cause.is_some_and(|c| c.is_fraud_indicator()) {
                        fraud_cause_rejected += 1;
                    }
                }
            }
            if total_rejected == 0 {
                continue;
            }

            let share = percentage(fraud_cause_rejected, total_rejected);
            if share >= threshold {
                rows.push(FraudAlertRow {
                    leader_id: leader.id,
                    name: leader.name,
                    zone: leader.zone,
                    total_rejected,
                    fraud_cause_rejected,
                    fraud_cause_percentage: share,
                });
            }
        }
        rows.sort_by(|a, b| b.fraud_cause_percentage.total_cmp(&a.fraud_cause_percentage));

        Paginated::ok(rows, total, page)
    }

    /// Global dashboard: headline counters plus per-keyword breakdowns.
    pub async fn dashboard_summary(&self, ctx: &CallerContext) -> DataResult<DashboardSummary> {
        if let Err(e) = require_role(ctx, &READ_ROLES) {
            return DataResult::fail(e);
        }

        let active_leaders = match self.leaders.count_active_leaders().await {
            Ok(count) => count,
            Err(e) => return DataResult::fail(e),
        };
        let sheets = match self.sheets.list_all_sheets().await {
            Ok(sheets) => sheets,
            Err(e) => return DataResult::fail(e),
        };
        let lines = match self.adhesions.list_all_lines().await {
            Ok(lines) => lines,
            Err(e) => return DataResult::fail(e),
        };

        let mut accepted = 0u64;
        let mut rejected = 0u64;
        let mut adhesions_by_status: BTreeMap<&'static str, u64> = BTreeMap::new();
        for line in &lines {
            *adhesions_by_status.entry(line.status.as_str()).or_default() += 1;
            if line.status == LegalStatus::Accepted {
                accepted += 1;
            } else if line.status.is_rejection() {
                rejected += 1;
            }
        }

        let mut sheets_by_state: BTreeMap<&'static str, u64> = BTreeMap::new();
        for sheet in &sheets {
            *sheets_by_state.entry(sheet.state.as_str()).or_default() += 1;
        }

        let pending = adhesions_by_status
            .get(LegalStatus::Pending.as_str())
            .copied()
            .unwrap_or(0);
        let sheets_received = sheets_by_state
            .get(SheetState::Received.as_str())
            .copied()
            .unwrap_or(0);

        DataResult::ok(DashboardSummary {
            kpis: DashboardKpis {
                active_leaders,
                sheets_assigned: sheets.len() as u64,
                sheets_received,
                total_adhesions: lines.len() as u64,
                accepted,
                rejected,
                pending,
                global_effectiveness: percentage(accepted, accepted + rejected),
            },
            adhesions_by_status: bucket_counts(adhesions_by_status),
            sheets_by_state: bucket_counts(sheets_by_state),
        })
    }
}

fn bucket_counts(map: BTreeMap<&'static str, u64>) -> Vec<StatusCount> {
    map.into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}
