//! # Role Matrix
//!
//! Every operation checks the caller context before touching the store and
//! renders the denial into its result value. This module pins the full
//! permitted-role matrix.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sca_engine::adapters::InMemoryStore;
    use sca_engine::ports::{AdhesionLineInput, Page};
    use sca_engine::service::{
        AdhesionRecorder, AnalyticsConfig, AnalyticsService, CustodyService, LeaderDirectory,
        RulingReconciler, SheetAllocator,
    };
    use sca_types::{Activity, CallerContext, LeaderId, LegalStatus, Role, SheetId, SheetState};

    fn contexts() -> [(Option<Role>, CallerContext); 4] {
        [
            (None, CallerContext::anonymous()),
            (
                Some(Role::Administrator),
                CallerContext::with_role(Role::Administrator),
            ),
            (
                Some(Role::DataEntry),
                CallerContext::with_role(Role::DataEntry),
            ),
            (Some(Role::Auditor), CallerContext::with_role(Role::Auditor)),
        ]
    }

    fn blank_lines() -> Vec<AdhesionLineInput> {
        (1..=5)
            .map(|line| AdhesionLineInput {
                line,
                citizen_dpi: None,
                citizen_name: None,
                status: LegalStatus::Pending,
                cause: None,
            })
            .collect()
    }

    /// Denials must carry the access message, not a domain error: the role
    /// check runs before any lookup, so even nonexistent targets report
    /// access first.
    fn is_denial(error: &str) -> bool {
        error.starts_with("Acceso denegado.") || error == "No autenticado o sin perfil."
    }

    #[tokio::test]
    async fn test_admin_only_operations() {
        let store = Arc::new(InMemoryStore::new());
        let allocator = SheetAllocator::new(store.clone(), store.clone(), store.clone());
        let custody = CustodyService::new(store.clone(), store.clone());
        let directory = LeaderDirectory::new(store.clone());

        for (role, ctx) in contexts() {
            let admitted = role == Some(Role::Administrator);

            let bulk = allocator.assign_bulk(&ctx, LeaderId::new(), 1, 1).await;
            let receive = custody.receive_sheet(&ctx, 1).await;
            let overridden = custody
                .override_sheet(&ctx, SheetId::new(), SheetState::Processed, None)
                .await;
            let created = directory.create_leader(&ctx, "Ana", "", "1001").await;
            let edited = directory
                .update_leader(&ctx, LeaderId::new(), "Ana", "", Activity::Active)
                .await;
            let deleted = directory.soft_delete_leader(&ctx, LeaderId::new()).await;

            if admitted {
                // Admitted callers reach the domain and fail on the missing
                // targets instead.
                assert!(!is_denial(&bulk.errors[0]));
                assert!(!is_denial(receive.error.as_deref().unwrap()));
                assert!(!is_denial(overridden.error.as_deref().unwrap()));
                assert!(!is_denial(edited.error.as_deref().unwrap()));
                assert!(!is_denial(deleted.error.as_deref().unwrap()));
            } else {
                assert!(is_denial(&bulk.errors[0]));
                assert!(is_denial(receive.error.as_deref().unwrap()));
                assert!(is_denial(overridden.error.as_deref().unwrap()));
                assert!(is_denial(created.error.as_deref().unwrap()));
                assert!(is_denial(edited.error.as_deref().unwrap()));
                assert!(is_denial(deleted.error.as_deref().unwrap()));
            }
        }
    }

    #[tokio::test]
    async fn test_capture_operations_admit_data_entry() {
        let store = Arc::new(InMemoryStore::new());
        let recorder = AdhesionRecorder::new(store.clone(), store.clone());
        let reconciler = RulingReconciler::new(store.clone(), store.clone());

        for (role, ctx) in contexts() {
            let admitted = matches!(role, Some(Role::Administrator) | Some(Role::DataEntry));

            let saved = recorder.save_lines(&ctx, 1, blank_lines()).await;
            let fetched = recorder.sheet_lines(&ctx, 1).await;
            let imported = reconciler.import_rulings(&ctx, "1,1,ACEPTADO").await;

            if admitted {
                assert!(!is_denial(saved.error.as_deref().unwrap()));
                assert!(!is_denial(fetched.error.as_deref().unwrap()));
                assert!(imported.error.is_none());
            } else {
                assert!(is_denial(saved.error.as_deref().unwrap()));
                assert!(is_denial(fetched.error.as_deref().unwrap()));
                assert!(is_denial(imported.error.as_deref().unwrap()));
            }
        }
    }

    #[tokio::test]
    async fn test_read_operations_admit_every_role() {
        let store = Arc::new(InMemoryStore::new());
        let recorder = AdhesionRecorder::new(store.clone(), store.clone());
        let directory = LeaderDirectory::new(store.clone());
        let analytics = AnalyticsService::new(
            AnalyticsConfig::default(),
            store.clone(),
            store.clone(),
            store.clone(),
        );

        for (role, ctx) in contexts() {
            let admitted = role.is_some();

            let listed = directory.list_leaders(&ctx, Page::default()).await;
            let all = directory.list_all_leaders(&ctx).await;
            let lines = recorder.lines_by_sheet_id(&ctx, SheetId::new()).await;
            let top = analytics.top_performers(&ctx, Page::default()).await;
            let kpis = analytics.leader_kpis(&ctx, LeaderId::new()).await;
            let alerts = analytics.fraud_alerts(&ctx, None, Page::default()).await;
            let dash = analytics.dashboard_summary(&ctx).await;

            if admitted {
                assert!(listed.error.is_none());
                assert!(all.error.is_none());
                assert!(lines.error.is_none());
                assert!(top.error.is_none());
                assert!(kpis.error.is_none());
                assert!(alerts.error.is_none());
                assert!(dash.error.is_none());
            } else {
                assert!(is_denial(listed.error.as_deref().unwrap()));
                assert!(is_denial(all.error.as_deref().unwrap()));
                assert!(is_denial(lines.error.as_deref().unwrap()));
                assert!(is_denial(top.error.as_deref().unwrap()));
                assert!(is_denial(kpis.error.as_deref().unwrap()));
                assert!(is_denial(alerts.error.as_deref().unwrap()));
                assert!(is_denial(dash.error.as_deref().unwrap()));
            }
        }
    }
}
