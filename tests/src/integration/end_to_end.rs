//! # Full Lifecycle Integration
//!
//! Drives the complete sheet/adhesion lifecycle across every service over
//! one shared in-memory store: allocation, custody, capture with duplicate
//! detection, ruling reconciliation, and the dashboard that sums it all up.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::Rng;
    use sca_engine::adapters::InMemoryStore;
    use sca_engine::ports::{AdhesionLineInput, AdhesionStore, LeaderStore, Page, SheetStore};
    use sca_engine::service::{
        AdhesionRecorder, AnalyticsConfig, AnalyticsService, CustodyService, LeaderDirectory,
        RulingReconciler, SheetAllocator,
    };
    use sca_types::{CallerContext, LegalStatus, Role, SheetState};

    struct Harness {
        store: Arc<InMemoryStore>,
        allocator: SheetAllocator<InMemoryStore, InMemoryStore, InMemoryStore>,
        custody: CustodyService<InMemoryStore, InMemoryStore>,
        recorder: AdhesionRecorder<InMemoryStore, InMemoryStore>,
        reconciler: RulingReconciler<InMemoryStore, InMemoryStore>,
        analytics: AnalyticsService<InMemoryStore, InMemoryStore, InMemoryStore>,
        directory: LeaderDirectory<InMemoryStore>,
    }

    impl Harness {
        fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            Self {
                allocator: SheetAllocator::new(store.clone(), store.clone(), store.clone()),
                custody: CustodyService::new(store.clone(), store.clone()),
                recorder: AdhesionRecorder::new(store.clone(), store.clone()),
                reconciler: RulingReconciler::new(store.clone(), store.clone()),
                analytics: AnalyticsService::new(
                    AnalyticsConfig::default(),
                    store.clone(),
                    store.clone(),
                    store.clone(),
                ),
                directory: LeaderDirectory::new(store.clone()),
                store,
            }
        }
    }

    fn blank_line(line: u8) -> AdhesionLineInput {
        AdhesionLineInput {
            line,
            citizen_dpi: None,
            citizen_name: None,
            status: LegalStatus::Pending,
            cause: None,
        }
    }

    fn accepted_line(line: u8, dpi: &str) -> AdhesionLineInput {
        AdhesionLineInput {
            line,
            citizen_dpi: Some(dpi.to_string()),
            citizen_name: Some(format!("Ciudadano {dpi}")),
            status: LegalStatus::Accepted,
            cause: None,
        }
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let h = Harness::new();
        let admin = CallerContext::with_role(Role::Administrator);
        let clerk = CallerContext::with_role(Role::DataEntry);
        let auditor = CallerContext::with_role(Role::Auditor);

        // Leader registered by an administrator.
        assert!(
            h.directory
                .create_leader(&admin, "Ana López", "Zona 3", "2544001230101")
                .await
                .success
        );
        let leader = h.store.list_all_leaders().await.unwrap()[0].clone();

        // Allocate sheets 100-102: three sheets, five blank lines each.
        let allocated = h.allocator.assign_bulk(&admin, leader.id, 100, 102).await;
        assert!(allocated.success);
        assert_eq!((allocated.created, allocated.skipped), (3, 0));

        // Sheet 90 holds the already-accepted citizen used for the
        // collision below.
        assert!(h.allocator.assign_bulk(&admin, leader.id, 90, 90).await.success);
        let mut seed_lines: Vec<_> = (1..=5).map(blank_line).collect();
        seed_lines[0] = accepted_line(1, "X-900");
        let seeded = h.recorder.save_lines(&clerk, 90, seed_lines).await;
        assert!(seeded.success);
        assert!(seeded.duplicate_alerts.is_empty());

        // Sheets move into circulation before reception.
        for number in 100..=102u64 {
            let sheet = h.store.find_sheet_by_number(number).await.unwrap().unwrap();
            assert!(
                h.custody
                    .override_sheet(&admin, sheet.id, SheetState::Circulation, None)
                    .await
                    .success
            );
        }

        // Receive sheet 101 only.
        assert!(h.custody.receive_sheet(&admin, 101).await.success);
        for (number, expected) in [
            (100, SheetState::Circulation),
            (101, SheetState::Received),
            (102, SheetState::Circulation),
        ] {
            let sheet = h.store.find_sheet_by_number(number).await.unwrap().unwrap();
            assert_eq!(sheet.state, expected);
        }

        // Capture sheet 100; line 2 collides with the citizen accepted on
        // sheet 90 and flips to internal rejection.
        let mut lines: Vec<_> = (1..=5).map(blank_line).collect();
        lines[0] = accepted_line(1, "X-100");
        lines[1] = accepted_line(2, "X-900");
        lines[2] = accepted_line(3, "X-102");
        let saved = h.recorder.save_lines(&clerk, 100, lines).await;
        assert!(saved.success);
        assert_eq!(
            saved.duplicate_alerts,
            vec!["Línea 2: Posible Duplicado (DPI X-900)."]
        );

        let sheet_100 = h.store.find_sheet_by_number(100).await.unwrap().unwrap();
        let flipped = h.store.find_line(sheet_100.id, 2).await.unwrap().unwrap();
        assert_eq!(flipped.status, LegalStatus::InternalRejected);

        // A tribunal ruling rejects line 4 of sheet 100 with a fraud cause
        // and rules on a sheet this system never allocated.
        let rulings = "numero_hoja,linea,estado,causa\n\
                       100,4,RECHAZADO,PLANA\n\
                       500,1,ACEPTADO,";
        let imported = h.reconciler.import_rulings(&clerk, rulings).await;
        assert!(imported.success);
        assert_eq!((imported.updated, imported.skipped), (1, 1));

        // Dashboard reflects everything above.
        let summary = h.analytics.dashboard_summary(&auditor).await.data.unwrap();
        assert_eq!(summary.kpis.active_leaders, 1);
        assert_eq!(summary.kpis.sheets_assigned, 4);
        assert_eq!(summary.kpis.sheets_received, 1);
        assert_eq!(summary.kpis.total_adhesions, 20);
        // Accepted: X-900 on sheet 90, X-100 and X-102 on sheet 100.
        assert_eq!(summary.kpis.accepted, 3);
        // Rejected: the duplicate flip plus the PLANA ruling.
        assert_eq!(summary.kpis.rejected, 2);
        assert_eq!(summary.kpis.global_effectiveness, 60.0);

        // The leaderboard sees the same counters per leader.
        let top = h.analytics.top_performers(&auditor, Page::default()).await;
        let row = &top.data.unwrap()[0];
        assert_eq!(row.accepted, 3);
        assert_eq!(row.rejected, 2);
        assert_eq!(row.effectiveness, 60.0);
        assert_eq!(row.sheets_assigned, 4);
        assert_eq!(row.sheets_received, 1);
        assert_eq!(row.compliance, 25.0);

        // With 2 rejections and 1 fraud cause, 50% puts the leader on the
        // default-threshold alert list.
        let alerts = h.analytics.fraud_alerts(&auditor, None, Page::default()).await;
        let alert = &alerts.data.unwrap()[0];
        assert_eq!(alert.total_rejected, 2);
        assert_eq!(alert.fraud_cause_rejected, 1);
        assert_eq!(alert.fraud_cause_percentage, 50.0);
    }

    #[tokio::test]
    async fn test_bulk_capture_keeps_dpi_uniqueness() {
        let h = Harness::new();
        let admin = CallerContext::with_role(Role::Administrator);
        let clerk = CallerContext::with_role(Role::DataEntry);

        assert!(
            h.directory
                .create_leader(&admin, "Beto Ruiz", "", "3011887760202")
                .await
                .success
        );
        let leader = h.store.list_all_leaders().await.unwrap()[0].clone();
        assert!(h.allocator.assign_bulk(&admin, leader.id, 1, 10).await.success);

        // Fill ten sheets with distinct citizens, except that the same
        // citizen signs line 5 of every sheet.
        let base: u64 = rand::thread_rng().gen_range(1_000_000..9_000_000);
        let repeat = base.to_string();
        for number in 1..=10u64 {
            let lines = (1..=5u8)
                .map(|position| {
                    let dpi = if position == 5 {
                        repeat.clone()
                    } else {
                        (base + number * 10 + position as u64).to_string()
                    };
                    accepted_line(position, &dpi)
                })
                .collect();
            let saved = h.recorder.save_lines(&clerk, number, lines).await;
            assert!(saved.success);
            if number == 1 {
                assert!(saved.duplicate_alerts.is_empty());
            } else {
                assert_eq!(
                    saved.duplicate_alerts,
                    vec![format!("Línea 5: Posible Duplicado (DPI {repeat}).")]
                );
            }
        }

        // Exactly one accepted line holds the repeated DPI; every later
        // appearance was downgraded.
        let holders: Vec<_> = h
            .store
            .list_all_lines()
            .await
            .unwrap()
            .into_iter()
            .filter(|l| l.citizen_dpi.as_deref() == Some(repeat.as_str()))
            .collect();
        assert_eq!(holders.len(), 10);
        assert_eq!(
            holders
                .iter()
                .filter(|l| l.status == LegalStatus::Accepted)
                .count(),
            1
        );
        assert_eq!(
            holders
                .iter()
                .filter(|l| l.status == LegalStatus::InternalRejected)
                .count(),
            9
        );
    }
}
