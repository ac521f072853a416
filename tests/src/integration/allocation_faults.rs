//! # Allocation Under Store Faults
//!
//! The allocator must isolate a failing sheet number: compensate by
//! deleting the half-created sheet, report the number, and keep going with
//! the rest of the range.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use sca_engine::adapters::InMemoryStore;
    use sca_engine::ports::{AdhesionStore, LeaderStore, NewAdhesionLine, NewLeader, SheetStore};
    use sca_engine::service::SheetAllocator;
    use sca_types::{
        Activity, AdhesionLine, CallerContext, Role, SheetId, StoreError, StoreResult,
    };

    /// Wraps the in-memory store and fails one `insert_lines` call by
    /// 1-based call index.
    struct FaultyLineStore {
        inner: Arc<InMemoryStore>,
        calls: AtomicU32,
        fail_on_call: u32,
    }

    impl FaultyLineStore {
        fn new(inner: Arc<InMemoryStore>, fail_on_call: u32) -> Self {
            Self {
                inner,
                calls: AtomicU32::new(0),
                fail_on_call,
            }
        }
    }

    #[async_trait]
    impl AdhesionStore for FaultyLineStore {
        async fn insert_lines(&self, lines: Vec<NewAdhesionLine>) -> StoreResult<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_on_call {
                return Err(StoreError::Backend("disk full".to_string()));
            }
            self.inner.insert_lines(lines).await
        }

        async fn insert_line(&self, line: NewAdhesionLine) -> StoreResult<AdhesionLine> {
            self.inner.insert_line(line).await
        }

        async fn update_line(&self, line: &AdhesionLine) -> StoreResult<()> {
            self.inner.update_line(line).await
        }

        async fn list_lines_by_sheet(&self, sheet_id: SheetId) -> StoreResult<Vec<AdhesionLine>> {
            self.inner.list_lines_by_sheet(sheet_id).await
        }

        async fn find_line(
            &self,
            sheet_id: SheetId,
            line: u8,
        ) -> StoreResult<Option<AdhesionLine>> {
            self.inner.find_line(sheet_id, line).await
        }

        async fn list_lines_by_sheets(
            &self,
            sheet_ids: &[SheetId],
        ) -> StoreResult<Vec<AdhesionLine>> {
            self.inner.list_lines_by_sheets(sheet_ids).await
        }

        async fn list_all_lines(&self) -> StoreResult<Vec<AdhesionLine>> {
            self.inner.list_all_lines().await
        }

        async fn dpi_active_elsewhere(&self, dpi: &str, exclude: SheetId) -> StoreResult<bool> {
            self.inner.dpi_active_elsewhere(dpi, exclude).await
        }
    }

    #[tokio::test]
    async fn test_failed_sheet_is_compensated_and_range_continues() {
        let store = Arc::new(InMemoryStore::new());
        let leader = store
            .insert_leader(NewLeader {
                name: "Ana".to_string(),
                zone: None,
                dpi: "1001".to_string(),
                activity: Activity::Active,
            })
            .await
            .unwrap();

        // Line creation fails for the second sheet of the range.
        let faulty = Arc::new(FaultyLineStore::new(store.clone(), 2));
        let allocator = SheetAllocator::new(store.clone(), faulty, store.clone());
        let admin = CallerContext::with_role(Role::Administrator);

        let result = allocator.assign_bulk(&admin, leader.id, 200, 202).await;
        assert!(!result.success);
        assert_eq!(result.created, 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Hoja 201:"), "{:?}", result.errors);
        assert!(result.errors[0].contains("disk full"));

        // The failed number was fully compensated: no sheet row, no lines.
        assert!(store.find_sheet_by_number(201).await.unwrap().is_none());
        for number in [200, 202] {
            let sheet = store.find_sheet_by_number(number).await.unwrap().unwrap();
            assert_eq!(store.list_lines_by_sheet(sheet.id).await.unwrap().len(), 5);
        }

        // Re-running heals the gap and skips the survivors.
        let retry = allocator.assign_bulk(&admin, leader.id, 200, 202).await;
        assert!(retry.success);
        assert_eq!(retry.created, 1);
        assert_eq!(retry.skipped, 2);
    }
}
