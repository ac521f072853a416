//! In-memory implementation of the store ports for testing.
//!
//! Enforces the same constraints a relational schema would: unique leader
//! DPI, unique sheet number, unique (sheet, line) pair, and the
//! sheet-to-leader foreign key. Deleting a sheet cascades to its lines.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use sca_types::{
    AdhesionId, AdhesionLine, Leader, LeaderId, LeaderStatus, Sheet, SheetId, StoreError,
    StoreResult,
};

use crate::ports::{
    AdhesionStore, LeaderStore, NewAdhesionLine, NewLeader, NewSheet, Page, SheetStore,
};

#[derive(Default)]
struct Tables {
    leaders: HashMap<LeaderId, Leader>,
    sheets: HashMap<SheetId, Sheet>,
    lines: HashMap<AdhesionId, AdhesionLine>,
}

/// In-memory entity store backing every port trait.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_leaders(tables: &Tables) -> Vec<Leader> {
        let mut leaders: Vec<Leader> = tables
            .leaders
            .values()
            .filter(|l| !l.status.is_deleted())
            .cloned()
            .collect();
        // DPI is unique, so (name, dpi) gives a deterministic order.
        leaders.sort_by(|a, b| (&a.name, &a.dpi).cmp(&(&b.name, &b.dpi)));
        leaders
    }

    fn paginate(leaders: Vec<Leader>, page: Page) -> (Vec<Leader>, u64) {
        let total = leaders.len() as u64;
        let window = leaders
            .into_iter()
            .skip(page.offset())
            .take(page.page_size as usize)
            .collect();
        (window, total)
    }
}

#[async_trait]
impl LeaderStore for InMemoryStore {
    async fn insert_leader(&self, leader: NewLeader) -> StoreResult<Leader> {
        let mut tables = self.tables.write();
        if tables.leaders.values().any(|l| l.dpi == leader.dpi) {
            return Err(StoreError::Conflict {
                constraint: "lideres.dpi".to_string(),
            });
        }
        let now = Utc::now();
        let row = Leader {
            id: LeaderId::new(),
            name: leader.name,
            zone: leader.zone,
            dpi: leader.dpi,
            activity: leader.activity,
            status: LeaderStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.leaders.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_leader(&self, id: LeaderId) -> StoreResult<Option<Leader>> {
        Ok(self.tables.read().leaders.get(&id).cloned())
    }

    async fn list_leaders(&self, page: Page) -> StoreResult<(Vec<Leader>, u64)> {
        let tables = self.tables.read();
        Ok(Self::paginate(Self::sorted_leaders(&tables), page))
    }

    async fn list_all_leaders(&self) -> StoreResult<Vec<Leader>> {
        let tables = self.tables.read();
        Ok(Self::sorted_leaders(&tables))
    }

    async fn list_active_leaders(&self, page: Page) -> StoreResult<(Vec<Leader>, u64)> {
        let tables = self.tables.read();
        let active = Self::sorted_leaders(&tables)
            .into_iter()
            .filter(Leader::is_active)
            .collect();
        Ok(Self::paginate(active, page))
    }

    async fn count_active_leaders(&self) -> StoreResult<u64> {
        let tables = self.tables.read();
        Ok(tables.leaders.values().filter(|l| l.is_active()).count() as u64)
    }

    async fn update_leader(&self, leader: &Leader) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.leaders.get_mut(&leader.id) {
            Some(row) => {
                *row = leader.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }
}

#[async_trait]
impl SheetStore for InMemoryStore {
    async fn find_sheet_by_number(&self, sheet_number: u64) -> StoreResult<Option<Sheet>> {
        let tables = self.tables.read();
        Ok(tables
            .sheets
            .values()
            .find(|s| s.sheet_number == sheet_number)
            .cloned())
    }

    async fn get_sheet(&self, id: SheetId) -> StoreResult<Option<Sheet>> {
        Ok(self.tables.read().sheets.get(&id).cloned())
    }

    async fn insert_sheet(&self, sheet: NewSheet) -> StoreResult<Sheet> {
        let mut tables = self.tables.write();
        if !tables.leaders.contains_key(&sheet.leader_id) {
            return Err(StoreError::ForeignKey {
                constraint: "hojas.lider_id".to_string(),
            });
        }
        if tables
            .sheets
            .values()
            .any(|s| s.sheet_number == sheet.sheet_number)
        {
            return Err(StoreError::Conflict {
                constraint: "hojas.numero_hoja".to_string(),
            });
        }
        let row = Sheet {
            id: SheetId::new(),
            sheet_number: sheet.sheet_number,
            leader_id: sheet.leader_id,
            state: sheet.state,
            assigned_at: sheet.assigned_at,
            received_at: None,
        };
        tables.sheets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_sheet(&self, sheet: &Sheet) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.sheets.get_mut(&sheet.id) {
            Some(row) => {
                *row = sheet.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_sheet(&self, id: SheetId) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if tables.sheets.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        tables.lines.retain(|_, l| l.sheet_id != id);
        Ok(())
    }

    async fn list_sheets_by_leader(&self, leader_id: LeaderId) -> StoreResult<Vec<Sheet>> {
        let tables = self.tables.read();
        let mut sheets: Vec<Sheet> = tables
            .sheets
            .values()
            .filter(|s| s.leader_id == leader_id)
            .cloned()
            .collect();
        sheets.sort_by_key(|s| s.sheet_number);
        Ok(sheets)
    }

    async fn list_all_sheets(&self) -> StoreResult<Vec<Sheet>> {
        let tables = self.tables.read();
        let mut sheets: Vec<Sheet> = tables.sheets.values().cloned().collect();
        sheets.sort_by_key(|s| s.sheet_number);
        Ok(sheets)
    }
}

#[async_trait]
impl AdhesionStore for InMemoryStore {
    async fn insert_lines(&self, lines: Vec<NewAdhesionLine>) -> StoreResult<()> {
        let mut tables = self.tables.write();
        for line in &lines {
            if tables
                .lines
                .values()
                .any(|l| l.sheet_id == line.sheet_id && l.line == line.line)
            {
                return Err(StoreError::Conflict {
                    constraint: "adhesiones.hoja_linea".to_string(),
                });
            }
        }
        for line in lines {
            let row = AdhesionLine {
                id: AdhesionId::new(),
                sheet_id: line.sheet_id,
                line: line.line,
                citizen_dpi: line.citizen_dpi,
                citizen_name: line.citizen_name,
                status: line.status,
                cause: line.cause,
            };
            tables.lines.insert(row.id, row);
        }
        Ok(())
    }

    async fn insert_line(&self, line: NewAdhesionLine) -> StoreResult<AdhesionLine> {
        let mut tables = self.tables.write();
        if tables
            .lines
            .values()
            .any(|l| l.sheet_id == line.sheet_id && l.line == line.line)
        {
            return Err(StoreError::Conflict {
                constraint: "adhesiones.hoja_linea".to_string(),
            });
        }
        let row = AdhesionLine {
            id: AdhesionId::new(),
            sheet_id: line.sheet_id,
            line: line.line,
            citizen_dpi: line.citizen_dpi,
            citizen_name: line.citizen_name,
            status: line.status,
            cause: line.cause,
        };
        tables.lines.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_line(&self, line: &AdhesionLine) -> StoreResult<()> {
        let mut tables = self.tables.write();
        match tables.lines.get_mut(&line.id) {
            Some(row) => {
                *row = line.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn list_lines_by_sheet(&self, sheet_id: SheetId) -> StoreResult<Vec<AdhesionLine>> {
        let tables = self.tables.read();
        let mut lines: Vec<AdhesionLine> = tables
            .lines
            .values()
            .filter(|l| l.sheet_id == sheet_id)
            .cloned()
            .collect();
        lines.sort_by_key(|l| l.line);
        Ok(lines)
    }

    async fn find_line(&self, sheet_id: SheetId, line: u8) -> StoreResult<Option<AdhesionLine>> {
        let tables = self.tables.read();
        Ok(tables
            .lines
            .values()
            .find(|l| l.sheet_id == sheet_id && l.line == line)
            .cloned())
    }

    async fn list_lines_by_sheets(&self, sheet_ids: &[SheetId]) -> StoreResult<Vec<AdhesionLine>> {
        let tables = self.tables.read();
        let mut lines: Vec<AdhesionLine> = tables
            .lines
            .values()
            .filter(|l| sheet_ids.contains(&l.sheet_id))
            .cloned()
            .collect();
        lines.sort_by_key(|l| (l.sheet_id.0, l.line));
        Ok(lines)
    }

    async fn list_all_lines(&self) -> StoreResult<Vec<AdhesionLine>> {
        let tables = self.tables.read();
        let mut lines: Vec<AdhesionLine> = tables.lines.values().cloned().collect();
        lines.sort_by_key(|l| (l.sheet_id.0, l.line));
        Ok(lines)
    }

    async fn dpi_active_elsewhere(&self, dpi: &str, exclude: SheetId) -> StoreResult<bool> {
        let tables = self.tables.read();
        Ok(tables.lines.values().any(|l| {
            l.sheet_id != exclude
                && l.status.holds_dpi()
                && l.citizen_dpi.as_deref() == Some(dpi)
        }))
    }
}
