//! Five-line adhesion capture.

use std::sync::Arc;

use sca_types::{
    require_role, AdhesionLine, CallerContext, LegalStatus, Role, SheetId, LINES_PER_SHEET,
};

use crate::domain::{EngineError, EngineResult};
use crate::ports::{
    AdhesionLineInput, AdhesionStore, DataResult, NewAdhesionLine, SaveAdhesionsResult,
    SheetLinesResult, SheetStore,
};

/// Captures the five lines of a sheet, running duplicate detection.
///
/// The five-line save is best effort, not transactional: the first failing
/// row aborts the call and rows already written stay written. Two
/// concurrent saves of the same citizen DPI are not mutually excluded; both
/// can pass the duplicate probe and persist a DPI-holding status.
pub struct AdhesionRecorder<S, A>
where
    S: SheetStore,
    A: AdhesionStore,
{
    sheets: Arc<S>,
    adhesions: Arc<A>,
}

impl<S, A> AdhesionRecorder<S, A>
where
    S: SheetStore,
    A: AdhesionStore,
{
    pub fn new(sheets: Arc<S>, adhesions: Arc<A>) -> Self {
        Self { sheets, adhesions }
    }

    /// Resolves a sheet by number together with its lines, ordered by
    /// position. Requires the administrator or data-entry role.
    pub async fn sheet_lines(&self, ctx: &CallerContext, sheet_number: u64) -> SheetLinesResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator, Role::DataEntry]) {
            return SheetLinesResult {
                sheet_id: None,
                lines: None,
                error: Some(e.to_string()),
            };
        }
        match self.sheet_lines_inner(sheet_number).await {
            Ok((sheet_id, lines)) => SheetLinesResult {
                sheet_id: Some(sheet_id),
                lines: Some(lines),
                error: None,
            },
            Err(e) => SheetLinesResult {
                sheet_id: None,
                lines: None,
                error: Some(e.to_string()),
            },
        }
    }

    async fn sheet_lines_inner(
        &self,
        sheet_number: u64,
    ) -> EngineResult<(SheetId, Vec<AdhesionLine>)> {
        let sheet = self
            .sheets
            .find_sheet_by_number(sheet_number)
            .await?
            .ok_or(EngineError::SheetNotFound)?;
        let lines = self.adhesions.list_lines_by_sheet(sheet.id).await?;
        Ok((sheet.id, lines))
    }

    /// Lines of a sheet by storage id, for detail views. Requires the
    /// administrator, data-entry, or auditor role.
    pub async fn lines_by_sheet_id(
        &self,
        ctx: &CallerContext,
        sheet_id: SheetId,
    ) -> DataResult<Vec<AdhesionLine>> {
        if let Err(e) = require_role(
            ctx,
            &[Role::Administrator, Role::DataEntry, Role::Auditor],
        ) {
            return DataResult::fail(e);
        }
        match self.adhesions.list_lines_by_sheet(sheet_id).await {
            Ok(lines) => DataResult::ok(lines),
            Err(e) => DataResult::fail(e),
        }
    }

    /// Validates and persists the five lines of a sheet.
    ///
    /// A line declared PENDIENTE or ACEPTADO whose citizen DPI already
    /// holds a line on another sheet is downgraded to RECHAZADO_INTERNO and
    /// reported in `duplicate_alerts` — an override, not a failure. The
    /// rejection cause is persisted only for rejection outcomes and cleared
    /// otherwise. Requires the administrator or data-entry role.
    pub async fn save_lines(
        &self,
        ctx: &CallerContext,
        sheet_number: u64,
        lines: Vec<AdhesionLineInput>,
    ) -> SaveAdhesionsResult {
        if let Err(e) = require_role(ctx, &[Role::Administrator, Role::DataEntry]) {
            return SaveAdhesionsResult {
                success: false,
                error: Some(e.to_string()),
                duplicate_alerts: Vec::new(),
            };
        }

        let mut duplicate_alerts = Vec::new();
        match self
            .save_lines_inner(sheet_number, lines, &mut duplicate_alerts)
            .await
        {
            Ok(()) => SaveAdhesionsResult {
                success: true,
                error: None,
                duplicate_alerts,
            },
            Err(e) => SaveAdhesionsResult {
                success: false,
                error: Some(e.to_string()),
                duplicate_alerts,
            },
        }
    }

    async fn save_lines_inner(
        &self,
        sheet_number: u64,
        lines: Vec<AdhesionLineInput>,
        duplicate_alerts: &mut Vec<String>,
    ) -> EngineResult<()> {
        if lines.len() != LINES_PER_SHEET as usize {
            return Err(EngineError::Validation(
                "Debe enviar exactamente 5 líneas de adhesión.".to_string(),
            ));
        }
        for (i, line) in lines.iter().enumerate() {
            let expected = i as u8 + 1;
            if line.line != expected {
                return Err(EngineError::Validation(format!(
                    "Línea {expected}: linea_id debe ser {expected}."
                )));
            }
        }

        let sheet = self
            .sheets
            .find_sheet_by_number(sheet_number)
            .await?
            .ok_or(EngineError::SheetNotFound)?;

        let mut resolved = Vec::with_capacity(lines.len());
        for input in lines {
            let dpi = trim_to_none(input.citizen_dpi);
            let name = trim_to_none(input.citizen_name);
            let mut status = input.status;

            if status.holds_dpi() {
                if let Some(dpi) = dpi.as_deref() {
                    let collides = self
                        .adhesions
                        .dpi_active_elsewhere(dpi, sheet.id)
                        .await
                        .map_err(|e| EngineError::LineStore {
                            line: input.line,
                            source: e,
                        })?;
                    if collides {
                        status = LegalStatus::InternalRejected;
                        duplicate_alerts
                            .push(format!("Línea {}: Posible Duplicado (DPI {dpi}).", input.line));
                        tracing::warn!(
                            sheet_number,
                            line = input.line,
                            "duplicate DPI downgraded to internal rejection"
                        );
                    }
                }
            }

            let cause = if status.is_rejection() {
                input.cause
            } else {
                None
            };
            resolved.push((input.line, dpi, name, status, cause));
        }

        let existing = self.adhesions.list_lines_by_sheet(sheet.id).await?;

        for (line, dpi, name, status, cause) in resolved {
            let write = match existing.iter().find(|l| l.line == line) {
                Some(current) => {
                    let mut updated = current.clone();
                    updated.citizen_dpi = dpi;
                    updated.citizen_name = name;
                    updated.status = status;
                    updated.cause = cause;
                    self.adhesions.update_line(&updated).await
                }
                None => self
                    .adhesions
                    .insert_line(NewAdhesionLine {
                        sheet_id: sheet.id,
                        line,
                        citizen_dpi: dpi,
                        citizen_name: name,
                        status,
                        cause,
                    })
                    .await
                    .map(|_| ()),
            };
            write.map_err(|e| EngineError::LineStore { line, source: e })?;
        }

        Ok(())
    }
}

fn trim_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
