//! # Core Domain Entities
//!
//! Petition-control records and their enumeration value objects. Enum wire
//! keywords are the canonical uppercase Spanish values carried by ruling
//! datasets and by the relational store.
//!
//! ## Clusters
//!
//! - **People**: [`Leader`]
//! - **Paper**: [`Sheet`], [`AdhesionLine`]
//! - **Value objects**: [`SheetState`], [`LegalStatus`], [`RejectionCause`],
//!   [`Activity`], [`LeaderStatus`]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of adhesion lines on every physical sheet.
pub const LINES_PER_SHEET: u8 = 5;

/// Storage identity of a leader record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderId(pub Uuid);

/// Storage identity of a sheet record, distinct from its business number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetId(pub Uuid);

/// Storage identity of an adhesion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdhesionId(pub Uuid);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

impl_id!(LeaderId);
impl_id!(SheetId);
impl_id!(AdhesionId);

/// Physical custody state of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SheetState {
    /// Printed and assigned, not yet handed to the leader.
    #[default]
    #[serde(rename = "PENDIENTE_ENTREGA")]
    PendingDelivery,
    /// Out in the field collecting signatures.
    #[serde(rename = "CIRCULACION")]
    Circulation,
    /// Physically returned by the leader.
    #[serde(rename = "RECIBIDA")]
    Received,
    /// Forwarded to the electoral tribunal for review.
    #[serde(rename = "EN_TSE")]
    InTse,
    /// Ruling applied and archived.
    #[serde(rename = "PROCESADA")]
    Processed,
}

impl SheetState {
    pub const ALL: [SheetState; 5] = [
        SheetState::PendingDelivery,
        SheetState::Circulation,
        SheetState::Received,
        SheetState::InTse,
        SheetState::Processed,
    ];

    /// Canonical wire keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetState::PendingDelivery => "PENDIENTE_ENTREGA",
            SheetState::Circulation => "CIRCULACION",
            SheetState::Received => "RECIBIDA",
            SheetState::InTse => "EN_TSE",
            SheetState::Processed => "PROCESADA",
        }
    }

    /// Exact keyword match; callers normalize first.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == keyword)
    }
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal-validity outcome of an adhesion line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LegalStatus {
    /// Captured but not yet adjudicated.
    #[default]
    #[serde(rename = "PENDIENTE")]
    Pending,
    /// Accepted by the tribunal.
    #[serde(rename = "ACEPTADO")]
    Accepted,
    /// Rejected by the tribunal, with a cause.
    #[serde(rename = "RECHAZADO")]
    Rejected,
    /// Under tribunal review.
    #[serde(rename = "REVISION_TSE")]
    TseReview,
    /// Line left blank on the physical sheet.
    #[serde(rename = "OMITIDO")]
    Omitted,
    /// Downgraded by the engine's duplicate detection, never by a ruling
    /// operator.
    #[serde(rename = "RECHAZADO_INTERNO")]
    InternalRejected,
}

impl LegalStatus {
    pub const ALL: [LegalStatus; 6] = [
        LegalStatus::Pending,
        LegalStatus::Accepted,
        LegalStatus::Rejected,
        LegalStatus::TseReview,
        LegalStatus::Omitted,
        LegalStatus::InternalRejected,
    ];

    /// Canonical wire keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            LegalStatus::Pending => "PENDIENTE",
            LegalStatus::Accepted => "ACEPTADO",
            LegalStatus::Rejected => "RECHAZADO",
            LegalStatus::TseReview => "REVISION_TSE",
            LegalStatus::Omitted => "OMITIDO",
            LegalStatus::InternalRejected => "RECHAZADO_INTERNO",
        }
    }

    /// Exact keyword match; callers normalize first.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == keyword)
    }

    /// Both rejection variants count as rejected everywhere: analytics,
    /// cause persistence, fraud percentages.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LegalStatus::Rejected | LegalStatus::InternalRejected)
    }

    /// States that block the same citizen DPI from appearing on another
    /// sheet.
    pub fn holds_dpi(&self) -> bool {
        matches!(self, LegalStatus::Pending | LegalStatus::Accepted)
    }
}

impl fmt::Display for LegalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed set of tribunal rejection causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionCause {
    /// Citizen not found in the voter registry.
    #[serde(rename = "NO_EMPADRONADO")]
    NotRegistered,
    /// Signature does not match the registry sample.
    #[serde(rename = "FIRMA_NO_COINCIDE")]
    SignatureMismatch,
    /// Data-entry mistake.
    #[serde(rename = "ERROR_CAPTURA")]
    CaptureError,
    /// Required fields missing on the physical line.
    #[serde(rename = "DATOS_INCOMPLETOS")]
    IncompleteData,
    /// Citizen already adhered elsewhere.
    #[serde(rename = "DUPLICADO")]
    Duplicate,
    /// Fingerprint impression instead of a signature.
    #[serde(rename = "IMPRESION_DACTILAR")]
    FingerprintImpression,
    /// Entire sheet filled by one hand ("plana").
    #[serde(rename = "PLANA")]
    BlankForm,
    /// Citizen is affiliated to another party.
    #[serde(rename = "AFILIADO")]
    PartyAffiliated,
    /// Registry update pending for the citizen.
    #[serde(rename = "ACTUALIZACION_PADRON")]
    RegistryUpdate,
}

impl RejectionCause {
    pub const ALL: [RejectionCause; 9] = [
        RejectionCause::NotRegistered,
        RejectionCause::SignatureMismatch,
        RejectionCause::CaptureError,
        RejectionCause::IncompleteData,
        RejectionCause::Duplicate,
        RejectionCause::FingerprintImpression,
        RejectionCause::BlankForm,
        RejectionCause::PartyAffiliated,
        RejectionCause::RegistryUpdate,
    ];

    /// Canonical wire keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionCause::NotRegistered => "NO_EMPADRONADO",
            RejectionCause::SignatureMismatch => "FIRMA_NO_COINCIDE",
            RejectionCause::CaptureError => "ERROR_CAPTURA",
            RejectionCause::IncompleteData => "DATOS_INCOMPLETOS",
            RejectionCause::Duplicate => "DUPLICADO",
            RejectionCause::FingerprintImpression => "IMPRESION_DACTILAR",
            RejectionCause::BlankForm => "PLANA",
            RejectionCause::PartyAffiliated => "AFILIADO",
            RejectionCause::RegistryUpdate => "ACTUALIZACION_PADRON",
        }
    }

    /// Exact keyword match; callers normalize first.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == keyword)
    }

    /// Causes statistically associated with falsification.
    pub fn is_fraud_indicator(&self) -> bool {
        matches!(
            self,
            RejectionCause::FingerprintImpression
                | RejectionCause::BlankForm
                | RejectionCause::SignatureMismatch
        )
    }
}

impl fmt::Display for RejectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a leader is currently working the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Activity {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Active => "activo",
            Activity::Inactive => "inactivo",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Soft-delete lifecycle of a leader record.
///
/// Deleted leaders stay in the store; every leader-reading operation must
/// pattern-match this and decide what a deleted leader means for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LeaderStatus {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl LeaderStatus {
    pub fn is_deleted(&self) -> bool {
        matches!(self, LeaderStatus::Deleted { .. })
    }
}

/// A field organizer to whom sheet blocks are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub id: LeaderId,
    pub name: String,
    pub zone: Option<String>,
    /// National identity document number. Unique across leaders.
    pub dpi: String,
    pub activity: Activity,
    pub status: LeaderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Leader {
    /// Active for analytics purposes: working the field and not
    /// soft-deleted.
    pub fn is_active(&self) -> bool {
        self.activity == Activity::Active && !self.status.is_deleted()
    }
}

/// A physical petition form with five signature lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub id: SheetId,
    /// Business key. Globally unique, assigned in contiguous blocks.
    pub sheet_number: u64,
    pub leader_id: LeaderId,
    pub state: SheetState,
    pub assigned_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
}

/// One signature slot on a sheet.
///
/// Lines 1-5 are created together with their sheet and only ever updated in
/// place, never inserted or deleted individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhesionLine {
    pub id: AdhesionId,
    pub sheet_id: SheetId,
    /// Position on the sheet, 1-5, unique within the sheet.
    pub line: u8,
    pub citizen_dpi: Option<String>,
    pub citizen_name: Option<String>,
    pub status: LegalStatus,
    /// Populated only while `status` is a rejection variant.
    pub cause: Option<RejectionCause>,
}
