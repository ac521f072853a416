//! # sca-engine
//!
//! Sheet/Adhesion lifecycle and reconciliation engine.
//!
//! ## Role in System
//!
//! - **Sheet Allocator**: block allocation of numbered sheets, five blank
//!   adhesion lines per sheet
//! - **Custody State Machine**: physical custody transitions and the
//!   administrative override
//! - **Adhesion Recorder**: five-line capture with cross-sheet duplicate
//!   detection
//! - **Ruling Reconciler**: tabular ruling ingestion matched by
//!   sheet-number and line
//! - **Analytics**: per-leader KPIs, fraud thresholds, dashboard summary
//! - **Leader Directory**: leader creation, edits, soft delete
//!
//! Every operation is an independent request/response procedure over the
//! entity-store ports in [`ports`]. Callers receive result values; nothing
//! is raised across the public boundary. The store's row-level atomicity is
//! the only concurrency safety net: overlapping invocations are not
//! mutually excluded.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::*;
