//! # SCA Test Suite
//!
//! Unified test crate for cross-service scenarios that exercise several
//! engine components against one shared in-memory store.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── end_to_end.rs        # Full lifecycle: allocate → receive →
//!     │                        # capture → reconcile → dashboard
//!     ├── allocation_faults.rs # Per-sheet compensation under store faults
//!     └── permissions.rs       # Role matrix across every operation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sca-tests
//! ```

#![allow(dead_code)]

pub mod integration;
