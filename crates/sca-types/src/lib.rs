//! # sca-types
//!
//! Shared domain vocabulary for the SCA (Sistema de Control de Adhesiones)
//! engine.
//!
//! ## Role in System
//!
//! - **Ubiquitous Language**: entity records and enumeration value objects
//!   shared by every service
//! - **Caller Identity**: explicit [`CallerContext`] plus the role check
//!   invoked at the top of every operation
//! - **Store Contract**: the [`StoreError`] surface every store port returns

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
