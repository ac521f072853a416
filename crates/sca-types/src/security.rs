//! Caller identity and role checks.
//!
//! Operations receive an explicit [`CallerContext`] instead of consulting
//! ambient session state. The surrounding application authenticates the
//! session and builds the context before calling in; the engine only ever
//! checks it against the roles an operation permits.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full control: allocation, custody, data entry, directory, analytics.
    #[serde(rename = "administrador")]
    Administrator,
    /// Captures adhesion lines and imports ruling datasets.
    #[serde(rename = "digitador")]
    DataEntry,
    /// Read-only access to analytics.
    #[serde(rename = "auditor")]
    Auditor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "administrador",
            Role::DataEntry => "digitador",
            Role::Auditor => "auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the caller as resolved by the surrounding application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// `None` when the caller is not authenticated or has no profile.
    pub role: Option<Role>,
}

impl CallerContext {
    pub fn with_role(role: Role) -> Self {
        Self { role: Some(role) }
    }

    pub fn anonymous() -> Self {
        Self { role: None }
    }
}

/// Access-check failures.
///
/// Operations render these into their result values; they are never raised
/// across the public boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("No autenticado o sin perfil.")]
    NotAuthenticated,

    #[error("Acceso denegado. Se requiere uno de los roles: {required}.")]
    Denied { required: String },
}

/// Returns the caller's role when it is one of `allowed`.
///
/// Always the first thing an operation does, before any store access.
pub fn require_role(ctx: &CallerContext, allowed: &[Role]) -> Result<Role, AccessError> {
    let role = ctx.role.ok_or(AccessError::NotAuthenticated)?;
    if allowed.contains(&role) {
        Ok(role)
    } else {
        Err(AccessError::Denied {
            required: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}
