//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`InventoryError`] via `#[from]`.

use std::fmt;

/// A required field of the registration payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// The top-level device `id`.
    Id,
    /// The `name` of an entry in `attributes`.
    AttributeName,
}

impl RequiredField {
    /// Path of the field inside the request document.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::AttributeName => "attributes[].name",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("'id' field required"),
            Self::AttributeName => f.write_str("attribute 'name' field required"),
        }
    }
}

/// Why a registration payload was rejected.
///
/// The `Display` output is what the HTTP layer returns to the client, so
/// the wording is stable.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to decode request body: JSON payload is empty")]
    EmptyBody,

    #[error("failed to decode request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("{0}")]
    MissingField(RequiredField),

    #[error("invalid attribute value provided")]
    InvalidAttributeValue,
}

/// Returned when a lookup by identifier finds nothing.
#[derive(Debug, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Top-level error for application use-cases.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Opaque failure reported by the persistence layer.
    #[error("{0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}
