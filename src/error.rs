//! Error types shared by every component that touches the store.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// A specialized [`Result`](std::result::Result) for campus event operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from registry, relationship, and report operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or empty, or a value was out of its allowed range.
    #[error("{0}")]
    Validation(String),

    /// A supplied identifier does not name an existing entity.
    #[error("{0}")]
    Reference(String),

    /// A uniqueness constraint would be violated. Holds what was duplicated.
    #[error("Duplicate {0}")]
    Duplicate(&'static str),

    /// The store rejected or failed a query for a reason clients cannot fix.
    #[error("store error: {0}")]
    Store(#[from] DieselError),

    /// No pooled connection could be handed out.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    /// A blocking worker panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] about a missing or blank field.
    pub fn missing(field: &str) -> Self {
        Self::Validation(format!("missing field `{field}`"))
    }

    /// Shorthand for a [`Error::Reference`] to an entity that does not exist.
    pub fn unknown(entity: &str, id: i32) -> Self {
        Self::Reference(format!("unknown {entity} {id}"))
    }

    /// Classifies a failed insert.
    ///
    /// Constraint violations map onto the matching taxonomy member; `duplicate` names what a
    /// uniqueness violation means for this particular insert. Everything else stays a store error.
    pub(crate) fn from_insert(err: DieselError, duplicate: &'static str) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::Duplicate(duplicate)
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::Reference(info.message().to_string())
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation,
                info,
            ) => Self::Validation(info.message().to_string()),
            other => Self::Store(other),
        }
    }

    /// Machine-readable reason reported to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Reference(_) => "reference",
            Self::Duplicate(_) => "duplicate",
            Self::Store(_) | Self::Pool(_) | Self::Task(_) => "internal",
        }
    }

    /// Whether the caller caused this error (and may fix it by changing the request).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Reference(_) | Self::Duplicate(_)
        )
    }
}

/// Returns `value` untouched if it holds anything besides whitespace, or a validation error
/// naming `field`.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(Error::missing(field))
    } else {
        Ok(value)
    }
}
