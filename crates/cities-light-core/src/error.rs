// crates/cities-light-core/src/error.rs
use crate::model::EntityKind;
use thiserror::Error;

/// Errors raised on the write path, by the importer and by snapshot I/O.
///
/// The three domain variants ([`GeoError::DuplicateKey`],
/// [`GeoError::DanglingReference`], [`GeoError::InvalidField`]) are always
/// reported per record; a rejected write leaves the store untouched.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A uniqueness rule would be violated.
    #[error("duplicate key violates unique constraint \"{constraint}\"")]
    DuplicateKey { constraint: &'static str },

    /// A referenced entity could not be resolved.
    #[error("{entity}.{field} references missing {target} #{id}")]
    DanglingReference {
        entity: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: u32,
    },

    /// A field value is out of range or malformed.
    #[error("invalid {entity}.{field}: {reason}")]
    InvalidField {
        entity: EntityKind,
        field: &'static str,
        reason: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl GeoError {
    pub fn invalid(entity: EntityKind, field: &'static str, reason: impl Into<String>) -> Self {
        GeoError::InvalidField {
            entity,
            field,
            reason: reason.into(),
        }
    }

    pub fn dangling(
        entity: EntityKind,
        field: &'static str,
        target: EntityKind,
        id: u32,
    ) -> Self {
        GeoError::DanglingReference {
            entity,
            field,
            target,
            id,
        }
    }

    /// Name of the violated constraint, if this is a [`GeoError::DuplicateKey`].
    pub fn constraint(&self) -> Option<&'static str> {
        match self {
            GeoError::DuplicateKey { constraint } => Some(constraint),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
