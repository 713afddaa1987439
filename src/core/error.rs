//! Error types for the zone engine.
//!
//! Internal operations return [`Result`]. The by-name API surface turns
//! these into `false`/`None` after logging, since its callers are
//! untrusted plugins and scripts.

/// Errors produced while defining, editing, or loading zones.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    /// A flag name that is not in the flag table.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    /// A zone id that is not registered.
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// Linking `zone` under `parent` would make a zone its own ancestor.
    #[error("zone {zone} cannot use {parent} as parent: ancestor chain loops")]
    ParentCycle { zone: String, parent: String },

    /// A definition field with an unparseable or unknown value.
    #[error("invalid value {value:?} for field {field}")]
    InvalidField { field: String, value: String },

    /// A field argument with no value following it.
    #[error("missing value for field {0}")]
    MissingValue(String),

    /// Geometry that cannot contain anything (zero or non-finite extent).
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Definition snapshot encoding or decoding failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),
}

impl ZoneError {
    /// Shorthand for an `InvalidField` error.
    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        ZoneError::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ZoneError>;
