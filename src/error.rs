//! Error type shared by tables, the sequence codec and the parameter archive
//!
//! Every invariant violation surfaces as one of these variants immediately.
//! Nothing in this crate retries or substitutes defaults on failure.

/// Errors raised while building, reading, writing or persisting parameter data
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// Column names in the data do not match the keys of the unit map
    #[error("Schema error: {0}")]
    Schema(String),

    /// Row counts disagree, an index is out of range, or a sequence does not fit its buffer
    #[error("Shape error: {0}")]
    Shape(String),

    /// A unit-bearing value is incompatible with a column, or a plain value targets a unit column
    #[error("Units do not match: {0}")]
    UnitMismatch(String),

    /// The assigned value is neither a quantity nor a plain array
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Element kinds differ (e.g. text assigned to a numeric column)
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A referenced column, symbol or biological cross-reference is missing
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Stored data does not match its recorded checksum
    #[error("Integrity verification failed: {0}")]
    Integrity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn unit_mismatch(message: impl Into<String>) -> Self {
        Self::UnitMismatch(message.into())
    }

    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup(message.into())
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch(message.into())
    }
}
