//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Malformed catalog queries are NOT
//! errors: the query engine folds them into its text response.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the reservation tools.
#[derive(Error, Debug)]
pub enum Error {
    /// A required tool parameter was absent from the call.
    #[error("missing required parameter: {0}")]
    ParameterMissing(String),

    /// A tool parameter was present but could not be read as its declared type.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Lookup failure (unknown restaurant, unknown tool function).
    #[error("not found: {0}")]
    NotFound(String),

    /// A finite pool ran dry (catalog generator names).
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Catalog store, ledger or audit log failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid configuration or generator settings.
    #[error("config error: {0}")]
    Config(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Embedded database errors outside of caller-supplied query execution.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable machine-readable code, used in logs and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Error::ParameterMissing(_) => "PARAMETER_MISSING",
            Error::InvalidParameter(_) => "INVALID_PARAMETER",
            Error::NotFound(_) => "NOT_FOUND",
            Error::ResourceExhausted(_) => "RESOURCE_EXHAUSTED",
            Error::Storage(_) | Error::Database(_) | Error::Io(_) => "STORAGE",
            Error::Config(_) => "CONFIG",
            Error::Internal(_) => "INTERNAL",
            Error::Serialization(_) => "SERIALIZATION",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn parameter_missing(name: impl Into<String>) -> Self {
        Self::ParameterMissing(name.into())
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_taxonomy() {
        assert_eq!(Error::parameter_missing("sql_query").code(), "PARAMETER_MISSING");
        assert_eq!(Error::not_found("x").code(), "NOT_FOUND");
        assert_eq!(Error::resource_exhausted("x").code(), "RESOURCE_EXHAUSTED");
        assert_eq!(Error::storage("x").code(), "STORAGE");
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.code(), "STORAGE");
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::parameter_missing("main_guest_name");
        assert_eq!(err.to_string(), "missing required parameter: main_guest_name");
    }
}
