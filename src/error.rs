//! Error types for relalg.
//!
//! Query problems are reported as [`crate::validator::ValidationError`] values.
//! `RelalgError` covers everything around them: schema catalogs, config files, IO.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for relalg operations.
#[derive(Debug, Error)]
pub enum RelalgError {
    /// A schema definition violates the catalog invariants.
    #[error("Schema error: {0}")]
    Schema(String),

    /// No built-in schema with this name.
    #[error("Unknown built-in schema: '{0}'. Expected: store or sales")]
    UnknownSchema(String),

    /// Unknown output notation.
    #[error("Invalid notation: '{0}'. Expected: unicode or latex")]
    InvalidNotation(String),

    /// A TOML document could not be decoded.
    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelalgError {
    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Wrap a TOML decoding failure for the given file.
    pub fn toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for relalg operations.
pub type RelalgResult<T> = Result<T, RelalgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelalgError::schema("duplicate table 'cliente'");
        assert_eq!(err.to_string(), "Schema error: duplicate table 'cliente'");

        let err = RelalgError::UnknownSchema("erp".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown built-in schema: 'erp'. Expected: store or sales"
        );
    }
}
