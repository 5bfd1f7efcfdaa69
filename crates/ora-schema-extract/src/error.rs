//! Error types for the extraction library.

use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object type outside the supported registry.
    #[error("Unsupported object type: {0}")]
    UnsupportedType(String),

    /// Oracle driver error surfaced by the metadata source.
    #[error("Metadata source error: {0}")]
    Source(#[from] oracle::Error),

    /// Metadata retrieval failed for a specific object.
    #[error("Metadata fetch failed for {object}: {message}")]
    Metadata { object: String, message: String },

    /// IO error (directory creation, file writes).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExtractError {
    /// Create a Metadata error with the object it occurred on.
    pub fn metadata(object: impl Into<String>, message: impl Into<String>) -> Self {
        ExtractError::Metadata {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for the CLI. Per-object failures never reach this
    /// path; they are recorded in the manifest instead.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractError::Config(_) => 2,
            ExtractError::UnsupportedType(_) => 2,
            ExtractError::Source(_) => 3,
            ExtractError::Metadata { .. } => 3,
            ExtractError::Io(_) => 4,
            ExtractError::Json(_) | ExtractError::Yaml(_) => 5,
        }
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
