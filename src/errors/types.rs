//! Error types for the iodine library itself
//!
//! Annotation and capture never fail. The only fallible surfaces are rendering
//! to JSON, parsing rendered reports back, and loading configuration. Errors
//! that callers wrap inside an [`AnnotatedError`](crate::AnnotatedError) are
//! payloads, not failures of this library, and never appear here.

use thiserror::Error;
use std::path::PathBuf;

/// Library error type
#[derive(Error, Debug)]
pub enum IodineError {
    #[error("JSON serialization error: {context}")]
    Serialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("JSON deserialization error: {context}")]
    Deserialization {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
    },

    #[error("File I/O error for '{path}': {operation}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Convenience type alias for Results using IodineError
pub type IodineResult<T> = Result<T, IodineError>;

impl IodineError {
    /// Create a new Serialization error with source
    pub fn serialization_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Serialization {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new ConfigParse error with source
    pub fn config_parse_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new I/O error with source
    pub fn io_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Serialization { .. } | Self::Deserialization { .. } => "serialization",
            Self::ConfigParse { .. } | Self::ConfigNotFound { .. } => "config",
            Self::Io { .. } => "io",
        }
    }
}

impl From<serde_json::Error> for IodineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() {
            Self::Deserialization {
                context: format!("JSON syntax error at line {} column {}",
                    err.line(), err.column()),
                source: Some(Box::new(err)),
            }
        } else if err.is_data() {
            Self::Deserialization {
                context: "JSON data error".to_string(),
                source: Some(Box::new(err)),
            }
        } else if err.is_eof() {
            Self::Deserialization {
                context: "Unexpected end of JSON input".to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            Self::Serialization {
                context: "JSON serialization error".to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

impl From<toml::de::Error> for IodineError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
