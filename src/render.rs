//! Rendering annotated errors for log pipelines and terminals
//!
//! JSON output has two top-level fields, `ErrorMessage` and `Stack`, where each
//! stack element carries `Host`, `File`, `Line` and `Data`. The embedded error
//! is not part of the document. Text output is one header line with the
//! message followed by one line per stack entry:
//!
//! ```text
//! disk full
//! - 0 node-1:src/store.rs:88 map[volume:/data]
//! - 1 node-1:src/api.rs:12 map[request:7f3a volume:/data]
//! ```

use crate::annotated::AnnotatedError;
use crate::capture::StackEntry;
use crate::config::OutputFormat;
use crate::errors::{IodineError, IodineResult};
use crate::state::ContextData;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::error;

/// Owned, parseable form of a rendered error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorReport {
    pub error_message: String,
    pub stack: Vec<StackEntry>,
}

impl ErrorReport {
    /// Parses a document produced by [`AnnotatedError::emit_json`]
    pub fn from_json(bytes: &[u8]) -> IodineResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl From<&AnnotatedError> for ErrorReport {
    fn from(err: &AnnotatedError) -> Self {
        Self {
            error_message: err.error_message().to_string(),
            stack: err.stack().to_vec(),
        }
    }
}

impl AnnotatedError {
    /// Compact JSON document
    ///
    /// # Errors
    ///
    /// Returns [`IodineError::Serialization`] if encoding fails. Every field is
    /// a string, integer or string map, so this is not expected in practice.
    pub fn emit_json(&self) -> IodineResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| IodineError::serialization_with_source("encoding annotated error", e))
    }

    /// Indented JSON document
    pub fn emit_json_pretty(&self) -> IodineResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| IodineError::serialization_with_source("encoding annotated error", e))
    }

    /// Message line followed by one line per stack entry, oldest first
    ///
    /// The message is written as-is. A message containing newlines spans
    /// several lines, so the `len(stack) + 1` line count only holds for
    /// single-line messages.
    pub fn emit_human_readable(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", self);
        for (index, entry) in self.stack().iter().enumerate() {
            let _ = writeln!(out, "- {} {} {}", index, entry.location(), format_data(&entry.data));
        }
        out
    }

    /// Renders in the requested format
    pub fn emit(&self, format: OutputFormat) -> IodineResult<String> {
        let bytes = match format {
            OutputFormat::Json => self.emit_json()?,
            OutputFormat::PrettyJson => self.emit_json_pretty()?,
            OutputFormat::Text => return Ok(self.emit_human_readable()),
        };
        String::from_utf8(bytes)
            .map_err(|e| IodineError::serialization_with_source("JSON output is not UTF-8", e))
    }

    /// Emits the error as a structured `tracing` event at error level
    pub fn log(&self) {
        match self.emit_json() {
            Ok(bytes) => error!(
                error_message = %self.error_message(),
                depth = self.depth(),
                report = %String::from_utf8_lossy(&bytes),
                "annotated error"
            ),
            Err(e) => error!(
                error_message = %self.error_message(),
                depth = self.depth(),
                category = e.category(),
                "annotated error could not be encoded"
            ),
        }
    }

    /// Owned report view of this error
    pub fn report(&self) -> ErrorReport {
        ErrorReport::from(self)
    }
}

/// `map[k1:v1 k2:v2]`, keys in order
fn format_data(data: &ContextData) -> String {
    let pairs: Vec<String> = data.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
    format!("map[{}]", pairs.join(" "))
}
