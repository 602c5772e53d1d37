use crate::errors::{IodineError, IodineResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for error annotation and rendering
///
/// Every section and field has a default, so an empty document is valid.
///
/// # Example
///
/// ```rust
/// use iodine::config::{IodineConfig, OutputFormat};
///
/// let config = IodineConfig::from_toml_str(r#"
///     [capture]
///     host_override = "storage-node-1"
///
///     [render]
///     format = "text"
/// "#).unwrap();
///
/// assert_eq!(config.render.format, OutputFormat::Text);
/// assert!(config.capture.resolve_host);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IodineConfig {
    pub capture: CaptureConfig,
    pub render: RenderConfig,
    pub logging: LoggingConfig,
}

/// Controls what goes into each stack entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Look up the machine hostname for every entry
    pub resolve_host: bool,
    /// Fixed host name, takes precedence over lookup
    pub host_override: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// Output encoding for a rendered error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    PrettyJson,
    Text,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            resolve_host: true,
            host_override: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

impl IodineConfig {
    /// Parses configuration from a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`IodineError::ConfigParse`] if the document is not valid TOML
    /// or a field has the wrong type (for example an unknown output format).
    pub fn from_toml_str(content: &str) -> IodineResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads configuration from a TOML file
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The content cannot be parsed
    pub fn load(path: &Path) -> IodineResult<Self> {
        if !path.exists() {
            return Err(IodineError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)
            .map_err(|e| IodineError::io_with_source(path, "read config file", e))?;
        Self::from_toml_str(&content)
    }

    /// Serializes the configuration back to TOML
    pub fn to_toml_string(&self) -> IodineResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| IodineError::config_parse_with_source("Failed to serialize config", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = IodineConfig::from_toml_str("").unwrap();

        assert_eq!(config, IodineConfig::default());
        assert!(config.capture.resolve_host);
        assert_eq!(config.render.format, OutputFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections() {
        let config = IodineConfig::from_toml_str(
            r#"
            [capture]
            resolve_host = false

            [render]
            format = "pretty_json"
            "#,
        )
        .unwrap();

        assert!(!config.capture.resolve_host);
        assert_eq!(config.capture.host_override, None);
        assert_eq!(config.render.format, OutputFormat::PrettyJson);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = IodineConfig::from_toml_str("[render]\nformat = \"xml\"\n");

        match result {
            Err(IodineError::ConfigParse { message, source }) => {
                assert!(message.contains("xml"), "unexpected message: {}", message);
                assert!(source.is_some());
            }
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_file_reports_its_path() {
        let dir = tempfile::TempDir::new().unwrap();

        match IodineConfig::load(dir.path()) {
            Err(IodineError::Io { path, operation, source }) => {
                assert_eq!(path, dir.path());
                assert_eq!(operation, "read config file");
                assert!(source.is_some());
            }
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = IodineConfig::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = IodineConfig::load(&dir.path().join("iodine.toml"));

        assert!(matches!(result, Err(IodineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = IodineConfig::default();
        config.capture.host_override = Some("node-7".to_string());
        config.render.format = OutputFormat::Text;

        let content = config.to_toml_string().unwrap();
        assert_eq!(IodineConfig::from_toml_str(&content).unwrap(), config);
    }
}
