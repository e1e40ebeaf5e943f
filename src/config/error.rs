use crate::notify::Provider;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup failures. Each names the offending file, field or value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}. Create it or pass --config.", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {field} = {value}: {reason}")]
    Invalid {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Provider '{provider}' requires {fields}")]
    MissingCredentials {
        provider: Provider,
        fields: &'static str,
    },

    #[error("No templates configured")]
    NoTemplates,

    #[error("Preset '{name}' has no templates")]
    NoPresetTemplates { name: String },

    #[error("Template image(s) not found: {paths}")]
    TemplatesNotFound { paths: String },

    #[error("Unknown preset '{name}' (available: {available})")]
    UnknownPreset { name: String, available: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {source}")]
    Serialize { source: toml::ser::Error },
}

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
