//! Configuration resolution for notekeep
//!
//! Settings resolve ENV → TOML → compiled default. The inference-service
//! credential is externally provisioned (never entered through the UI).

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

use crate::services::transcription::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_PORT: u16 = 5740;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Optional TOML config file contents (`notekeep.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    pub db_path: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub db_path: PathBuf,
    pub port: u16,
}

impl Settings {
    /// Resolve all settings from environment and TOML config.
    pub fn resolve() -> Result<Self, ConfigError> {
        let toml_config = load_toml_config();

        let openai_api_key = resolve_api_key(&toml_config)?;

        let openai_base_url = std::env::var("NOTEKEEP_OPENAI_BASE_URL")
            .ok()
            .or_else(|| toml_config.openai_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let openai_model = std::env::var("NOTEKEEP_OPENAI_MODEL")
            .ok()
            .or_else(|| toml_config.openai_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let db_path = std::env::var("NOTEKEEP_DB_PATH")
            .ok()
            .map(PathBuf::from)
            .or_else(|| toml_config.db_path.clone().map(PathBuf::from))
            .unwrap_or_else(default_db_path);

        let port = match std::env::var("NOTEKEEP_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::Config(format!("Invalid NOTEKEEP_PORT: {}", e)))?,
            Err(_) => toml_config.port.unwrap_or(DEFAULT_PORT),
        };

        Ok(Self {
            openai_api_key,
            openai_base_url,
            openai_model,
            db_path,
            port,
        })
    }
}

/// Resolve the inference-service API key, ENV taking priority over TOML.
fn resolve_api_key(toml_config: &TomlConfig) -> Result<String, ConfigError> {
    let env_key = std::env::var("NOTEKEEP_OPENAI_API_KEY")
        .ok()
        .filter(|key| is_valid_key(key));
    let toml_key = toml_config
        .openai_api_key
        .clone()
        .filter(|key| is_valid_key(key));

    if env_key.is_some() && toml_key.is_some() {
        warn!("OpenAI API key found in both environment and TOML. Using environment (highest priority).");
    }

    if let Some(key) = env_key {
        info!("OpenAI API key loaded from environment variable");
        return Ok(key);
    }

    if let Some(key) = toml_key {
        info!("OpenAI API key loaded from TOML config");
        return Ok(key);
    }

    Err(ConfigError::Config(
        "OpenAI API key not configured. Please configure using one of:\n\
         1. Environment: NOTEKEEP_OPENAI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/notekeep/notekeep.toml (openai_api_key = \"your-key\")"
            .to_string(),
    ))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Load the config file if one exists; missing or unparseable files fall
/// back to defaults with a warning.
fn load_toml_config() -> TomlConfig {
    let Some(path) = config_file_path() else {
        return TomlConfig::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Parse failed for {}: {}. Using defaults.", path.display(), e);
                TomlConfig::default()
            }
        },
        Err(e) => {
            warn!("Read failed for {}: {}. Using defaults.", path.display(), e);
            TomlConfig::default()
        }
    }
}

/// Find the first existing config file: ~/.config/notekeep/notekeep.toml,
/// then /etc/notekeep/notekeep.toml.
fn config_file_path() -> Option<PathBuf> {
    if let Some(user_config) = dirs::config_dir().map(|d| d.join("notekeep").join("notekeep.toml"))
    {
        if user_config.exists() {
            return Some(user_config);
        }
    }

    let system_config = PathBuf::from("/etc/notekeep/notekeep.toml");
    if system_config.exists() {
        return Some(system_config);
    }

    None
}

/// OS-dependent default database location
fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("notekeep"))
        .unwrap_or_else(|| PathBuf::from("./notekeep_data"))
        .join("notekeep.db")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("sk-abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_toml_config_parses_partial_file() {
        let config: TomlConfig = toml::from_str(r#"openai_api_key = "sk-test""#).unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert!(config.db_path.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn test_toml_config_full_file() {
        let config: TomlConfig = toml::from_str(
            r#"
            openai_api_key = "sk-test"
            openai_base_url = "http://localhost:9999/v1"
            openai_model = "gpt-4o-mini"
            db_path = "/tmp/notekeep.db"
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.openai_model.as_deref(), Some("gpt-4o-mini"));
    }
}
