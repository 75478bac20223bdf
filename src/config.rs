use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// ALRA configuration. Loaded once at startup and passed explicitly into
/// each component; no ambient environment reads mid-pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Hosted language model settings (Groq OpenAI-compatible endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; may also be supplied via GROQ_API_KEY at load time
    pub api_key: Option<String>,
    /// Chat completions base URL
    pub base_url: String,
    /// Model used for generation, reasoning and classification
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
        }
    }
}

/// Vector store and interaction log locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Qdrant endpoint URL
    pub qdrant_url: String,
    /// Collection holding paper chunks
    pub collection: String,
    /// Interaction log path (JSON array on disk)
    pub log_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: "papers".to_string(),
            log_file: PathBuf::from("eval_logs.json"),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    /// GROQ_API_KEY in the environment overrides the file value; the override
    /// happens here, exactly once.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            if !key.is_empty() {
                config.provider.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&config_path, toml_string)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .context("Could not determine home directory")?;

        Ok(home.join(".alra").join("config.toml"))
    }

    /// Validate the configuration for pipeline use. A missing API key is
    /// fatal: reasoning, generation and classification all need it and no
    /// fallback is meaningful.
    pub fn validate(&self) -> crate::errors::Result<()> {
        match &self.provider.api_key {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(crate::errors::AlraError::ConfigError(
                "No API key configured. Set GROQ_API_KEY or add `api_key` under [provider] in ~/.alra/config.toml".to_string(),
            )),
        }
    }

    /// API key after validation
    pub fn api_key(&self) -> &str {
        self.provider.api_key.as_deref().unwrap_or("")
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: ProviderConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert_eq!(config.storage.collection, "papers");
    }

    #[test]
    fn test_validate_rejects_missing_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let mut config = Config::default();
        config.provider.api_key = Some("   ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_key() {
        let mut config = Config::default();
        config.provider.api_key = Some("gsk_test".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.api_key(), "gsk_test");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.provider.api_key = Some("gsk_test".to_string());

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("gsk_test"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(deserialized.provider.api_key.as_deref(), Some("gsk_test"));
    }
}
