//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main okrd configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Exemplar index configuration
    pub index: IndexConfig,

    /// Reminder scheduling configuration
    pub reminder: ReminderConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }

        if self.index.chunk_overlap >= self.index.chunk_size {
            return Err(eyre::eyre!(
                "index chunk-overlap ({}) must be smaller than chunk-size ({})",
                self.index.chunk_overlap,
                self.index.chunk_size
            ));
        }

        if self.reminder.window_close_hours >= self.reminder.window_open_hours {
            return Err(eyre::eyre!(
                "reminder window-close-hours ({}) must be smaller than window-open-hours ({})",
                self.reminder.window_close_hours,
                self.reminder.window_open_hours
            ));
        }

        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .okrd.yml
        let local_config = PathBuf::from(".okrd.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/okrd/okrd.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("okrd").join("okrd.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "anthropic" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("environment variable {} is not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

/// Exemplar index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Window length in characters
    #[serde(rename = "chunk-size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive windows
    #[serde(rename = "chunk-overlap")]
    pub chunk_overlap: usize,

    /// Chunks retrieved per query
    #[serde(rename = "top-k")]
    pub top_k: usize,

    /// Plain-text corpus file, blank-line-separated documents
    #[serde(rename = "corpus-file")]
    pub corpus_file: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 4,
            corpus_file: PathBuf::from("sample_okrs.txt"),
        }
    }
}

/// Reminder scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Window closes this many hours before the deadline
    #[serde(rename = "window-close-hours")]
    pub window_close_hours: i64,

    /// Window opens this many hours before the deadline
    #[serde(rename = "window-open-hours")]
    pub window_open_hours: i64,

    /// Treat failed dispatches as sent (disables in-window retries)
    #[serde(rename = "mark-sent-on-failure")]
    pub mark_sent_on_failure: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            window_close_hours: 23,
            window_open_hours: 25,
            mark_sent_on_failure: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.index.chunk_size, 500);
        assert_eq!(config.index.chunk_overlap, 50);
        assert_eq!(config.reminder.window_close_hours, 23);
        assert_eq!(config.reminder.window_open_hours, 25);
        assert!(!config.reminder.mark_sent_on_failure);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("okrd.yml");
        std::fs::write(
            &path,
            "llm:\n  model: test-model\nindex:\n  top-k: 2\nreminder:\n  mark-sent-on-failure: true\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.llm.model, "test-model");
        assert_eq!(config.index.top_k, 2);
        assert!(config.reminder.mark_sent_on_failure);
        // Unspecified fields keep defaults
        assert_eq!(config.index.chunk_size, 500);
    }

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut config = Config::default();
        config.reminder.window_close_hours = 30;
        // API key check would trip first without this
        unsafe { std::env::set_var("OKRD_TEST_KEY", "x") };
        config.llm.api_key_env = "OKRD_TEST_KEY".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overlap_ge_chunk_size() {
        let mut config = Config::default();
        config.index.chunk_overlap = 500;
        unsafe { std::env::set_var("OKRD_TEST_KEY2", "x") };
        config.llm.api_key_env = "OKRD_TEST_KEY2".to_string();

        assert!(config.validate().is_err());
    }
}
