//! Configuration management for cv-tailor
//!
//! The API key is never part of the configuration.

use crate::error::{Result, TailorError};
use crate::llm::retry::{Backoff, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::llm::Tone;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_ATTEMPTS_CEILING: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_id: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub default_tone: Tone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_id: "gemini-1.5-flash".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
            temperature: None,
            max_output_tokens: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Backoff::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            default_tone: Tone::Professional,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.backoff)
    }
}

impl Config {
    /// Loads `path` if given (it must exist), otherwise the default location
    /// if a file is there, otherwise built-in defaults. Never writes.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TailorError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| TailorError::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TailorError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("cv-tailor")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        // The model id becomes a URL path segment.
        let model_id = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]*$")
            .map_err(|e| TailorError::Configuration(e.to_string()))?;
        if !model_id.is_match(&self.model.model_id) {
            return Err(TailorError::Configuration(format!(
                "Invalid model id: '{}'",
                self.model.model_id
            )));
        }

        if !self.model.api_base_url.starts_with("http://")
            && !self.model.api_base_url.starts_with("https://")
        {
            return Err(TailorError::Configuration(format!(
                "API base URL must be http(s): '{}'",
                self.model.api_base_url
            )));
        }

        if self.model.timeout_secs == 0 {
            return Err(TailorError::Configuration(
                "model.timeout_secs must be positive".to_string(),
            ));
        }

        if let Some(temperature) = self.model.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(TailorError::Configuration(format!(
                    "model.temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }

        if !(1..=MAX_ATTEMPTS_CEILING).contains(&self.retry.max_attempts) {
            return Err(TailorError::Configuration(format!(
                "retry.max_attempts must be between 1 and {}, got {}",
                MAX_ATTEMPTS_CEILING, self.retry.max_attempts
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.model.model_id, "gemini-1.5-flash");
        assert_eq!(config.retry.policy().max_attempts(), 4);
        assert_eq!(config.retry.policy().backoff().delay(0), Duration::from_secs(20));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml(
            r#"
            [model]
            model_id = "gemini-1.5-pro"

            [retry]
            max_attempts = 5
            backoff = { shape = "exponential", offset_secs = 2 }
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.model.model_id, "gemini-1.5-pro");
        assert_eq!(config.model.timeout_secs, 120);
        assert_eq!(config.retry.backoff, Backoff::Exponential { offset_secs: 2 });
        assert_eq!(config.output.format, OutputFormat::Console);
    }

    #[test]
    fn test_attempt_ceiling_is_enforced() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
        config.retry.max_attempts = MAX_ATTEMPTS_CEILING + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_id_cannot_escape_path() {
        let mut config = Config::default();
        config.model.model_id = "../../v1/files".to_string();
        assert!(matches!(config.validate(), Err(TailorError::Configuration(_))));
    }

    #[test]
    fn test_save_then_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.output.default_tone = Tone::Technical;

        config.save(&path).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, TailorError::Configuration(_)));
    }
}
