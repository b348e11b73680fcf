use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::MenuError;

/// Runtime settings for the digitization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Recognizer language, e.g. "eng" or "eng+fra".
    pub language: String,
    /// Directory holding the traineddata files; engine default when unset.
    pub tessdata: Option<String>,
    pub cache_ttl_secs: u64,
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            language: "eng".to_string(),
            tessdata: None,
            cache_ttl_secs: 300,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl PipelineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MenuError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MenuError::ConfigError(format!("Failed to read {:?}: {}", path.as_ref(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, MenuError> {
        let config: PipelineConfig = serde_json::from_str(raw)
            .map_err(|e| MenuError::ConfigError(format!("Invalid configuration: {}", e)))?;
        if config.language.trim().is_empty() {
            return Err(MenuError::ConfigError("language must not be empty".to_string()));
        }
        Ok(config)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
