use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engines::espeak::EspeakConfig;
use crate::error::ConversionError;

/// Settings for the cloud (Google Translate) engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudConfig {
    /// Top-level domain of the Translate host, e.g. `"com"` or `"com.eg"`.
    pub tld: String,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            tld: "com".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Converter configuration. Every field is optional in the JSON form.
///
/// ```json
/// {
///   "work_dir": "/var/tmp/tts",
///   "local_voice_language": "en",
///   "espeak": { "bin_path": "/opt/espeak-ng/bin/espeak-ng" },
///   "cloud": { "tld": "com.eg", "timeout_secs": 20 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Parent directory for per-request temporary directories.
    /// `None` uses the system temp dir.
    pub work_dir: Option<PathBuf>,
    /// Language filter applied when enumerating offline voices.
    pub local_voice_language: String,
    pub espeak: EspeakConfig,
    pub cloud: CloudConfig,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            work_dir: None,
            local_voice_language: "en".to_string(),
            espeak: EspeakConfig::default(),
            cloud: CloudConfig::default(),
        }
    }
}

impl ConverterConfig {
    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Load a [`ConverterConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<ConverterConfig, ConversionError> {
    let content = std::fs::read_to_string(path)?;
    let config: ConverterConfig = serde_json::from_str(&content)
        .map_err(|e| ConversionError::Config(format!("{}: {e}", path.display())))?;

    if config.cloud.tld.trim().is_empty() {
        return Err(ConversionError::Config("cloud.tld must not be empty".to_string()));
    }
    if config.cloud.timeout_secs == 0 {
        return Err(ConversionError::Config(
            "cloud.timeout_secs must be greater than zero".to_string(),
        ));
    }

    log::info!("Loaded converter config from {}", path.display());
    Ok(config)
}
