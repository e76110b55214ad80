//! Runtime settings for the confirm flows
//!
//! Read from a JSON file. Every field has a default, so an empty object or a
//! missing file yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use twobutton_ui::constants::QR_SIZE_THRESHOLD;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// How long the confirm button must be held on hold-to-confirm screens
    pub hold_to_confirm_ms: u64,
    /// Rounds of the address/QR/xpub cycle before `show_address` gives up
    pub address_max_rounds: u32,
    /// Addresses shorter than this get a double-size QR code
    pub qr_size_threshold: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            hold_to_confirm_ms: 1000,
            address_max_rounds: 8,
            qr_size_threshold: QR_SIZE_THRESHOLD,
        }
    }
}

impl FlowConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        log::info!("Loaded flow configuration from {}", path.display());
        Ok(config)
    }

    /// Like `load`, but a missing file gives the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address_max_rounds == 0 {
            return Err(ConfigError::Invalid(
                "address_max_rounds must be at least 1".to_string(),
            ));
        }
        if self.qr_size_threshold == 0 {
            return Err(ConfigError::Invalid(
                "qr_size_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_to_confirm_ms)
    }
}
