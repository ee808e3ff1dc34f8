//! YAML configuration for the whole demo: growth parameters plus playback

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::animation::PlaybackConfig;
use crate::growth::GrowthParams;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

/// Root of a configuration document
///
/// ```yaml
/// growth:
///   lateral_branch_count: 4
///   enable_death: false
/// playback:
///   max_years: 12
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub growth: GrowthParams,
    pub playback: PlaybackConfig,
}

impl TreeConfig {
    /// Parse and validate. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: TreeConfig = if yaml.trim().is_empty() {
            TreeConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.growth.validate()?;
        self.playback.validate()
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
