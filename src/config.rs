//! Engine configuration
//!
//! A [`MetricsConfig`] can be built in code through [`MetricsConfigBuilder`]
//! or loaded from TOML, YAML or JSON.
//!
//! ```toml
//! zero_division = "nan"
//! log_warnings = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::classification::ZeroDivision;

/// Settings shared by every computation of a [`crate::MetricsEngine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Value used when precision or recall has a zero denominator
    pub zero_division: ZeroDivision,
    /// Emit undefined-metric warnings through the `log` facade
    pub log_warnings: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            zero_division: ZeroDivision::Zero,
            log_warnings: true,
        }
    }
}

impl MetricsConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a config file, choosing the format by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let parse: fn(&str) -> Result<Self> = match extension.as_str() {
            "toml" => Self::from_toml_str,
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => {
                return Err(Error::InvalidInput(format!(
                    "unsupported config format: {}",
                    path.display()
                )))
            }
        };

        let content = fs::read_to_string(path)?;
        let config = parse(&content)?;
        log::debug!("loaded metrics config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct MetricsConfigBuilder {
    config: MetricsConfig,
}

impl MetricsConfigBuilder {
    pub fn new() -> Self {
        MetricsConfigBuilder {
            config: MetricsConfig::default(),
        }
    }

    pub fn zero_division(mut self, policy: ZeroDivision) -> Self {
        self.config.zero_division = policy;
        self
    }

    pub fn log_warnings(mut self, enabled: bool) -> Self {
        self.config.log_warnings = enabled;
        self
    }

    pub fn build(self) -> MetricsConfig {
        self.config
    }
}

impl Default for MetricsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
