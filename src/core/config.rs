//! Forwarder configuration, read from a TOML file.
//!
//! ```toml
//! [forwarder]
//! management_prefix = "/localhost/nfd"
//! default_strategy = "/localhost/nfd/strategy/best-route"
//!
//! [validator]
//! grace_interval_ms = 60000
//!
//! [[validator.rule]]
//! regex = "^<localhost><nfd><strategy-choice>"
//! certificate = "/operator/KEY/ksk-1/ID-CERT"
//! public_key = "<64 hex digits>"
//! ```

use crate::core::error::NfdError;
use crate::core::manager::DEFAULT_MANAGEMENT_PREFIX;
use crate::core::name::Name;
use crate::core::security::IdentityCertificate;
use crate::core::validator::DEFAULT_GRACE_INTERVAL_MS;
use crate::plugins::best_route;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub forwarder: ForwarderConfig,
    pub validator: ValidatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    pub management_prefix: String,
    pub default_strategy: String,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            management_prefix: DEFAULT_MANAGEMENT_PREFIX.to_string(),
            default_strategy: best_route::STRATEGY_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub grace_interval_ms: u64,
    #[serde(rename = "rule")]
    pub rules: Vec<RuleConfig>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            grace_interval_ms: DEFAULT_GRACE_INTERVAL_MS,
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub regex: String,
    pub certificate: String,
    pub public_key: String,
}

impl RuleConfig {
    pub fn to_certificate(&self) -> Result<IdentityCertificate, NfdError> {
        let name: Name = self
            .certificate
            .parse()
            .map_err(|e| NfdError::Config(format!("rule certificate: {}", e)))?;
        IdentityCertificate::from_hex(name, &self.public_key)
            .map_err(|e| NfdError::Config(format!("rule {}: {}", self.certificate, e)))
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, NfdError> {
        let config: Config = toml::from_str(content)?;
        config.management_prefix()?;
        config.default_strategy()?;
        Ok(config)
    }

    /// Loads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, NfdError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(NfdError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn management_prefix(&self) -> Result<Name, NfdError> {
        self.forwarder
            .management_prefix
            .parse()
            .map_err(|e| NfdError::Config(format!("management_prefix: {}", e)))
    }

    pub fn default_strategy(&self) -> Result<Name, NfdError> {
        self.forwarder
            .default_strategy
            .parse()
            .map_err(|e| NfdError::Config(format!("default_strategy: {}", e)))
    }
}
