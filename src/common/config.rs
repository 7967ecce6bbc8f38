//! Configuration for miniring

use crate::common::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ring construction settings
    #[serde(default)]
    pub ring: RingConfig,

    /// Harness workload settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            simulation: SimulationConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// Hash ring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingConfig {
    /// Virtual nodes generated per server
    #[serde(default = "default_virtual_nodes")]
    pub virtual_nodes: usize,

    /// Hash algorithm for both virtual nodes and keys
    #[serde(default)]
    pub hash: HashAlgorithm,

    /// Separator between server id and virtual node index
    #[serde(default = "default_separator")]
    pub separator: char,
}

fn default_virtual_nodes() -> usize {
    200
}
fn default_separator() -> char {
    '#'
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            virtual_nodes: default_virtual_nodes(),
            hash: HashAlgorithm::default(),
            separator: default_separator(),
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.virtual_nodes == 0 {
            return Err(crate::Error::InvalidConfig(
                "virtual_nodes must be positive".into(),
            ));
        }
        if self.separator.is_control() || self.separator.is_whitespace() {
            return Err(crate::Error::InvalidConfig(format!(
                "invalid separator: {:?}",
                self.separator
            )));
        }
        Ok(())
    }
}

/// Workload used by the harness binary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial server set
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Number of generated keys per analysis
    #[serde(default = "default_key_count")]
    pub key_count: usize,

    /// Seed for the key generator
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_servers() -> Vec<String> {
    (2..=11).map(|i| format!("10.189.0.{}", i)).collect()
}
fn default_key_count() -> usize {
    100_000
}
fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            key_count: default_key_count(),
            seed: default_seed(),
        }
    }
}

impl Config {
    /// Load configuration from `miniring.*` in the working directory (optional)
    /// and `MINIRING__SECTION__KEY` environment variables.
    pub fn load() -> crate::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("miniring").required(false))
            .add_source(
                config::Environment::with_prefix("MINIRING")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("simulation.servers")
                    .try_parsing(true),
            );
        Self::finish(builder.build()?)
    }

    /// Load configuration from one explicit file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::Error::InvalidConfig(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let built = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;
        Self::finish(built)
    }

    fn finish(built: config::Config) -> crate::Result<Self> {
        let config: Config = built.try_deserialize()?;
        config.ring.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ring.virtual_nodes, 200);
        assert_eq!(config.ring.separator, '#');
        assert_eq!(config.ring.hash, HashAlgorithm::Blake3);
        assert_eq!(config.simulation.servers.len(), 10);
        assert_eq!(config.simulation.servers[0], "10.189.0.2");
        assert!(config.ring.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_vnodes() {
        let ring = RingConfig {
            virtual_nodes: 0,
            ..Default::default()
        };
        assert!(matches!(
            ring.validate(),
            Err(crate::Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_whitespace_separator() {
        let ring = RingConfig {
            separator: ' ',
            ..Default::default()
        };
        assert!(ring.validate().is_err());
    }
}
