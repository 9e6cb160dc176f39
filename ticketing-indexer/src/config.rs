//! Configuration management for the ticketing indexer

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

/// Prefix for environment overrides, e.g. `TICKETING__RPC__URL`
pub const ENV_PREFIX: &str = "TICKETING";

#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct IndexerConfig {
    #[validate]
    pub rpc: RpcConfig,
    #[validate]
    pub program: ProgramConfig,
    #[validate]
    pub cache: CacheConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RpcConfig {
    #[validate(url)]
    pub url: String,
    pub commitment: String,
    #[validate(range(min = 1, max = 60))]
    pub connect_timeout_secs: u64,
    #[validate(range(min = 1, max = 300))]
    pub read_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProgramConfig {
    #[validate(length(min = 32, max = 44))]
    pub program_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    #[validate(range(min = 1, max = 3600))]
    pub stats_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.devnet.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: "TiCKeTz1ycLXyRDXzmMT1tJ3VYBkvp3yBSxCUMzJgdu".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { stats_ttl_secs: 60 }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl CacheConfig {
    pub fn stats_ttl(&self) -> Duration {
        Duration::from_secs(self.stats_ttl_secs)
    }
}

impl IndexerConfig {
    /// Load configuration from a TOML file, then apply `TICKETING__*` environment overrides
    ///
    /// A missing file is not an error: defaults stand in for it and the
    /// environment overrides still apply.
    pub fn from_file(path: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without environment overrides
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Validate field ranges and the program id
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        if self.rpc.commitment.is_empty() {
            return Err(anyhow!("RPC commitment cannot be empty"));
        }
        self.program_id()?;
        Ok(())
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        Pubkey::from_str(&self.program.program_id)
            .map_err(|e| anyhow!("Invalid program id {}: {}", self.program.program_id, e))
    }
}
