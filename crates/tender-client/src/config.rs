//! Gateway Configuration

use serde::{Deserialize, Serialize};
use std::{env, fs, str::FromStr};
use tender_primitives::alloy::primitives::Address;
use tender_primitives::markets::ContractRegistry;
use thiserror::Error;

/// gas limit attached to writes unless configured
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;
/// page size of recent tender listings unless configured
pub const DEFAULT_RECENT_TENDERS_LIMIT: u64 = 10;

/// overrides the tender market address
pub const CONTRACT_ADDRESS_ENV: &str = "TENDER_CONTRACT_ADDRESS";
/// restricts the address override to one chain
pub const CHAIN_ID_ENV: &str = "TENDER_CHAIN_ID";
/// overrides [`GatewayConfig::gas_limit`]
pub const GAS_LIMIT_ENV: &str = "TENDER_GAS_LIMIT";
/// overrides [`GatewayConfig::recent_tenders_limit`]
pub const RECENT_LIMIT_ENV: &str = "TENDER_RECENT_LIMIT";

/// Failures while loading a [`GatewayConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// config file could not be read
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),
    /// config file is not valid JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),
    /// environment variable with an unparsable value
    #[error("Invalid value for {0}: {1}")]
    EnvValueError(&'static str, String),
}

/// Settings shared by every binding a gateway creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// gas limit attached to every write transaction
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
    /// default page size for recent tender listings
    #[serde(default = "default_recent_tenders_limit")]
    pub recent_tenders_limit: u64,
    /// tender market address per chain id
    #[serde(default)]
    pub contracts: ContractRegistry,
}

fn default_gas_limit() -> u64 {
    DEFAULT_GAS_LIMIT
}

fn default_recent_tenders_limit() -> u64 {
    DEFAULT_RECENT_TENDERS_LIMIT
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            recent_tenders_limit: DEFAULT_RECENT_TENDERS_LIMIT,
            contracts: ContractRegistry::default(),
        }
    }
}

impl GatewayConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: GatewayConfig = serde_json::from_str(&data)?;
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    ///
    /// `TENDER_CONTRACT_ADDRESS` replaces the deployment of `TENDER_CHAIN_ID`
    /// when set, otherwise of every known chain.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides(|key| env::var(key).ok())
    }

    fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(gas_limit) = lookup(GAS_LIMIT_ENV) {
            self.gas_limit = parse_env(GAS_LIMIT_ENV, &gas_limit)?;
        }
        if let Some(limit) = lookup(RECENT_LIMIT_ENV) {
            self.recent_tenders_limit = parse_env(RECENT_LIMIT_ENV, &limit)?;
        }
        if let Some(address) = lookup(CONTRACT_ADDRESS_ENV) {
            let address: Address = parse_env(CONTRACT_ADDRESS_ENV, &address)?;
            self.contracts = match lookup(CHAIN_ID_ENV) {
                Some(chain_id) => self
                    .contracts
                    .with_address(parse_env(CHAIN_ID_ENV, &chain_id)?, address),
                None => self.contracts.with_address_for_all(address),
            };
        }
        Ok(self)
    }
}

fn parse_env<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvValueError(key, value.to_string()))
}
