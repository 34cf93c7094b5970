//! Tender market deployments per chain.

use alloy::primitives::{address, Address};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ethereum mainnet.
pub const MAINNET_CHAIN_ID: u64 = 1;
/// Sepolia testnet.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;
/// Base mainnet.
pub const BASE_MAINNET_CHAIN_ID: u64 = 8453;
/// Base Sepolia testnet.
pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;

/// tender market deployment shared by every supported network
pub const TENDER_MARKET_ADDRESS: Address = address!("7e767A270111a8957FCc69ee3ea95bD0c9F67708");

lazy_static! {
    static ref DEFAULT_DEPLOYMENTS: HashMap<u64, Address> = HashMap::from([
        (MAINNET_CHAIN_ID, TENDER_MARKET_ADDRESS),
        (SEPOLIA_CHAIN_ID, TENDER_MARKET_ADDRESS),
        (BASE_MAINNET_CHAIN_ID, TENDER_MARKET_ADDRESS),
        (BASE_SEPOLIA_CHAIN_ID, TENDER_MARKET_ADDRESS),
    ]);
}

/// Tender market address per chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractRegistry {
    deployments: HashMap<u64, Address>,
}

impl ContractRegistry {
    /// registry without any deployment
    #[must_use]
    pub fn empty() -> Self {
        Self {
            deployments: HashMap::new(),
        }
    }

    /// register or replace the deployment of `chain_id`
    #[must_use]
    pub fn with_address(mut self, chain_id: u64, address: Address) -> Self {
        self.deployments.insert(chain_id, address);
        self
    }

    /// point every registered chain at `address`
    #[must_use]
    pub fn with_address_for_all(mut self, address: Address) -> Self {
        for deployment in self.deployments.values_mut() {
            *deployment = address;
        }
        self
    }

    /// deployment on `chain_id`, if any
    #[must_use]
    pub fn address_for(&self, chain_id: u64) -> Option<Address> {
        self.deployments.get(&chain_id).copied()
    }
}

impl Default for ContractRegistry {
    fn default() -> Self {
        Self {
            deployments: DEFAULT_DEPLOYMENTS.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_covers_known_networks() {
        let registry = ContractRegistry::default();
        for chain_id in [
            MAINNET_CHAIN_ID,
            SEPOLIA_CHAIN_ID,
            BASE_MAINNET_CHAIN_ID,
            BASE_SEPOLIA_CHAIN_ID,
        ] {
            assert_eq!(registry.address_for(chain_id), Some(TENDER_MARKET_ADDRESS));
        }
        assert_eq!(registry.address_for(31337), None);
    }

    #[test]
    fn overrides_apply_per_chain_or_globally() {
        let local = address!("00000000000000000000000000000000000000c3");
        let registry = ContractRegistry::empty().with_address(31337, local);
        assert_eq!(registry.address_for(31337), Some(local));
        assert_eq!(registry.address_for(MAINNET_CHAIN_ID), None);

        let registry = ContractRegistry::default().with_address_for_all(local);
        assert_eq!(registry.address_for(BASE_SEPOLIA_CHAIN_ID), Some(local));
    }

    #[test]
    fn registry_deserializes_from_chain_id_map() {
        let registry: ContractRegistry = serde_json::from_str(
            r#"{"31337": "0x00000000000000000000000000000000000000c3"}"#,
        )
        .unwrap();
        assert_eq!(
            registry.address_for(31337),
            Some(address!("00000000000000000000000000000000000000c3"))
        );
    }
}
