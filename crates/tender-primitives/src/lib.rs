//! Core types for the tender market client
//!
//! This module re-exports the alloy types used across the workspace so that the
//! client crate and the binaries agree on a single alloy version.

/// Alloy re-exports.
pub mod alloy {
    /// Primitive types and address macro.
    pub mod primitives {
        pub use alloy::primitives::{address, Address, TxHash, B256, U256};
    }

    /// Network abstractions and the Ethereum wallet.
    pub mod network {
        pub use alloy::network::{Ethereum, EthereumWallet, Network, ReceiptResponse};
    }

    /// RPC providers.
    pub mod providers {
        pub use alloy::providers::{Provider, ProviderBuilder};
    }

    /// Transport bound of the providers.
    pub mod transports {
        pub use alloy::transports::Transport;
    }

    /// Local key signing.
    pub mod signers {
        pub use alloy::signers::{local::PrivateKeySigner, Signer};
    }
}

/// Contract bindings.
pub mod abi;
/// Bids as mirrored from the contract.
pub mod bid;
/// Error type of this crate.
pub mod error;
/// Known tender market deployments.
pub mod markets;
/// Revert decoding.
pub mod revert;
/// Tenders, their status and listing filters.
pub mod tender;
/// Wei, ether and timestamp conversions.
pub mod units;
/// Validation of write inputs.
pub mod validation;

pub use bid::{Bid, UserBid};
pub use error::{PrimitivesError, Result};
pub use revert::ContractRevert;
pub use tender::{Tender, TenderFilter, TenderQuery, TenderStatus, TenderSummary};
