//! The wallet boundary.
//!
//! A [`WalletProvider`] holds the keys: it exposes accounts and the active
//! chain, reports changes to either, and hands out contract bindings that it
//! signs for.

use async_trait::async_trait;
use tender_primitives::alloy::primitives::Address;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::market::TenderMarket;

/// Wallet backed by a local key.
pub mod local;

pub use local::LocalWallet;

/// Failures reported by a wallet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// no wallet to talk to
    #[error("Wallet is unavailable")]
    Unavailable,
    /// the user or wallet refused the request
    #[error("Wallet rejected the request: {0}")]
    Rejected(String),
    /// transport failure
    #[error("Wallet rpc error: {0}")]
    RpcError(String),
}

/// Result alias over [`WalletError`].
pub type WalletResult<T> = core::result::Result<T, WalletError>;

/// Notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// new account list, active account first; empty when access was revoked
    AccountsChanged(Vec<Address>),
    /// new active chain id
    ChainChanged(u64),
    /// the wallet went away
    Disconnected,
}

/// Source of accounts, chain and signed contract bindings.
#[async_trait]
pub trait WalletProvider: Send + Sync + 'static {
    /// contract binding handed out by [`WalletProvider::bind_market`]
    type Market: TenderMarket + 'static;

    /// Ask for account access. The first account is the active one.
    async fn request_accounts(&self) -> WalletResult<Vec<Address>>;

    /// Active chain id.
    async fn chain_id(&self) -> WalletResult<u64>;

    /// Receiver for account, chain and disconnect notifications.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;

    /// Bind the contract at `market_address`, with transactions signed by `account`.
    fn bind_market(&self, market_address: Address, account: Address, gas_limit: u64)
        -> Self::Market;
}
