//! The contract boundary.
//!
//! [`TenderMarket`] is everything the gateway needs from a deployed tender
//! contract. Reverts come back already decoded into [`ContractRevert`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tender_primitives::abi::tender_market::TenderMarket::{BidInfo, TenderInfo};
use tender_primitives::alloy::primitives::{TxHash, U256};
use tender_primitives::validation::{BidSubmission, TenderSubmission};
use tender_primitives::{ContractRevert, PrimitivesError};
use thiserror::Error;

/// Alloy-backed implementation.
pub mod onchain;

pub use onchain::OnchainTenderMarket;

/// Failures at the contract boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarketError {
    /// the call reverted
    #[error("Contract reverted: {0}")]
    Reverted(ContractRevert),
    /// the node request failed
    #[error("Failed rpc request: {0}")]
    RpcError(String),
    /// the transaction was sent but not confirmed
    #[error("Transaction failed: {0}")]
    TransactionError(String),
    /// conversion of call arguments or results failed
    #[error("Primitives error: {0}")]
    PrimitivesError(#[from] PrimitivesError),
}

/// Result alias over [`MarketError`].
pub type MarketResult<T> = core::result::Result<T, MarketError>;

/// Inclusion receipt of a write transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// hash of the included transaction
    pub transaction_hash: TxHash,
    /// block it was included in
    pub block_number: Option<u64>,
    /// gas spent
    pub gas_used: u128,
}

/// core contract trait
#[async_trait]
pub trait TenderMarket: Send + Sync {
    /// `getRecentTenders`; order is whatever the deployment returns.
    async fn recent_tenders(&self, limit: U256) -> MarketResult<Vec<TenderInfo>>;

    /// `getTenderDetails`; unknown ids come back zeroed.
    async fn tender_details(&self, tender_id: U256) -> MarketResult<TenderInfo>;

    /// `getTenderBids`
    async fn tender_bids(&self, tender_id: U256) -> MarketResult<Vec<BidInfo>>;

    /// Send `postTender` and wait until it is included.
    async fn post_tender(&self, submission: TenderSubmission) -> MarketResult<TxReceipt>;

    /// Send `submitBid` and wait until it is included.
    async fn submit_bid(&self, submission: BidSubmission) -> MarketResult<TxReceipt>;
}
