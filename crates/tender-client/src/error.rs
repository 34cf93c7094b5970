//! Gateway errors

use tender_primitives::alloy::primitives::U256;
use tender_primitives::{ContractRevert, PrimitivesError};
use thiserror::Error;

use crate::market::MarketError;
use crate::wallet::WalletError;

/// Every failure the gateway surfaces. Messages are meant for display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// no wallet was supplied, or it is unreachable
    #[error("No wallet provider available")]
    NoProviderError,
    /// the wallet's chain has no tender market deployment
    #[error("No tender contract configured for chain {0}")]
    UnconfiguredError(u64),
    /// no live binding
    #[error("Wallet is not connected")]
    NotConnectedError,
    /// the wallet refused account access or returned no account
    #[error("Wallet account access failed: {0}")]
    AccountAccessError(String),
    /// the binding used was replaced or torn down
    #[error("Connection was replaced after a wallet account or network change")]
    StaleConnectionError,
    /// the connect future was dropped before it finished
    #[error("Connect attempt was cancelled before it completed")]
    ConnectCancelledError,
    /// a wallet event loop is already running
    #[error("Wallet events are already being watched")]
    AlreadyWatchingError,
    /// input rejected before reaching the contract
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// no tender with that id
    #[error("Tender {0} does not exist")]
    TenderNotFoundError(U256),
    /// bid amount above the tender budget
    #[error("Bid amount exceeds the tender budget")]
    BudgetExceededError,
    /// tender is not open
    #[error("Tender is not open for bids")]
    TenderClosedError,
    /// the connected account owns the tender
    #[error("Tender owner cannot bid on their own tender")]
    OwnerCannotBidError,
    /// the tender deadline has passed
    #[error("Tender deadline has passed")]
    DeadlinePassedError,
    /// transaction reverted for another reason or was not included
    #[error("Transaction failed: {0}")]
    TransactionError(String),
    /// node request failed
    #[error("Failed rpc request: {0}")]
    RpcRequestError(String),
    /// conversion failure outside form validation
    #[error("Primitives error: {0}")]
    PrimitivesError(PrimitivesError),
}

impl GatewayError {
    /// Failures a caller can sensibly re-issue without changing its input.
    ///
    /// The gateway itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::StaleConnectionError
                | GatewayError::ConnectCancelledError
                | GatewayError::NotConnectedError
                | GatewayError::RpcRequestError(_)
                | GatewayError::TransactionError(_)
        )
    }

    /// Whether the failure was raised before any transaction was sent.
    #[must_use]
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            GatewayError::ValidationError(_)
                | GatewayError::TenderNotFoundError(_)
                | GatewayError::BudgetExceededError
                | GatewayError::TenderClosedError
                | GatewayError::OwnerCannotBidError
                | GatewayError::DeadlinePassedError
        )
    }

    pub(crate) fn from_revert(revert: ContractRevert, tender_id: Option<U256>) -> Self {
        match revert {
            ContractRevert::BudgetExceeded => GatewayError::BudgetExceededError,
            ContractRevert::TenderNotOpen => GatewayError::TenderClosedError,
            ContractRevert::OwnerCannotBid => GatewayError::OwnerCannotBidError,
            ContractRevert::DeadlinePassed => GatewayError::DeadlinePassedError,
            ContractRevert::TenderNotFound => match tender_id {
                Some(id) => GatewayError::TenderNotFoundError(id),
                None => GatewayError::TransactionError(revert.to_string()),
            },
            ContractRevert::Other(reason) => GatewayError::TransactionError(reason),
        }
    }

    pub(crate) fn from_market(error: MarketError, tender_id: Option<U256>) -> Self {
        match error {
            MarketError::Reverted(revert) => Self::from_revert(revert, tender_id),
            MarketError::RpcError(msg) => GatewayError::RpcRequestError(msg),
            MarketError::TransactionError(msg) => GatewayError::TransactionError(msg),
            MarketError::PrimitivesError(e) => GatewayError::from(e),
        }
    }
}

impl From<PrimitivesError> for GatewayError {
    fn from(error: PrimitivesError) -> Self {
        match error {
            PrimitivesError::ValidationError(msg) => GatewayError::ValidationError(msg),
            other => GatewayError::PrimitivesError(other),
        }
    }
}

impl From<WalletError> for GatewayError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::Unavailable => GatewayError::NoProviderError,
            WalletError::Rejected(msg) => GatewayError::AccountAccessError(msg),
            WalletError::RpcError(msg) => GatewayError::RpcRequestError(msg),
        }
    }
}

/// Result alias over [`GatewayError`].
pub type Result<T> = core::result::Result<T, GatewayError>;
