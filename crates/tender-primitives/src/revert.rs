//! Decoding of contract revert data into a fixed set of outcomes.
//!
//! Revert payloads are decoded exactly once, here. Custom Solidity errors are
//! tried first; older deployments revert with `Error(string)` and those reasons
//! go through [`LEGACY_REASONS`].

use alloy::hex;
use alloy::sol_types::{Revert, SolError, SolInterface};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::abi::tender_market::TenderMarket::TenderMarketErrors;

/// Known `require` messages of the legacy contract, matched case-insensitively
/// as substrings of the revert reason.
const LEGACY_REASONS: [(&str, ContractRevert); 8] = [
    ("exceeds budget", ContractRevert::BudgetExceeded),
    ("exceeds tender budget", ContractRevert::BudgetExceeded),
    ("not open", ContractRevert::TenderNotOpen),
    ("tender closed", ContractRevert::TenderNotOpen),
    ("owner cannot bid", ContractRevert::OwnerCannotBid),
    ("cannot bid on own tender", ContractRevert::OwnerCannotBid),
    ("deadline passed", ContractRevert::DeadlinePassed),
    ("tender does not exist", ContractRevert::TenderNotFound),
];

/// Outcome of a reverted contract call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractRevert {
    /// bid amount above the tender budget
    BudgetExceeded,
    /// tender closed or awarded
    TenderNotOpen,
    /// bidder owns the tender
    OwnerCannotBid,
    /// bid after the tender deadline
    DeadlinePassed,
    /// no tender with that id
    TenderNotFound,
    /// anything else, carrying the raw reason (or hex payload)
    Other(String),
}

impl ContractRevert {
    /// Decode raw revert data returned by the node.
    #[must_use]
    pub fn decode(data: &[u8]) -> Self {
        if let Ok(error) = TenderMarketErrors::abi_decode(data, true) {
            return match error {
                TenderMarketErrors::BidExceedsBudget(_) => ContractRevert::BudgetExceeded,
                TenderMarketErrors::TenderNotOpen(_) => ContractRevert::TenderNotOpen,
                TenderMarketErrors::OwnerCannotBid(_) => ContractRevert::OwnerCannotBid,
                TenderMarketErrors::DeadlinePassed(_) => ContractRevert::DeadlinePassed,
                TenderMarketErrors::TenderNotFound(_) => ContractRevert::TenderNotFound,
            };
        }

        if let Ok(revert) = Revert::abi_decode(data, true) {
            return Self::from_reason(&revert.reason);
        }

        if data.is_empty() {
            ContractRevert::Other("execution reverted".into())
        } else {
            ContractRevert::Other(hex::encode_prefixed(data))
        }
    }

    /// Map a plain revert reason string.
    #[must_use]
    pub fn from_reason(reason: &str) -> Self {
        let lowered = reason.to_lowercase();
        LEGACY_REASONS
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, revert)| revert.clone())
            .unwrap_or_else(|| ContractRevert::Other(reason.to_string()))
    }
}

impl fmt::Display for ContractRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractRevert::BudgetExceeded => f.write_str("bid exceeds budget"),
            ContractRevert::TenderNotOpen => f.write_str("tender not open"),
            ContractRevert::OwnerCannotBid => f.write_str("owner cannot bid"),
            ContractRevert::DeadlinePassed => f.write_str("deadline passed"),
            ContractRevert::TenderNotFound => f.write_str("tender not found"),
            ContractRevert::Other(reason) => f.write_str(reason),
        }
    }
}
