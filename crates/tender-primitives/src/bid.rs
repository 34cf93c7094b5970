//! Bids

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::abi::tender_market::TenderMarket::BidInfo;
use crate::tender::Tender;
use crate::units::format_amount;

/// A bid as mirrored from the contract. `selected` is only ever set by the
/// tender owner through the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// bid id assigned by the contract
    pub id: U256,
    /// tender the bid targets
    pub tender_id: U256,
    /// account that placed the bid
    pub bidder: Address,
    /// offered amount in wei
    pub amount: U256,
    /// free text proposal
    pub proposal: String,
    /// picked by the tender owner
    pub selected: bool,
}

impl Bid {
    /// amount in ether for display
    #[must_use]
    pub fn amount_display(&self) -> String {
        format_amount(self.amount)
    }
}

impl From<BidInfo> for Bid {
    fn from(info: BidInfo) -> Self {
        Self {
            id: info.id,
            tender_id: info.tenderId,
            bidder: info.bidder,
            amount: info.amount,
            proposal: info.proposal,
            selected: info.selected,
        }
    }
}

/// One of the connected account's bids, joined with the tender it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBid {
    /// the bid itself
    pub bid: Bid,
    /// the tender it was placed on
    pub tender: Tender,
}

impl UserBid {
    /// `Selected` once the owner picked this bid, `Pending` until then.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.bid.selected {
            "Selected"
        } else {
            "Pending"
        }
    }
}
