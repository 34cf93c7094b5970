//! Tenders and tender listings

use alloy::primitives::{Address, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::abi::tender_market::TenderMarket::TenderInfo;
use crate::units::{format_amount, timestamp_to_datetime};
use crate::{PrimitivesError, Result};

/// Lifecycle state of a tender as reported by the contract.
///
/// `Open` is the only state that accepts bids; `Closed` and `Awarded` are
/// terminal. Codes the contract might add later surface as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenderStatus {
    /// accepting bids
    Open,
    /// closed by the owner without an award
    Closed,
    /// a bid has been selected
    Awarded,
    /// status code this client does not know
    Unknown,
}

impl TenderStatus {
    /// Status for the contract's `uint8` code.
    #[must_use]
    pub fn from_code(code: u64) -> Self {
        match code {
            0 => TenderStatus::Open,
            1 => TenderStatus::Closed,
            2 => TenderStatus::Awarded,
            _ => TenderStatus::Unknown,
        }
    }

    /// Display name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Open => "Open",
            TenderStatus::Closed => "Closed",
            TenderStatus::Awarded => "Awarded",
            TenderStatus::Unknown => "Unknown",
        }
    }
}

impl From<u8> for TenderStatus {
    fn from(code: u8) -> Self {
        Self::from_code(u64::from(code))
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tender as mirrored from the contract. Amounts stay in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tender {
    /// tender id assigned by the contract
    pub id: U256,
    /// short title
    pub title: String,
    /// what is being tendered
    pub description: String,
    /// upper bound for bids, in wei
    pub budget: U256,
    /// bids are accepted strictly before this instant
    pub deadline: DateTime<Utc>,
    /// lifecycle state
    pub status: TenderStatus,
    /// account that posted the tender
    pub owner: Address,
}

impl Tender {
    /// budget in ether for display
    #[must_use]
    pub fn budget_display(&self) -> String {
        format_amount(self.budget)
    }

    /// Whether `account` may be offered a bid action on this tender.
    ///
    /// Computed from already fetched data only: the tender must be `Open` and
    /// the account must not own it.
    #[must_use]
    pub fn accepts_bids_from(&self, account: Option<Address>) -> bool {
        self.status == TenderStatus::Open && account != Some(self.owner)
    }

    /// whether `now` is at or past the deadline
    #[must_use]
    pub fn deadline_passed(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }
}

impl TryFrom<TenderInfo> for Tender {
    type Error = PrimitivesError;

    fn try_from(info: TenderInfo) -> Result<Self> {
        Ok(Self {
            id: info.id,
            title: info.title,
            description: info.description,
            budget: info.budget,
            deadline: timestamp_to_datetime(info.deadline)?,
            status: TenderStatus::from(info.status),
            owner: info.owner,
        })
    }
}

/// A tender together with the number of bids placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderSummary {
    /// the tender
    pub tender: Tender,
    /// number of bids placed on it
    pub bid_count: usize,
}

/// Status filter for tender listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TenderFilter {
    /// every tender
    #[default]
    All,
    /// open tenders only
    Open,
    /// closed tenders only
    Closed,
    /// awarded tenders only
    Awarded,
}

impl TenderFilter {
    /// Whether a tender in `status` passes this filter.
    #[must_use]
    pub fn matches(&self, status: TenderStatus) -> bool {
        match self {
            TenderFilter::All => true,
            TenderFilter::Open => status == TenderStatus::Open,
            TenderFilter::Closed => status == TenderStatus::Closed,
            TenderFilter::Awarded => status == TenderStatus::Awarded,
        }
    }
}

impl std::str::FromStr for TenderFilter {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(TenderFilter::All),
            "open" => Ok(TenderFilter::Open),
            "closed" => Ok(TenderFilter::Closed),
            "awarded" => Ok(TenderFilter::Awarded),
            other => Err(PrimitivesError::ValidationError(format!(
                "unknown tender filter: {}",
                other
            ))),
        }
    }
}

/// Status filter plus free text search over title and description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenderQuery {
    /// status filter
    pub filter: TenderFilter,
    /// case-insensitive text matched against title and description
    pub search: Option<String>,
}

impl TenderQuery {
    /// Query with `filter` and no search text.
    #[must_use]
    pub fn new(filter: TenderFilter) -> Self {
        Self {
            filter,
            search: None,
        }
    }

    /// Add search text. Blank text matches everything.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Whether `tender` passes both the filter and the search.
    #[must_use]
    pub fn matches(&self, tender: &Tender) -> bool {
        if !self.filter.matches(tender.status) {
            return false;
        }
        match &self.search {
            Some(text) => {
                let needle = text.trim().to_lowercase();
                tender.title.to_lowercase().contains(&needle)
                    || tender.description.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    /// Keep the tenders matching this query, preserving order.
    pub fn apply<'a, I>(&self, tenders: I) -> Vec<&'a Tender>
    where
        I: IntoIterator<Item = &'a Tender>,
    {
        tenders.into_iter().filter(|t| self.matches(t)).collect()
    }
}
