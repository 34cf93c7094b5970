//! Input validation for the two write operations.
//!
//! Inputs arrive as the raw strings a form or command line would provide and
//! leave as contract-native call arguments. Nothing here touches the network.

use alloy::primitives::U256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::units::{datetime_to_timestamp, parse_amount, parse_deadline};
use crate::{PrimitivesError, Result};

/// Fields for posting a new tender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTender {
    /// required, trimmed before submission
    pub title: String,
    /// required, trimmed before submission
    pub description: String,
    /// decimal ether, e.g. `"2.5"`
    pub budget: String,
    /// RFC 3339, `YYYY-MM-DDTHH:MM` (UTC) or unix seconds
    pub deadline: String,
}

/// Contract arguments for `postTender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderSubmission {
    /// trimmed title
    pub title: String,
    /// trimmed description
    pub description: String,
    /// budget in wei
    pub budget: U256,
    /// deadline in unix seconds
    pub deadline: U256,
}

/// Fields for bidding on a tender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBid {
    /// tender to bid on
    pub tender_id: U256,
    /// decimal ether, e.g. `"1.5"`
    pub amount: String,
    /// required, trimmed before submission
    pub proposal: String,
}

/// Contract arguments for `submitBid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidSubmission {
    /// tender to bid on
    pub tender_id: U256,
    /// amount in wei
    pub amount: U256,
    /// trimmed proposal
    pub proposal: String,
}

fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PrimitivesError::ValidationError(format!(
            "{} is required",
            name
        )));
    }
    Ok(())
}

fn positive_amount(name: &str, value: &str) -> Result<U256> {
    let amount = parse_amount(value)
        .map_err(|e| PrimitivesError::ValidationError(format!("invalid {}: {}", name, e)))?;
    if amount.is_zero() {
        return Err(PrimitivesError::ValidationError(format!(
            "{} must be greater than zero",
            name
        )));
    }
    Ok(amount)
}

impl NewTender {
    /// Tender form from raw field values.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        budget: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            budget: budget.into(),
            deadline: deadline.into(),
        }
    }

    /// Check every field and convert to contract units. `now` bounds the deadline.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<TenderSubmission> {
        require_field("title", &self.title)?;
        require_field("description", &self.description)?;
        require_field("budget", &self.budget)?;
        require_field("deadline", &self.deadline)?;

        let budget = positive_amount("budget", &self.budget)?;

        let deadline = parse_deadline(&self.deadline)
            .map_err(|e| PrimitivesError::ValidationError(format!("invalid deadline: {}", e)))?;
        if deadline <= now {
            return Err(PrimitivesError::ValidationError(
                "deadline must be in the future".into(),
            ));
        }

        Ok(TenderSubmission {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            budget,
            deadline: datetime_to_timestamp(deadline)?,
        })
    }
}

impl NewBid {
    /// Bid form from raw field values.
    pub fn new(tender_id: U256, amount: impl Into<String>, proposal: impl Into<String>) -> Self {
        Self {
            tender_id,
            amount: amount.into(),
            proposal: proposal.into(),
        }
    }

    /// Check every field and convert the amount to wei.
    pub fn validate(&self) -> Result<BidSubmission> {
        require_field("amount", &self.amount)?;
        require_field("proposal", &self.proposal)?;

        Ok(BidSubmission {
            tender_id: self.tender_id,
            amount: positive_amount("amount", &self.amount)?,
            proposal: self.proposal.trim().to_string(),
        })
    }
}
