//! A single wallet binding and the operations issued through it.
//!
//! A [`Connection`] is never mutated once published. When the wallet switches
//! account or chain the gateway builds a new one and invalidates the old, after
//! which every call on the old binding fails with
//! [`GatewayError::StaleConnectionError`].

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tender_primitives::alloy::primitives::{Address, U256};
use tender_primitives::validation::{BidSubmission, NewBid, NewTender};
use tender_primitives::{Bid, Tender, TenderSummary, UserBid};

use crate::clock::Clock;
use crate::error::{GatewayError, Result};
use crate::market::{TenderMarket, TxReceipt};

/// A live or invalidated binding of one account on one chain.
pub struct Connection<M> {
    generation: u64,
    account: Address,
    chain_id: u64,
    market_address: Address,
    market: M,
    clock: Arc<dyn Clock>,
    live: AtomicBool,
}

impl<M> std::fmt::Debug for Connection<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("generation", &self.generation)
            .field("account", &self.account)
            .field("chain_id", &self.chain_id)
            .field("market_address", &self.market_address)
            .field("live", &self.is_live())
            .finish()
    }
}

impl<M> Connection<M> {
    pub(crate) fn new(
        generation: u64,
        account: Address,
        chain_id: u64,
        market_address: Address,
        market: M,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            generation,
            account,
            chain_id,
            market_address,
            market,
            clock,
            live: AtomicBool::new(true),
        }
    }

    /// Increases with every connect attempt; tells bindings apart.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// account that signs writes
    pub fn account(&self) -> Address {
        self.account
    }

    /// chain the binding was made on
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// tender market address on that chain
    pub fn market_address(&self) -> Address {
        self.market_address
    }

    /// Whether this is still the gateway's current binding.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub(crate) fn invalidate(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_live() {
            Ok(())
        } else {
            Err(GatewayError::StaleConnectionError)
        }
    }
}

impl<M: TenderMarket> Connection<M> {
    /// The `limit` most recent tenders, newest first.
    pub async fn list_recent_tenders(&self, limit: u64) -> Result<Vec<Tender>> {
        self.ensure_live()?;
        tracing::debug!("fetching {} recent tenders", limit);

        let raw = self
            .market
            .recent_tenders(U256::from(limit))
            .await
            .map_err(|e| GatewayError::from_market(e, None))?;
        // the binding may have been replaced while the call was in flight
        self.ensure_live()?;

        let mut tenders = raw
            .into_iter()
            .map(Tender::try_from)
            .collect::<core::result::Result<Vec<_>, _>>()?;
        tenders.sort_by(|a, b| b.id.cmp(&a.id));
        tenders.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(tenders)
    }

    /// One tender. Unknown ids fail with [`GatewayError::TenderNotFoundError`].
    pub async fn get_tender(&self, tender_id: U256) -> Result<Tender> {
        self.ensure_live()?;
        let raw = self
            .market
            .tender_details(tender_id)
            .await
            .map_err(|e| GatewayError::from_market(e, Some(tender_id)))?;
        self.ensure_live()?;

        // unknown ids come back as an empty record
        if raw.owner == Address::ZERO {
            return Err(GatewayError::TenderNotFoundError(tender_id));
        }
        Ok(Tender::try_from(raw)?)
    }

    /// Every bid placed on `tender_id`, in placement order.
    pub async fn get_bids_for_tender(&self, tender_id: U256) -> Result<Vec<Bid>> {
        self.ensure_live()?;
        let raw = self
            .market
            .tender_bids(tender_id)
            .await
            .map_err(|e| GatewayError::from_market(e, Some(tender_id)))?;
        self.ensure_live()?;
        Ok(raw.into_iter().map(Bid::from).collect())
    }

    /// Recent tenders with their bid counts. Bid lists are fetched concurrently.
    pub async fn list_tender_summaries(&self, limit: u64) -> Result<Vec<TenderSummary>> {
        let tenders = self.list_recent_tenders(limit).await?;
        let bids = self.bids_of(&tenders).await?;

        Ok(tenders
            .into_iter()
            .zip(bids)
            .map(|(tender, bids)| TenderSummary {
                tender,
                bid_count: bids.len(),
            })
            .collect())
    }

    /// The connected account's bids across the `limit` most recent tenders.
    pub async fn list_user_bids(&self, limit: u64) -> Result<Vec<UserBid>> {
        let tenders = self.list_recent_tenders(limit).await?;
        let bids = self.bids_of(&tenders).await?;
        let account = self.account;

        Ok(tenders
            .iter()
            .zip(bids)
            .flat_map(|(tender, bids)| {
                bids.into_iter()
                    .filter(move |bid| bid.bidder == account)
                    .map(move |bid| UserBid {
                        bid,
                        tender: tender.clone(),
                    })
            })
            .collect())
    }

    async fn bids_of(&self, tenders: &[Tender]) -> Result<Vec<Vec<Bid>>> {
        let bids = try_join_all(tenders.iter().map(|tender| self.get_bids_for_tender(tender.id)))
            .await?;
        Ok(bids)
    }

    /// Validate, convert and submit a new tender; returns once it is included.
    pub async fn post_tender(&self, tender: &NewTender) -> Result<TxReceipt> {
        self.ensure_live()?;
        let submission = tender.validate(self.clock.now())?;

        tracing::info!(
            "posting tender '{}' with budget {} wei",
            submission.title,
            submission.budget
        );
        let receipt = self
            .market
            .post_tender(submission)
            .await
            .map_err(|e| GatewayError::from_market(e, None))?;
        tracing::info!("tender posted in txs {}", receipt.transaction_hash);
        Ok(receipt)
    }

    /// Validate a bid, check it against the tender's current state and submit
    /// it. Pre-flight failures never reach the contract.
    pub async fn submit_bid(&self, bid: &NewBid) -> Result<TxReceipt> {
        self.ensure_live()?;
        let submission = bid.validate()?;

        let tender = self.get_tender(submission.tender_id).await?;
        preflight_bid(&tender, &submission, self.account, self.clock.now())?;
        tracing::info!("bidder: pre-flight checks passed for tender {}", tender.id);

        self.ensure_live()?;
        let tender_id = submission.tender_id;
        let receipt = self
            .market
            .submit_bid(submission)
            .await
            .map_err(|e| GatewayError::from_market(e, Some(tender_id)))?;
        tracing::info!("bid submitted in txs {}", receipt.transaction_hash);
        Ok(receipt)
    }
}

/// Checks a bid against an already fetched tender.
///
/// Order matters: ownership is a property of the caller and the tender and is
/// reported first, then the tender's lifecycle, then the amount.
pub fn preflight_bid(
    tender: &Tender,
    bid: &BidSubmission,
    caller: Address,
    now: DateTime<Utc>,
) -> Result<()> {
    if tender.owner == caller {
        return Err(GatewayError::OwnerCannotBidError);
    }
    if !tender.accepts_bids_from(Some(caller)) {
        return Err(GatewayError::TenderClosedError);
    }
    if tender.deadline_passed(now) {
        return Err(GatewayError::DeadlinePassedError);
    }
    if bid.amount > tender.budget {
        return Err(GatewayError::BudgetExceededError);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tender_primitives::alloy::primitives::address;
    use tender_primitives::TenderStatus;

    const OWNER: Address = address!("00000000000000000000000000000000000000a1");
    const BIDDER: Address = address!("00000000000000000000000000000000000000b2");
    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    fn tender(status: TenderStatus) -> Tender {
        Tender {
            id: U256::from(3),
            title: "Roads".into(),
            description: "resurfacing".into(),
            budget: U256::from(ONE_ETHER),
            deadline: DateTime::from_timestamp(2_000_000_000, 0).unwrap(),
            status,
            owner: OWNER,
        }
    }

    fn bid(amount: u128) -> BidSubmission {
        BidSubmission {
            tender_id: U256::from(3),
            amount: U256::from(amount),
            proposal: "plan".into(),
        }
    }

    fn before_deadline() -> DateTime<Utc> {
        DateTime::from_timestamp(1_900_000_000, 0).unwrap()
    }

    #[test]
    fn accepts_bid_within_budget() {
        let result = preflight_bid(
            &tender(TenderStatus::Open),
            &bid(ONE_ETHER),
            BIDDER,
            before_deadline(),
        );
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn rejects_bid_above_budget_without_clamping() {
        let result = preflight_bid(
            &tender(TenderStatus::Open),
            &bid(ONE_ETHER + ONE_ETHER / 2),
            BIDDER,
            before_deadline(),
        );
        assert_eq!(result, Err(GatewayError::BudgetExceededError));
    }

    #[test]
    fn rejects_non_open_tenders() {
        for status in [TenderStatus::Closed, TenderStatus::Awarded, TenderStatus::Unknown] {
            let result = preflight_bid(&tender(status), &bid(1), BIDDER, before_deadline());
            assert_eq!(result, Err(GatewayError::TenderClosedError));
        }
    }

    #[test]
    fn owner_check_comes_first() {
        for status in [TenderStatus::Open, TenderStatus::Closed] {
            let result = preflight_bid(&tender(status), &bid(1), OWNER, before_deadline());
            assert_eq!(result, Err(GatewayError::OwnerCannotBidError));
        }
    }

    #[test]
    fn rejects_bid_at_or_after_deadline() {
        let open = tender(TenderStatus::Open);
        let result = preflight_bid(&open, &bid(1), BIDDER, open.deadline);
        assert_eq!(result, Err(GatewayError::DeadlinePassedError));
    }
}
