use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tender_client::market::{MarketError, MarketResult, TenderMarket, TxReceipt};
use tender_client::wallet::{WalletError, WalletEvent, WalletProvider, WalletResult};
use tender_primitives::abi::tender_market::TenderMarket::{BidInfo, TenderInfo};
use tender_primitives::alloy::primitives::{Address, B256, U256};
use tender_primitives::validation::{BidSubmission, TenderSubmission};
use tender_primitives::ContractRevert;
use tokio::sync::{broadcast, Notify};

/// In-memory stand-in for a deployed tender contract. Writes follow the
/// contract's own rules so that reverts can be exercised too.
#[derive(Debug, Default)]
pub struct MarketState {
    pub tenders: Vec<TenderInfo>,
    pub bids: Vec<BidInfo>,
    /// chain time used for deadline checks
    pub now: u64,
    /// calls that reached `post_tender` / `submit_bid`
    pub write_attempts: usize,
    /// included transactions
    pub transactions: usize,
    /// revert returned by the next write instead of executing it
    pub forced_revert: Option<ContractRevert>,
    /// when set, `recent_tenders` waits for a permit before answering
    pub read_gate: Option<Arc<Notify>>,
}

pub type SharedMarket = Arc<Mutex<MarketState>>;

impl MarketState {
    pub fn shared(tenders: Vec<TenderInfo>, bids: Vec<BidInfo>, now: u64) -> SharedMarket {
        Arc::new(Mutex::new(MarketState {
            tenders,
            bids,
            now,
            ..Default::default()
        }))
    }

    fn receipt(&mut self) -> TxReceipt {
        self.transactions += 1;
        TxReceipt {
            transaction_hash: B256::with_last_byte(self.transactions as u8),
            block_number: Some(100 + self.transactions as u64),
            gas_used: 21_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockMarket {
    state: SharedMarket,
    account: Address,
}

#[async_trait]
impl TenderMarket for MockMarket {
    /// returns every tender oldest first, like a deployment ignoring `limit`
    async fn recent_tenders(&self, _limit: U256) -> MarketResult<Vec<TenderInfo>> {
        let gate = self.state.lock().unwrap().read_gate.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(self.state.lock().unwrap().tenders.clone())
    }

    async fn tender_details(&self, tender_id: U256) -> MarketResult<TenderInfo> {
        let state = self.state.lock().unwrap();
        Ok(state
            .tenders
            .iter()
            .find(|t| t.id == tender_id)
            .cloned()
            .unwrap_or(TenderInfo {
                id: U256::ZERO,
                title: String::new(),
                description: String::new(),
                budget: U256::ZERO,
                deadline: U256::ZERO,
                status: 0,
                owner: Address::ZERO,
            }))
    }

    async fn tender_bids(&self, tender_id: U256) -> MarketResult<Vec<BidInfo>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .bids
            .iter()
            .filter(|b| b.tenderId == tender_id)
            .cloned()
            .collect())
    }

    async fn post_tender(&self, submission: TenderSubmission) -> MarketResult<TxReceipt> {
        let mut state = self.state.lock().unwrap();
        state.write_attempts += 1;
        if let Some(revert) = state.forced_revert.take() {
            return Err(MarketError::Reverted(revert));
        }

        let id = U256::from(state.tenders.len() + 1);
        state.tenders.push(TenderInfo {
            id,
            title: submission.title,
            description: submission.description,
            budget: submission.budget,
            deadline: submission.deadline,
            status: 0,
            owner: self.account,
        });
        Ok(state.receipt())
    }

    async fn submit_bid(&self, submission: BidSubmission) -> MarketResult<TxReceipt> {
        let mut state = self.state.lock().unwrap();
        state.write_attempts += 1;
        if let Some(revert) = state.forced_revert.take() {
            return Err(MarketError::Reverted(revert));
        }

        let tender = state
            .tenders
            .iter()
            .find(|t| t.id == submission.tender_id)
            .cloned()
            .ok_or(MarketError::Reverted(ContractRevert::TenderNotFound))?;
        if tender.status != 0 {
            return Err(MarketError::Reverted(ContractRevert::TenderNotOpen));
        }
        if tender.owner == self.account {
            return Err(MarketError::Reverted(ContractRevert::OwnerCannotBid));
        }
        if U256::from(state.now) >= tender.deadline {
            return Err(MarketError::Reverted(ContractRevert::DeadlinePassed));
        }
        if submission.amount > tender.budget {
            return Err(MarketError::Reverted(ContractRevert::BudgetExceeded));
        }

        let id = U256::from(state.bids.len() + 1);
        state.bids.push(BidInfo {
            id,
            tenderId: submission.tender_id,
            bidder: self.account,
            amount: submission.amount,
            proposal: submission.proposal,
            selected: false,
        });
        Ok(state.receipt())
    }
}

/// Scriptable wallet: tests switch account or chain and the matching event is
/// pushed to subscribers.
#[derive(Debug)]
pub struct MockWallet {
    accounts: Mutex<Vec<Address>>,
    chain_id: Mutex<u64>,
    failure: Mutex<Option<WalletError>>,
    delay: Mutex<Option<Duration>>,
    events: broadcast::Sender<WalletEvent>,
    market: SharedMarket,
}

impl MockWallet {
    pub fn new(account: Address, chain_id: u64, market: SharedMarket) -> Self {
        Self {
            accounts: Mutex::new(vec![account]),
            chain_id: Mutex::new(chain_id),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            events: broadcast::channel(16).0,
            market,
        }
    }

    pub fn fail_with(&self, error: WalletError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Make every account request take `delay`.
    pub fn respond_after(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn switch_account(&self, account: Address) {
        *self.accounts.lock().unwrap() = vec![account];
        let _ = self.events.send(WalletEvent::AccountsChanged(vec![account]));
    }

    pub fn switch_chain(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = chain_id;
        let _ = self.events.send(WalletEvent::ChainChanged(chain_id));
    }

    pub fn disconnect(&self) {
        let _ = self.events.send(WalletEvent::Disconnected);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    type Market = MockMarket;

    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn chain_id(&self) -> WalletResult<u64> {
        Ok(*self.chain_id.lock().unwrap())
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn bind_market(&self, _market_address: Address, account: Address, _gas_limit: u64) -> MockMarket {
        MockMarket {
            state: Arc::clone(&self.market),
            account,
        }
    }
}
