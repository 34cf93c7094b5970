//! The gateway's connection state machine and its wallet event loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tender_primitives::alloy::primitives::{Address, U256};
use tender_primitives::validation::{NewBid, NewTender};
use tender_primitives::{Bid, Tender, TenderSummary, UserBid};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, SystemClock};
use crate::config::GatewayConfig;
use crate::connection::Connection;
use crate::error::{GatewayError, Result};
use crate::market::TxReceipt;
use crate::wallet::{WalletEvent, WalletProvider};

/// Lifecycle of the gateway's wallet binding.
pub enum ConnectionState<M> {
    /// no binding; `error` holds the failure of the last connect attempt
    Disconnected {
        /// why the last attempt failed, `None` after an explicit disconnect
        error: Option<GatewayError>,
    },
    /// a connect attempt is resolving accounts and chain
    Connecting,
    /// bound to a live connection
    Connected(Arc<Connection<M>>),
}

impl<M> ConnectionState<M> {
    /// Whether a binding is published.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    /// The published binding, if any.
    pub fn connection(&self) -> Option<&Arc<Connection<M>>> {
        match self {
            ConnectionState::Connected(connection) => Some(connection),
            _ => None,
        }
    }

    /// The stored failure of the last connect attempt.
    pub fn error(&self) -> Option<&GatewayError> {
        match self {
            ConnectionState::Disconnected { error } => error.as_ref(),
            _ => None,
        }
    }
}

impl<M> Clone for ConnectionState<M> {
    fn clone(&self) -> Self {
        match self {
            ConnectionState::Disconnected { error } => ConnectionState::Disconnected {
                error: error.clone(),
            },
            ConnectionState::Connecting => ConnectionState::Connecting,
            ConnectionState::Connected(connection) => {
                ConnectionState::Connected(Arc::clone(connection))
            }
        }
    }
}

impl<M> std::fmt::Debug for ConnectionState<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected { error } => f
                .debug_struct("Disconnected")
                .field("error", error)
                .finish(),
            ConnectionState::Connecting => f.write_str("Connecting"),
            ConnectionState::Connected(connection) => {
                f.debug_tuple("Connected").field(connection).finish()
            }
        }
    }
}

/// Mediates every read and write against the tender contract.
///
/// The gateway owns the current [`Connection`] and replaces it wholesale on
/// `connect`, `disconnect` and wallet account/chain changes. Failures are
/// never retried here; callers re-invoke the operation.
pub struct ContractGateway<W: WalletProvider> {
    wallet: Option<Arc<W>>,
    config: GatewayConfig,
    clock: Arc<dyn Clock>,
    state: watch::Sender<ConnectionState<W::Market>>,
    /// id of the newest connect attempt; only written under the state lock
    attempts: AtomicU64,
    /// token of the running wallet watcher
    watcher: Mutex<Option<CancellationToken>>,
}

impl<W: WalletProvider> std::fmt::Debug for ContractGateway<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractGateway")
            .field("has_wallet", &self.wallet.is_some())
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl<W: WalletProvider> ContractGateway<W> {
    /// `wallet` is `None` when no wallet is present; `connect` then fails with
    /// [`GatewayError::NoProviderError`].
    pub fn new(wallet: Option<W>, config: GatewayConfig) -> Self {
        Self {
            wallet: wallet.map(Arc::new),
            config,
            clock: Arc::new(SystemClock),
            state: watch::channel(ConnectionState::Disconnected { error: None }).0,
            attempts: AtomicU64::new(0),
            watcher: Mutex::new(None),
        }
    }

    /// Replace the time source used for deadline checks.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Configuration the gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The wallet, when one is present.
    pub fn wallet(&self) -> Option<&Arc<W>> {
        self.wallet.as_ref()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ConnectionState<W::Market> {
        self.state.borrow().clone()
    }

    /// Observe state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState<W::Market>> {
        self.state.subscribe()
    }

    /// The current binding.
    pub fn connection(&self) -> Result<Arc<Connection<W::Market>>> {
        self.state
            .borrow()
            .connection()
            .cloned()
            .ok_or(GatewayError::NotConnectedError)
    }

    /// Account of the current binding.
    pub fn current_account(&self) -> Option<Address> {
        self.state.borrow().connection().map(|c| c.account())
    }

    /// Request account access, resolve the chain and bind the contract deployed
    /// on it. Replaces any previous binding.
    ///
    /// Dropping the returned future before it completes leaves the gateway
    /// `Disconnected` with [`GatewayError::ConnectCancelledError`].
    pub async fn connect(&self) -> Result<Arc<Connection<W::Market>>> {
        let mut attempt = 0;
        // the attempt id and the Connecting state are published together
        self.state.send_modify(|state| {
            attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            invalidate(std::mem::replace(state, ConnectionState::Connecting));
        });

        let mut pending = PendingAttempt {
            gateway: self,
            attempt,
            settled: false,
        };
        let outcome = self.establish(attempt).await;
        pending.settled = true;

        let mut committed = false;
        self.state.send_if_modified(|state| {
            if self.attempts.load(Ordering::SeqCst) != attempt {
                return false;
            }
            let next = match &outcome {
                Ok(connection) => ConnectionState::Connected(Arc::clone(connection)),
                Err(error) => ConnectionState::Disconnected {
                    error: Some(error.clone()),
                },
            };
            invalidate(std::mem::replace(state, next));
            committed = true;
            true
        });

        if !committed {
            tracing::warn!("connect attempt {} superseded by a newer one", attempt);
            if let Ok(connection) = &outcome {
                connection.invalidate();
            }
            return Err(GatewayError::StaleConnectionError);
        }

        match &outcome {
            Ok(connection) => tracing::info!(
                "connected account {} on chain {} to market {}",
                connection.account(),
                connection.chain_id(),
                connection.market_address()
            ),
            Err(error) => tracing::warn!("connect failed: {}", error),
        }
        outcome
    }

    /// Drop the current binding. In-flight connect attempts are discarded.
    pub fn disconnect(&self) {
        self.state.send_modify(|state| {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            invalidate(std::mem::replace(
                state,
                ConnectionState::Disconnected { error: None },
            ));
        });
        tracing::info!("wallet binding dropped");
    }

    async fn establish(&self, generation: u64) -> Result<Arc<Connection<W::Market>>> {
        let wallet = self.wallet.as_ref().ok_or(GatewayError::NoProviderError)?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or_else(|| {
            GatewayError::AccountAccessError("wallet exposed no accounts".into())
        })?;

        let chain_id = wallet.chain_id().await?;
        let market_address = self
            .config
            .contracts
            .address_for(chain_id)
            .ok_or(GatewayError::UnconfiguredError(chain_id))?;

        let market = wallet.bind_market(market_address, account, self.config.gas_limit);
        Ok(Arc::new(Connection::new(
            generation,
            account,
            chain_id,
            market_address,
            market,
            Arc::clone(&self.clock),
        )))
    }

    /// Subscribe to wallet events. Account and chain changes while bound
    /// rebuild the binding; a wallet disconnect drops it. Dropping the returned
    /// watcher tears the subscription down.
    ///
    /// Only one watcher runs at a time; a second call while it is alive fails
    /// with [`GatewayError::AlreadyWatchingError`].
    pub fn watch_wallet(self: &Arc<Self>) -> Result<WalletWatcher> {
        let wallet = self.wallet.as_ref().ok_or(GatewayError::NoProviderError)?;

        let token = {
            let mut current = self.watcher.lock().unwrap_or_else(|e| e.into_inner());
            if current.as_ref().is_some_and(|token| !token.is_cancelled()) {
                return Err(GatewayError::AlreadyWatchingError);
            }
            let token = CancellationToken::new();
            *current = Some(token.clone());
            token
        };
        let mut events = wallet.subscribe();

        let gateway = Arc::clone(self);
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancelled.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(event) => gateway.handle_wallet_event(event).await,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("missed {} wallet events, rebuilding binding", skipped);
                            gateway.rebind_if_active().await;
                        }
                        Err(RecvError::Closed) => {
                            tracing::info!("wallet event stream closed");
                            break;
                        }
                    },
                }
            }
            // frees the slot for a later watcher
            cancelled.cancel();
        });

        Ok(WalletWatcher {
            token,
            handle: Some(handle),
        })
    }

    async fn handle_wallet_event(&self, event: WalletEvent) {
        tracing::debug!("wallet event: {:?}", event);
        match event {
            WalletEvent::Disconnected => self.disconnect(),
            WalletEvent::AccountsChanged(_) | WalletEvent::ChainChanged(_) => {
                self.rebind_if_active().await
            }
        }
    }

    async fn rebind_if_active(&self) {
        let active = matches!(
            *self.state.borrow(),
            ConnectionState::Connected(_) | ConnectionState::Connecting
        );
        if !active {
            tracing::debug!("ignoring wallet change while disconnected");
            return;
        }
        // failures are stored in the state by connect itself
        let _ = self.connect().await;
    }

    /// See [`Connection::list_recent_tenders`].
    pub async fn list_recent_tenders(&self, limit: u64) -> Result<Vec<Tender>> {
        self.connection()?.list_recent_tenders(limit).await
    }

    /// See [`Connection::list_tender_summaries`].
    pub async fn list_tender_summaries(&self, limit: u64) -> Result<Vec<TenderSummary>> {
        self.connection()?.list_tender_summaries(limit).await
    }

    /// See [`Connection::get_tender`].
    pub async fn get_tender(&self, tender_id: U256) -> Result<Tender> {
        self.connection()?.get_tender(tender_id).await
    }

    /// See [`Connection::get_bids_for_tender`].
    pub async fn get_bids_for_tender(&self, tender_id: U256) -> Result<Vec<Bid>> {
        self.connection()?.get_bids_for_tender(tender_id).await
    }

    /// See [`Connection::list_user_bids`].
    pub async fn list_user_bids(&self, limit: u64) -> Result<Vec<UserBid>> {
        self.connection()?.list_user_bids(limit).await
    }

    /// See [`Connection::post_tender`].
    pub async fn post_tender(&self, tender: &NewTender) -> Result<TxReceipt> {
        self.connection()?.post_tender(tender).await
    }

    /// See [`Connection::submit_bid`].
    pub async fn submit_bid(&self, bid: &NewBid) -> Result<TxReceipt> {
        self.connection()?.submit_bid(bid).await
    }
}

/// Settles an attempt whose `connect` future was dropped mid-flight.
struct PendingAttempt<'a, W: WalletProvider> {
    gateway: &'a ContractGateway<W>,
    attempt: u64,
    settled: bool,
}

impl<W: WalletProvider> Drop for PendingAttempt<'_, W> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let attempt = self.attempt;
        let attempts = &self.gateway.attempts;
        let cancelled = self.gateway.state.send_if_modified(|state| {
            if attempts.load(Ordering::SeqCst) != attempt {
                return false;
            }
            invalidate(std::mem::replace(
                state,
                ConnectionState::Disconnected {
                    error: Some(GatewayError::ConnectCancelledError),
                },
            ));
            true
        });
        if cancelled {
            tracing::warn!("connect attempt {} cancelled", attempt);
        }
    }
}

fn invalidate<M>(previous: ConnectionState<M>) {
    if let ConnectionState::Connected(connection) = previous {
        connection.invalidate();
    }
}

/// Running wallet event subscription; stops when dropped.
#[derive(Debug)]
pub struct WalletWatcher {
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl WalletWatcher {
    /// Stop the subscription and wait for the event loop to exit.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::error!("wallet watcher task failed: {}", e);
            }
        }
    }

    /// Whether the event loop is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for WalletWatcher {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
