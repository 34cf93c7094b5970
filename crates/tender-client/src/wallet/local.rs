//! [`WalletProvider`] over an alloy provider with a local signer.

use async_trait::async_trait;
use std::marker::PhantomData;
use tender_primitives::alloy::network::Network;
use tender_primitives::alloy::primitives::Address;
use tender_primitives::alloy::providers::Provider;
use tender_primitives::alloy::transports::Transport;
use tokio::sync::broadcast;

use super::{WalletError, WalletEvent, WalletProvider, WalletResult};
use crate::market::OnchainTenderMarket;

const EVENT_CAPACITY: usize = 16;

/// Wallet backed by a local key: an alloy provider carrying an
/// `EthereumWallet` filler for `account`.
///
/// The key never changes, so the only events are the ones pushed through
/// [`LocalWallet::notify`] (e.g. after pointing the provider at another chain).
pub struct LocalWallet<T, P, N> {
    rpc_provider: P,
    account: Address,
    events: broadcast::Sender<WalletEvent>,
    phantom_data: PhantomData<(T, N)>,
}

impl<T, P, N> LocalWallet<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    /// `rpc_provider` must sign for `account`.
    pub fn new(rpc_provider: P, account: Address) -> Self {
        Self {
            rpc_provider,
            account,
            events: broadcast::channel(EVENT_CAPACITY).0,
            phantom_data: PhantomData,
        }
    }

    /// the signing account
    pub fn account(&self) -> Address {
        self.account
    }

    /// Publish a wallet event to every subscriber. Returns the number of receivers.
    pub fn notify(&self, event: WalletEvent) -> usize {
        self.events.send(event).unwrap_or(0)
    }
}

impl<T, P, N> std::fmt::Debug for LocalWallet<T, P, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("account", &self.account)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

#[async_trait]
impl<T, P, N> WalletProvider for LocalWallet<T, P, N>
where
    T: Transport + Clone + Send + Sync + 'static,
    P: Provider<T, N> + Clone + Send + Sync + 'static,
    N: Network + Clone + Send + Sync + 'static,
{
    type Market = OnchainTenderMarket<T, P, N>;

    async fn request_accounts(&self) -> WalletResult<Vec<Address>> {
        Ok(vec![self.account])
    }

    async fn chain_id(&self) -> WalletResult<u64> {
        self.rpc_provider
            .get_chain_id()
            .await
            .map_err(|e| WalletError::RpcError(e.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn bind_market(
        &self,
        market_address: Address,
        account: Address,
        gas_limit: u64,
    ) -> Self::Market {
        OnchainTenderMarket::new(self.rpc_provider.clone(), market_address, account, gas_limit)
    }
}
