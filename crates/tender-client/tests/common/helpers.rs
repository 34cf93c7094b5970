use std::time::Duration;
use tender_client::{ConnectionState, ContractGateway};
use tender_primitives::validation::NewBid;
use tender_primitives::alloy::primitives::U256;

use super::mock::{MockMarket, MockWallet, SharedMarket};

pub const STATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Wait until the gateway state satisfies `predicate`, failing the test after
/// [`STATE_TIMEOUT`].
pub async fn wait_for_state<F>(gateway: &ContractGateway<MockWallet>, mut predicate: F)
where
    F: FnMut(&ConnectionState<MockMarket>) -> bool,
{
    let mut states = gateway.subscribe_state();
    tokio::time::timeout(STATE_TIMEOUT, async {
        states.wait_for(|state| predicate(state)).await.map(|_| ())
    })
    .await
    .expect("timed out waiting for gateway state")
    .expect("gateway state channel closed");
}

/// Give spawned tasks a chance to process pending wallet events.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn bid(tender_id: u64, amount: &str) -> NewBid {
    NewBid::new(U256::from(tender_id), amount, "delivery plan")
}

pub fn write_attempts(market: &SharedMarket) -> usize {
    market.lock().unwrap().write_attempts
}

pub fn transactions(market: &SharedMarket) -> usize {
    market.lock().unwrap().transactions
}
