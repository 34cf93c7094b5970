use std::sync::Arc;
use std::time::Duration;

use common::fixtures::{gateway, seeded_market, BIDDER, CHAIN, OTHER_BIDDER, OTHER_CHAIN, UNCONFIGURED_CHAIN};
use common::helpers::{bid, settle, transactions, wait_for_state};
use common::mock::MockWallet;
use tender_client::{ConnectionState, GatewayError};
use tender_primitives::alloy::primitives::U256;
use tokio::sync::Notify;

mod common;

#[tokio::test]
async fn chain_change_rebinds_and_stales_old_connection() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    let first = gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().switch_chain(OTHER_CHAIN);
    wait_for_state(&gateway, |state| {
        state
            .connection()
            .is_some_and(|c| c.chain_id() == OTHER_CHAIN)
    })
    .await;

    assert_eq!(
        first.list_recent_tenders(10).await.unwrap_err(),
        GatewayError::StaleConnectionError
    );
    let current = gateway.connection().unwrap();
    assert!(current.generation() > first.generation());
    assert_eq!(current.list_recent_tenders(10).await.unwrap().len(), 5);
}

#[tokio::test]
async fn account_change_binds_writes_to_new_account() {
    let market = seeded_market();
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, market.clone())));
    gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().switch_account(OTHER_BIDDER);
    wait_for_state(&gateway, |state| {
        state
            .connection()
            .is_some_and(|c| c.account() == OTHER_BIDDER)
    })
    .await;

    gateway.submit_bid(&bid(3, "0.75")).await.unwrap();
    assert_eq!(transactions(&market), 1);
    let bids = gateway.get_bids_for_tender(U256::from(3)).await.unwrap();
    assert_eq!(bids.last().unwrap().bidder, OTHER_BIDDER);
}

#[tokio::test]
async fn switching_to_unconfigured_chain_stores_error() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().switch_chain(UNCONFIGURED_CHAIN);
    wait_for_state(&gateway, |state| {
        state.error() == Some(&GatewayError::UnconfiguredError(UNCONFIGURED_CHAIN))
    })
    .await;

    assert_eq!(
        gateway.list_recent_tenders(10).await.unwrap_err(),
        GatewayError::NotConnectedError
    );

    // no automatic retry once the binding is gone
    gateway.wallet().unwrap().switch_chain(CHAIN);
    settle().await;
    assert!(!gateway.state().is_connected());
}

#[tokio::test]
async fn wallet_disconnect_drops_binding() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    let connection = gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().disconnect();
    wait_for_state(&gateway, |state| {
        matches!(state, ConnectionState::Disconnected { error: None })
    })
    .await;
    assert!(!connection.is_live());
}

#[tokio::test]
async fn events_before_connect_are_ignored() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().switch_account(OTHER_BIDDER);
    settle().await;
    assert!(!gateway.state().is_connected());
    assert_eq!(gateway.state().error(), None);
}

#[tokio::test]
async fn dropped_watcher_stops_reacting() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    let connection = gateway.connect().await.unwrap();

    let watcher = gateway.watch_wallet().unwrap();
    assert!(watcher.is_running());
    drop(watcher);
    settle().await;

    gateway.wallet().unwrap().switch_chain(OTHER_CHAIN);
    settle().await;
    assert!(connection.is_live());
    assert_eq!(gateway.connection().unwrap().chain_id(), CHAIN);
}

#[tokio::test]
async fn shutdown_waits_for_event_loop() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    gateway.connect().await.unwrap();

    let watcher = gateway.watch_wallet().unwrap();
    watcher.shutdown().await;

    gateway.wallet().unwrap().switch_account(OTHER_BIDDER);
    settle().await;
    assert_eq!(gateway.current_account(), Some(BIDDER));
}

#[tokio::test]
async fn watching_without_wallet_fails() {
    let gateway = Arc::new(tender_client::ContractGateway::<MockWallet>::new(
        None,
        tender_client::GatewayConfig::default(),
    ));
    assert_eq!(
        gateway.watch_wallet().unwrap_err(),
        GatewayError::NoProviderError
    );
}

#[tokio::test]
async fn chain_change_passes_through_connecting() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    gateway.wallet().unwrap().respond_after(Duration::from_millis(100));
    gateway.wallet().unwrap().switch_chain(OTHER_CHAIN);

    wait_for_state(&gateway, |state| matches!(state, ConnectionState::Connecting)).await;
    assert_eq!(
        gateway.list_recent_tenders(10).await.unwrap_err(),
        GatewayError::NotConnectedError
    );
    wait_for_state(&gateway, |state| {
        state
            .connection()
            .is_some_and(|c| c.chain_id() == OTHER_CHAIN)
    })
    .await;
}

#[tokio::test]
async fn read_in_flight_during_rebind_fails_stale() {
    let market = seeded_market();
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, market.clone())));
    let first = gateway.connect().await.unwrap();
    let _watcher = gateway.watch_wallet().unwrap();

    let gate = Arc::new(Notify::new());
    market.lock().unwrap().read_gate = Some(Arc::clone(&gate));

    let reader = Arc::clone(&first);
    let read = tokio::spawn(async move { reader.list_recent_tenders(10).await });
    // let the read reach the market before the binding changes
    settle().await;
    assert!(!read.is_finished());

    gateway.wallet().unwrap().switch_chain(OTHER_CHAIN);
    wait_for_state(&gateway, |state| {
        state
            .connection()
            .is_some_and(|c| c.chain_id() == OTHER_CHAIN)
    })
    .await;

    gate.notify_one();
    assert_eq!(
        read.await.unwrap().unwrap_err(),
        GatewayError::StaleConnectionError
    );
}

#[tokio::test]
async fn second_watcher_is_refused_while_first_runs() {
    let gateway = Arc::new(gateway(MockWallet::new(BIDDER, CHAIN, seeded_market())));
    let first = gateway.connect().await.unwrap();

    let watcher = gateway.watch_wallet().unwrap();
    assert_eq!(
        gateway.watch_wallet().unwrap_err(),
        GatewayError::AlreadyWatchingError
    );

    // one event, one rebind
    gateway.wallet().unwrap().switch_chain(OTHER_CHAIN);
    wait_for_state(&gateway, |state| {
        state
            .connection()
            .is_some_and(|c| c.chain_id() == OTHER_CHAIN)
    })
    .await;
    settle().await;
    assert_eq!(
        gateway.connection().unwrap().generation(),
        first.generation() + 1
    );

    drop(watcher);
    assert!(gateway.watch_wallet().is_ok());
}
