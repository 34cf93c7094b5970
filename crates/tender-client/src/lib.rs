//! Contract gateway for the tender market.
//!
//! [`ContractGateway`] binds a [`WalletProvider`] to the tender contract of the
//! wallet's active chain and exposes the market's reads and writes with
//! pre-flight validation and a fixed error taxonomy ([`GatewayError`]).

/// Time sources.
pub mod clock;
/// Gateway configuration.
pub mod config;
/// Wallet bindings and the operations issued through them.
pub mod connection;
/// Gateway error taxonomy.
pub mod error;
/// The gateway and its connection state machine.
pub mod gateway;
/// Contract boundary.
pub mod market;
/// Wallet boundary.
pub mod wallet;

pub use config::GatewayConfig;
pub use connection::Connection;
pub use error::{GatewayError, Result};
pub use gateway::{ConnectionState, ContractGateway, WalletWatcher};
pub use market::{MarketError, TenderMarket, TxReceipt};
pub use wallet::{LocalWallet, WalletError, WalletEvent, WalletProvider};
