//! Solidity bindings generated with `sol!`.

/// The `TenderMarket` contract.
pub mod tender_market;
