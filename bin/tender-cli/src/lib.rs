//! Shared setup for the tender command line binaries.

use color_eyre::eyre::{eyre, Result};
use std::env;
use std::str::FromStr;
use tender_primitives::alloy::signers::PrivateKeySigner;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Install the error report handler and the tracing subscriber.
pub fn init() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();
    Ok(())
}

/// `RPC_URL`
pub fn rpc_url() -> Result<Url> {
    Ok(Url::parse(&env::var("RPC_URL")?)?)
}

/// Signer for `PRIVATE_KEY`.
pub fn signer() -> Result<PrivateKeySigner> {
    Ok(PrivateKeySigner::from_str(&env::var("PRIVATE_KEY")?)?)
}

/// Required variable.
pub fn var(key: &str) -> Result<String> {
    env::var(key).map_err(|_| eyre!("{} must be set", key))
}

/// Optional variable parsed as `T`, `default` when unset.
pub fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| eyre!("invalid {} '{}': {}", key, value, e)),
        Err(_) => Ok(default),
    }
}
