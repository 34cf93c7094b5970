use alloy::network::EthereumWallet;
use alloy::primitives::U256;
use alloy::providers::ProviderBuilder;
use color_eyre::Result;
use dotenv::dotenv;
use tender_cli_bin::{init, rpc_url, signer, var};
use tender_client::{ContractGateway, GatewayConfig, GatewayError, LocalWallet};
use tender_primitives::validation::NewBid;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    dotenv().ok();

    let rpc_url = rpc_url()?;
    let signer = signer()?;
    let account = signer.address();

    let tender_id: U256 = var("TENDER_ID")?.parse()?;
    let bid = NewBid::new(tender_id, var("BID_AMOUNT")?, var("BID_PROPOSAL")?);

    let rpc_provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url);

    let gateway = ContractGateway::new(
        Some(LocalWallet::new(rpc_provider, account)),
        GatewayConfig::from_env()?,
    );
    gateway.connect().await?;

    match gateway.submit_bid(&bid).await {
        Ok(receipt) => {
            tracing::info!(
                "bid of {} ETH on tender {} submitted: tx {}, gas used {}",
                bid.amount,
                tender_id,
                receipt.transaction_hash,
                receipt.gas_used
            );
            Ok(())
        }
        Err(e @ GatewayError::BudgetExceededError) => {
            let tender = gateway.get_tender(tender_id).await?;
            tracing::error!("{} (budget is {} ETH)", e, tender.budget_display());
            Err(e.into())
        }
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!("bid failed, safe to retry: {}", e);
            }
            Err(e.into())
        }
    }
}
