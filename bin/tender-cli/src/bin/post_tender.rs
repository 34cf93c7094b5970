use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use color_eyre::Result;
use dotenv::dotenv;
use tender_cli_bin::{init, rpc_url, signer, var};
use tender_client::{ContractGateway, GatewayConfig, LocalWallet};
use tender_primitives::validation::NewTender;

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    dotenv().ok();

    let rpc_url = rpc_url()?;
    let signer = signer()?;
    let account = signer.address();

    // raw form input, validated by the gateway
    let tender = NewTender::new(
        var("TENDER_TITLE")?,
        var("TENDER_DESCRIPTION")?,
        var("TENDER_BUDGET")?,
        var("TENDER_DEADLINE")?,
    );

    let rpc_provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url);

    let gateway = ContractGateway::new(
        Some(LocalWallet::new(rpc_provider, account)),
        GatewayConfig::from_env()?,
    );
    gateway.connect().await?;

    let receipt = gateway.post_tender(&tender).await?;
    tracing::info!(
        "tender '{}' posted: tx {} in block {:?}, gas used {}",
        tender.title,
        receipt.transaction_hash,
        receipt.block_number,
        receipt.gas_used
    );

    Ok(())
}
