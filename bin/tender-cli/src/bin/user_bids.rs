use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use color_eyre::Result;
use dotenv::dotenv;
use tender_cli_bin::{init, rpc_url, signer};
use tender_client::{ContractGateway, GatewayConfig, LocalWallet};

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    dotenv().ok();

    let rpc_url = rpc_url()?;
    let signer = signer()?;
    let account = signer.address();

    let rpc_provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url);

    let config = GatewayConfig::from_env()?;
    let limit = config.recent_tenders_limit;
    let gateway = ContractGateway::new(Some(LocalWallet::new(rpc_provider, account)), config);
    gateway.connect().await?;

    let bids = gateway.list_user_bids(limit).await?;
    println!("{} bids by {}", bids.len(), account);
    for entry in bids {
        println!(
            "  tender #{} {} [{}]: {} ETH, {}",
            entry.tender.id,
            entry.tender.title,
            entry.tender.status,
            entry.bid.amount_display(),
            entry.status_label()
        );
    }

    Ok(())
}
