use alloy::network::EthereumWallet;
use alloy::primitives::U256;
use alloy::providers::ProviderBuilder;
use color_eyre::Result;
use dotenv::dotenv;
use tender_cli_bin::{init, rpc_url, signer, var};
use tender_client::{ContractGateway, GatewayConfig, LocalWallet};

#[tokio::main]
async fn main() -> Result<()> {
    init()?;
    dotenv().ok();

    let rpc_url = rpc_url()?;
    let signer = signer()?;
    let account = signer.address();
    let tender_id: U256 = var("TENDER_ID")?.parse()?;

    let rpc_provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url);

    let gateway = ContractGateway::new(
        Some(LocalWallet::new(rpc_provider, account)),
        GatewayConfig::from_env()?,
    );
    gateway.connect().await?;

    let tender = gateway.get_tender(tender_id).await?;
    println!(
        "#{} {} ({}), budget {} ETH",
        tender.id,
        tender.title,
        tender.status,
        tender.budget_display()
    );

    let bids = gateway.get_bids_for_tender(tender_id).await?;
    if bids.is_empty() {
        println!("no bids yet");
    }
    for bid in bids {
        println!(
            "  bid #{} by {}: {} ETH{} | {}",
            bid.id,
            bid.bidder,
            bid.amount_display(),
            if bid.selected { " (selected)" } else { "" },
            bid.proposal
        );
    }

    Ok(())
}
