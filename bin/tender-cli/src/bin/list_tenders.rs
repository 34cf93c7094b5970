use alloy::network::EthereumWallet;
use alloy::providers::ProviderBuilder;
use color_eyre::Result;
use dotenv::dotenv;
use tender_cli_bin::{init, parsed_or, rpc_url, signer};
use tender_client::{ContractGateway, GatewayConfig, LocalWallet};
use tender_primitives::{TenderFilter, TenderQuery};

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

    // optional status filter and search text
    let filter: TenderFilter = parsed_or("TENDER_FILTER", TenderFilter::All)?;
    let query = TenderQuery::new(filter).search(std::env::var("TENDER_SEARCH").unwrap_or_default());

    let summaries = gateway.list_tender_summaries(limit).await?;
    for summary in summaries.iter().filter(|s| query.matches(&s.tender)) {
        let tender = &summary.tender;
        let action = if tender.accepts_bids_from(Some(account)) {
            "can bid"
        } else {
            "-"
        };
        println!(
            "#{} [{}] {} | budget {} ETH | deadline {} | {} bids | {}",
            tender.id,
            tender.status,
            tender.title,
            tender.budget_display(),
            tender.deadline.format("%Y-%m-%d %H:%M UTC"),
            summary.bid_count,
            action
        );
    }

    Ok(())
}
