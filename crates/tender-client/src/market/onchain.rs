//! [`TenderMarket`] over an alloy provider.

use alloy::contract::Error as ContractError;
use async_trait::async_trait;
use std::marker::PhantomData;
use tender_primitives::abi::tender_market::TenderMarket::{
    BidInfo, TenderInfo, TenderMarketInstance,
};
use tender_primitives::alloy::network::{Network, ReceiptResponse};
use tender_primitives::alloy::primitives::{Address, U256};
use tender_primitives::alloy::providers::Provider;
use tender_primitives::alloy::transports::Transport;
use tender_primitives::validation::{BidSubmission, TenderSubmission};
use tender_primitives::ContractRevert;

use super::{MarketError, MarketResult, TenderMarket, TxReceipt};

/// Tender market deployment reached through an alloy provider whose wallet
/// signs for `account`.
#[derive(Clone)]
pub struct OnchainTenderMarket<T, P, N> {
    rpc_provider: P,
    market_address: Address,
    account: Address,
    gas_limit: u64,
    phantom_data: PhantomData<(T, N)>,
}

impl<T, P, N> OnchainTenderMarket<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    /// Bind the deployment at `market_address`; writes carry `gas_limit`.
    pub fn new(rpc_provider: P, market_address: Address, account: Address, gas_limit: u64) -> Self {
        Self {
            rpc_provider,
            market_address,
            account,
            gas_limit,
            phantom_data: PhantomData,
        }
    }

    fn instance(&self) -> TenderMarketInstance<T, P, N> {
        TenderMarketInstance::new(self.market_address, self.rpc_provider.clone())
    }
}

impl<T, P, N> std::fmt::Debug for OnchainTenderMarket<T, P, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnchainTenderMarket")
            .field("market_address", &self.market_address)
            .field("account", &self.account)
            .field("gas_limit", &self.gas_limit)
            .finish()
    }
}

#[async_trait]
impl<T, P, N> TenderMarket for OnchainTenderMarket<T, P, N>
where
    T: Transport + Clone + Send + Sync,
    P: Provider<T, N> + Clone + Send + Sync,
    N: Network + Clone + Send + Sync,
{
    async fn recent_tenders(&self, limit: U256) -> MarketResult<Vec<TenderInfo>> {
        let market_contract = self.instance();
        let tenders = market_contract
            .getRecentTenders(limit)
            .call()
            .await
            .map_err(classify_error)?
            ._0;
        Ok(tenders)
    }

    async fn tender_details(&self, tender_id: U256) -> MarketResult<TenderInfo> {
        let market_contract = self.instance();
        let tender = market_contract
            .getTenderDetails(tender_id)
            .call()
            .await
            .map_err(classify_error)?
            ._0;
        Ok(tender)
    }

    async fn tender_bids(&self, tender_id: U256) -> MarketResult<Vec<BidInfo>> {
        let market_contract = self.instance();
        let bids = market_contract
            .getTenderBids(tender_id)
            .call()
            .await
            .map_err(classify_error)?
            ._0;
        Ok(bids)
    }

    async fn post_tender(&self, submission: TenderSubmission) -> MarketResult<TxReceipt> {
        let market_contract = self.instance();
        let call = market_contract
            .postTender(
                submission.title,
                submission.description,
                submission.budget,
                submission.deadline,
            )
            .from(self.account)
            .gas(self.gas_limit);

        // surface revert data before paying for a failing transaction
        call.call().await.map_err(classify_error)?;

        let receipt = call
            .send()
            .await
            .map_err(classify_error)?
            .get_receipt()
            .await
            .map_err(|e| MarketError::TransactionError(e.to_string()))?;

        tracing::info!("postTender txs receipt: {:?}", receipt.transaction_hash());
        into_receipt(receipt)
    }

    async fn submit_bid(&self, submission: BidSubmission) -> MarketResult<TxReceipt> {
        let market_contract = self.instance();
        let call = market_contract
            .submitBid(submission.tender_id, submission.amount, submission.proposal)
            .from(self.account)
            .gas(self.gas_limit);

        call.call().await.map_err(classify_error)?;

        let receipt = call
            .send()
            .await
            .map_err(classify_error)?
            .get_receipt()
            .await
            .map_err(|e| MarketError::TransactionError(e.to_string()))?;

        tracing::info!("submitBid txs receipt: {:?}", receipt.transaction_hash());
        into_receipt(receipt)
    }
}

fn into_receipt<R: ReceiptResponse>(receipt: R) -> MarketResult<TxReceipt> {
    if !receipt.status() {
        return Err(MarketError::TransactionError(format!(
            "transaction {} reverted",
            receipt.transaction_hash()
        )));
    }
    Ok(TxReceipt {
        transaction_hash: receipt.transaction_hash(),
        block_number: receipt.block_number(),
        gas_used: u128::from(receipt.gas_used()),
    })
}

/// Pull revert data out of a node error response, if there is any.
fn classify_error(error: ContractError) -> MarketError {
    if let ContractError::TransportError(transport_error) = &error {
        if let Some(payload) = transport_error.as_error_resp() {
            if let Some(data) = payload.as_revert_data() {
                return MarketError::Reverted(ContractRevert::decode(&data));
            }
            // some nodes only put the reason in the message
            let message: &str = &payload.message;
            if let Some(reason) = message.strip_prefix("execution reverted: ") {
                return MarketError::Reverted(ContractRevert::from_reason(reason));
            }
            if message.starts_with("execution reverted") {
                return MarketError::Reverted(ContractRevert::Other(message.to_string()));
            }
        }
    }
    MarketError::RpcError(error.to_string())
}
