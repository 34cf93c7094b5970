use chrono::{DateTime, Utc};
use tender_client::clock::FixedClock;
use tender_client::{ContractGateway, GatewayConfig};
use tender_primitives::abi::tender_market::TenderMarket::{BidInfo, TenderInfo};
use tender_primitives::alloy::primitives::{address, Address, U256};
use tender_primitives::markets::{BASE_SEPOLIA_CHAIN_ID, SEPOLIA_CHAIN_ID};

use super::mock::{MarketState, MockWallet, SharedMarket};

pub const OWNER: Address = address!("00000000000000000000000000000000000000a1");
pub const BIDDER: Address = address!("00000000000000000000000000000000000000b2");
pub const OTHER_BIDDER: Address = address!("00000000000000000000000000000000000000b3");

pub const CHAIN: u64 = SEPOLIA_CHAIN_ID;
pub const OTHER_CHAIN: u64 = BASE_SEPOLIA_CHAIN_ID;
pub const UNCONFIGURED_CHAIN: u64 = 31337;

pub const NOW: u64 = 1_800_000_000;
pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(NOW as i64, 0).unwrap()
}

pub fn tender_info(id: u64, budget: u128, status: u8, owner: Address, deadline: u64) -> TenderInfo {
    TenderInfo {
        id: U256::from(id),
        title: format!("Tender #{}", id),
        description: format!("works package {}", id),
        budget: U256::from(budget),
        deadline: U256::from(deadline),
        status,
        owner,
    }
}

pub fn bid_info(id: u64, tender_id: u64, bidder: Address, amount: u128, selected: bool) -> BidInfo {
    BidInfo {
        id: U256::from(id),
        tenderId: U256::from(tender_id),
        bidder,
        amount: U256::from(amount),
        proposal: format!("proposal {}", id),
        selected,
    }
}

/// Five tenders owned by [`OWNER`]:
/// 1 open (2 ETH), 2 closed, 3 open (1 ETH), 4 open but past deadline, 5 awarded.
pub fn seeded_market() -> SharedMarket {
    let future = NOW + 86_400;
    MarketState::shared(
        vec![
            tender_info(1, 2 * ONE_ETHER, 0, OWNER, future),
            tender_info(2, ONE_ETHER, 1, OWNER, future),
            tender_info(3, ONE_ETHER, 0, OWNER, future),
            tender_info(4, ONE_ETHER, 0, OWNER, NOW - 60),
            tender_info(5, ONE_ETHER, 2, OWNER, future),
        ],
        vec![
            bid_info(1, 1, BIDDER, ONE_ETHER, false),
            bid_info(2, 3, OTHER_BIDDER, ONE_ETHER / 2, false),
            bid_info(3, 1, OTHER_BIDDER, ONE_ETHER, false),
            bid_info(4, 5, BIDDER, ONE_ETHER / 4, true),
        ],
        NOW,
    )
}

pub fn gateway(wallet: MockWallet) -> ContractGateway<MockWallet> {
    ContractGateway::new(Some(wallet), GatewayConfig::default()).with_clock(FixedClock(now()))
}
