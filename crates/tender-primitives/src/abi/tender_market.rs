//! `TenderMarket` interface: structs, calls and custom errors.
//!
//! `#[sol(rpc)]` also generates `TenderMarketInstance` for provider-backed calls.

use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug, PartialEq, Eq)]
    interface TenderMarket {
        struct TenderInfo {
            uint256 id;
            string title;
            string description;
            uint256 budget;
            uint256 deadline;
            uint8 status;
            address owner;
        }

        struct BidInfo {
            uint256 id;
            uint256 tenderId;
            address bidder;
            uint256 amount;
            string proposal;
            bool selected;
        }

        error BidExceedsBudget(uint256 amount, uint256 budget);
        error TenderNotOpen(uint256 tenderId);
        error OwnerCannotBid(uint256 tenderId);
        error DeadlinePassed(uint256 tenderId, uint256 deadline);
        error TenderNotFound(uint256 tenderId);

        event TenderPosted(uint256 indexed tenderId, address indexed owner, uint256 budget, uint256 deadline);
        event BidSubmitted(uint256 indexed tenderId, uint256 indexed bidId, address indexed bidder, uint256 amount);

        function getRecentTenders(uint256 limit) external view returns (TenderInfo[] memory);
        function getTenderDetails(uint256 tenderId) external view returns (TenderInfo memory);
        function getTenderBids(uint256 tenderId) external view returns (BidInfo[] memory);

        function postTender(string title, string description, uint256 budget, uint256 deadline) external;
        function submitBid(uint256 tenderId, uint256 amount, string proposal) external;
    }
}
