//! Constants for local test deployments.

use crate::MarketConstants;
use alloy::primitives::Address;

/// Test chain id. Matches the local hardhat network.
pub const TEST_CHAIN_ID: u64 = 31337;

/// Test address for the settlement contract.
pub const TEST_MARKET_ADDRESS: Address = Address::repeat_byte(0x4d);

/// Test address for the registry operator.
pub const TEST_OPERATOR: Address = Address::repeat_byte(0x0a);

/// Test address for the quote token.
pub const TEST_QUOTE_TOKEN: Address = Address::repeat_byte(0x51);

/// Test address for a quote token that is never registered.
pub const TEST_UNLISTED_TOKEN: Address = Address::repeat_byte(0x52);

/// Test address for the NFT collection.
pub const TEST_NFT: Address = Address::repeat_byte(0x72);

/// Test address for an unrelated contract, used to produce signatures bound
/// to the wrong verifying contract.
pub const TEST_OTHER_CONTRACT: Address = Address::repeat_byte(0x5e);

/// Market constants for unit tests.
pub const TEST_MARKET: MarketConstants =
    MarketConstants::new(TEST_CHAIN_ID, TEST_MARKET_ADDRESS, TEST_OPERATOR);
