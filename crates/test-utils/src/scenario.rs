//! A seeded market mirroring a fresh local deployment: a seller holding a
//! collection, a funded buyer, and one registered quote token.

use crate::{
    ledger::MemoryLedger,
    users::{BUYER, SELLER, TEST_USERS},
};
use alloy::{
    primitives::{Address, U256},
    uint,
};
use gallery_constants::test_utils::{
    TEST_MARKET, TEST_MARKET_ADDRESS, TEST_NFT, TEST_OPERATOR, TEST_QUOTE_TOKEN,
};
use gallery_market::{Market, QuoteTokenRegistry, SharedMarket};
use gallery_types::{AssetId, MarketDomain, OfferOrder, SellOrder, SignaturePair, SigningError};

/// Ledger timestamp at the start of every scenario.
pub const SCENARIO_START: u64 = 1_700_000_000;

/// Number of assets minted to the seller, ids `1..=ASSET_COUNT`.
pub const ASSET_COUNT: u64 = 20;

/// Quote token balance of the buyer, also approved to the market.
pub const BUYER_FUNDS: U256 = uint!(1_000_000_U256);

/// The test collection asset with the given id.
pub fn asset(id: u64) -> AssetId {
    AssetId::new(TEST_NFT, U256::from(id))
}

/// The seeded ledger, at [`SCENARIO_START`].
pub fn gallery_ledger() -> MemoryLedger {
    seed_ledger(MemoryLedger::at(SCENARIO_START))
}

/// Seed an empty ledger with the scenario's assets, funds and approvals.
pub fn seed_ledger(mut ledger: MemoryLedger) -> MemoryLedger {
    let seller = seller();
    let buyer = buyer();

    for id in 1..=ASSET_COUNT {
        ledger.mint_asset(asset(id), seller);
    }
    ledger.set_approval_for_all(TEST_NFT, seller, TEST_MARKET_ADDRESS, true);

    ledger.mint_tokens(TEST_QUOTE_TOKEN, buyer, BUYER_FUNDS);
    ledger.approve(TEST_QUOTE_TOKEN, buyer, TEST_MARKET_ADDRESS, BUYER_FUNDS);
    ledger
}

/// A registry managed by the test operator, with the test quote token listed.
pub fn gallery_registry() -> QuoteTokenRegistry {
    let registry = QuoteTokenRegistry::new(TEST_OPERATOR);
    registry
        .add_quote_token(TEST_OPERATOR, TEST_QUOTE_TOKEN)
        .expect("operator adds the quote token");
    registry
}

/// The seeded market.
pub fn gallery_market() -> Market<MemoryLedger> {
    Market::new(&TEST_MARKET, gallery_registry(), gallery_ledger())
}

/// The seeded market, with its clock at the current wall-clock time.
pub fn live_gallery_market() -> Market<MemoryLedger> {
    Market::new(&TEST_MARKET, gallery_registry(), seed_ledger(MemoryLedger::now()))
}

/// The seeded market, shared.
pub fn shared_gallery_market() -> SharedMarket<MemoryLedger> {
    SharedMarket::new(gallery_market())
}

/// A listing of `asset(id)` by the seller, priced in the test quote token,
/// valid for `ttl` seconds from the scenario start.
pub fn listing(id: u64, price: u64, ttl: u64) -> SellOrder {
    SellOrder::new(
        seller(),
        TEST_QUOTE_TOKEN,
        U256::from(price),
        SCENARIO_START + ttl,
        asset(id),
    )
}

/// An offer by the buyer on `asset(id)`, priced in the test quote token.
pub fn offer(id: u64, price: u64, offer_ttl: u64, sale_ttl: u64) -> OfferOrder {
    OfferOrder::new(
        buyer(),
        TEST_QUOTE_TOKEN,
        U256::from(price),
        SCENARIO_START + offer_ttl,
        SCENARIO_START + sale_ttl,
        asset(id),
    )
}

/// Sign a listing as the seller, for settlement by the buyer directly.
pub async fn sign_listing(
    domain: &MarketDomain,
    order: &SellOrder,
) -> Result<SignaturePair, SigningError> {
    let seller = order.sign(domain, *SELLER).await?;
    Ok(SignaturePair::seller_only(seller))
}

/// Sign a listing as the seller and the buyer, for relayed settlement.
pub async fn sign_relayed_listing(
    domain: &MarketDomain,
    order: &SellOrder,
) -> Result<SignaturePair, SigningError> {
    let seller = order.sign(domain, *SELLER).await?;
    let buyer = order.sign_purchase(domain, *BUYER).await?;
    Ok(SignaturePair::new(seller, buyer))
}

/// Sign an offer as the buyer and its acceptance as the seller.
pub async fn sign_offer(
    domain: &MarketDomain,
    order: &OfferOrder,
) -> Result<SignaturePair, SigningError> {
    let maker = order.sign_offer(domain, *BUYER).await?;
    let acceptance = order.sign_acceptance(domain, *SELLER).await?;
    Ok(SignaturePair::new(acceptance, maker))
}

/// The seller's address.
pub fn seller() -> Address {
    TEST_USERS[1]
}

/// The buyer's address.
pub fn buyer() -> Address {
    TEST_USERS[2]
}
