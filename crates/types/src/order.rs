use crate::{
    bindings::{DirectSell, Offer},
    MarketDomain,
};
use alloy::{
    primitives::{Address, B256, U256},
    sol_types::SolStruct,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A specific non-fungible asset: a collection contract and a token id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetId {
    /// The collection contract.
    pub contract: Address,
    /// The token id within the collection.
    pub id: U256,
}

impl AssetId {
    /// Create a new asset id.
    pub const fn new(contract: Address, id: U256) -> Self {
        Self { contract, id }
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.contract, self.id)
    }
}

/// The kind of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderKind {
    /// A fixed-price listing created by the asset owner.
    DirectSell,
    /// An offer on an asset created by a prospective buyer.
    Offer,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectSell => f.write_str("direct-sell"),
            Self::Offer => f.write_str("offer"),
        }
    }
}

/// A fixed-price listing. The seller signs these terms, and any buyer may
/// settle them before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrder {
    /// The asset owner listing the asset.
    pub seller: Address,
    /// The payment token.
    pub quote_token: Address,
    /// Price in quote token units.
    pub price: U256,
    /// Timestamp after which the listing is void.
    pub deadline: u64,
    /// The listed asset.
    pub asset: AssetId,
}

impl SellOrder {
    /// Create a new sell order.
    pub const fn new(
        seller: Address,
        quote_token: Address,
        price: U256,
        deadline: u64,
        asset: AssetId,
    ) -> Self {
        Self { seller, quote_token, price, deadline, asset }
    }

    /// The EIP-712 struct signed by the seller.
    pub fn as_struct(&self) -> DirectSell {
        DirectSell {
            seller: self.seller,
            quoteToken: self.quote_token,
            price: self.price,
            deadline: U256::from(self.deadline),
            nftAddress: self.asset.contract,
            nftId: self.asset.id,
        }
    }

    /// The EIP-712 struct hash of the listing.
    pub fn struct_hash(&self) -> B256 {
        self.as_struct().eip712_hash_struct()
    }

    /// The digest signed by the seller (and, for relayed settlement, the
    /// buyer).
    pub fn signing_hash(&self, domain: &MarketDomain) -> B256 {
        domain.signing_hash(self.struct_hash())
    }

    /// The key under which settlement of this listing is recorded.
    ///
    /// Covers every term of the listing, never the signatures.
    pub fn order_key(&self) -> B256 {
        self.struct_hash()
    }
}

/// An offer on a specific asset.
///
/// The offer provider signs the terms bound to `offer_deadline`. The
/// accepting seller signs the same terms bound to `sale_deadline`. The offer
/// stays acceptable until the earlier of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferOrder {
    /// The prospective buyer making the offer.
    pub offer_maker: Address,
    /// The payment token.
    pub quote_token: Address,
    /// Offered price in quote token units.
    pub price: U256,
    /// Timestamp after which the offer is void.
    pub offer_deadline: u64,
    /// Timestamp after which the seller's acceptance is void.
    pub sale_deadline: u64,
    /// The asset the offer is made on.
    pub asset: AssetId,
}

impl OfferOrder {
    /// Create a new offer.
    pub const fn new(
        offer_maker: Address,
        quote_token: Address,
        price: U256,
        offer_deadline: u64,
        sale_deadline: u64,
        asset: AssetId,
    ) -> Self {
        Self { offer_maker, quote_token, price, offer_deadline, sale_deadline, asset }
    }

    /// The EIP-712 offer struct bound to the given deadline.
    pub fn as_struct(&self, deadline: u64) -> Offer {
        Offer {
            offerProvider: self.offer_maker,
            quoteToken: self.quote_token,
            price: self.price,
            deadline: U256::from(deadline),
            nftAddress: self.asset.contract,
            nftId: self.asset.id,
        }
    }

    /// The struct hash of the terms signed by the offer provider.
    pub fn maker_struct_hash(&self) -> B256 {
        self.as_struct(self.offer_deadline).eip712_hash_struct()
    }

    /// The struct hash of the terms signed by the accepting seller.
    pub fn acceptance_struct_hash(&self) -> B256 {
        self.as_struct(self.sale_deadline).eip712_hash_struct()
    }

    /// The digest signed by the offer provider.
    pub fn maker_signing_hash(&self, domain: &MarketDomain) -> B256 {
        domain.signing_hash(self.maker_struct_hash())
    }

    /// The digest signed by the accepting seller.
    pub fn acceptance_signing_hash(&self, domain: &MarketDomain) -> B256 {
        domain.signing_hash(self.acceptance_struct_hash())
    }

    /// The key under which settlement of this offer is recorded.
    ///
    /// This is the offer provider's signed terms, so an offer can be
    /// accepted once regardless of the sale deadline the seller picks.
    pub fn order_key(&self) -> B256 {
        self.maker_struct_hash()
    }
}

/// An order of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Order {
    /// A fixed-price listing.
    DirectSell(SellOrder),
    /// An offer on an asset.
    Offer(OfferOrder),
}

impl Order {
    /// The order kind.
    pub const fn kind(&self) -> OrderKind {
        match self {
            Self::DirectSell(_) => OrderKind::DirectSell,
            Self::Offer(_) => OrderKind::Offer,
        }
    }

    /// The order originator: the seller of a listing, or the maker of an
    /// offer.
    pub const fn party(&self) -> Address {
        match self {
            Self::DirectSell(order) => order.seller,
            Self::Offer(order) => order.offer_maker,
        }
    }

    /// The payment token.
    pub const fn quote_token(&self) -> Address {
        match self {
            Self::DirectSell(order) => order.quote_token,
            Self::Offer(order) => order.quote_token,
        }
    }

    /// The price in quote token units.
    pub const fn price(&self) -> U256 {
        match self {
            Self::DirectSell(order) => order.price,
            Self::Offer(order) => order.price,
        }
    }

    /// The traded asset.
    pub const fn asset(&self) -> AssetId {
        match self {
            Self::DirectSell(order) => order.asset,
            Self::Offer(order) => order.asset,
        }
    }

    /// The deadline the originator signed.
    pub const fn deadline(&self) -> u64 {
        match self {
            Self::DirectSell(order) => order.deadline,
            Self::Offer(order) => order.offer_deadline,
        }
    }

    /// The struct hash of the originator's signed terms.
    pub fn struct_hash(&self) -> B256 {
        match self {
            Self::DirectSell(order) => order.struct_hash(),
            Self::Offer(order) => order.maker_struct_hash(),
        }
    }

    /// The digest the originator signs.
    pub fn signing_hash(&self, domain: &MarketDomain) -> B256 {
        domain.signing_hash(self.struct_hash())
    }

    /// The key under which settlement of this order is recorded.
    pub fn order_key(&self) -> B256 {
        match self {
            Self::DirectSell(order) => order.order_key(),
            Self::Offer(order) => order.order_key(),
        }
    }
}

impl From<SellOrder> for Order {
    fn from(order: SellOrder) -> Self {
        Self::DirectSell(order)
    }
}

impl From<OfferOrder> for Order {
    fn from(order: OfferOrder) -> Self {
        Self::Offer(order)
    }
}
