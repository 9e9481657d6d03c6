use alloy::primitives::{Address, B256, U256};
use gallery_types::{AssetId, SignatureError};

/// Why an order is no longer settleable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Expiry {
    /// The deadline for the order has passed.
    #[error("deadline has passed: current time is {current}, deadline was {deadline}")]
    DeadlinePassed {
        /// The ledger timestamp.
        current: u64,
        /// The elapsed deadline.
        deadline: u64,
    },
    /// The offer claims to outlive the sale it can be accepted into.
    #[error("offer deadline {offer_deadline} is after sale deadline {sale_deadline}")]
    OfferOutlivesSale {
        /// The offer provider's deadline.
        offer_deadline: u64,
        /// The accepting seller's deadline.
        sale_deadline: u64,
    },
}

/// A rejected settlement attempt.
///
/// Every variant is terminal for the attempt and leaves no custody changes
/// behind. The order is not consumed, so it can be resubmitted once the cause
/// is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// The order, or the offer it accepts, has expired.
    #[error("order expired: {0}")]
    Expired(#[from] Expiry),
    /// The quote token is not on the allow-list.
    #[error("quote token {0} is not supported")]
    UnsupportedToken(Address),
    /// The seller signature does not recover to the seller.
    #[error("seller signature recovered to {recovered}, expected {expected}")]
    BadSellerSignature {
        /// The claimed seller.
        expected: Address,
        /// The recovered signer.
        recovered: Address,
    },
    /// The buyer signature is missing or does not recover to the buyer.
    #[error("buyer signature recovered to {recovered:?}, expected {expected}")]
    BadBuyerSignature {
        /// The claimed buyer.
        expected: Address,
        /// The recovered signer, `None` if no signature was supplied.
        recovered: Option<Address>,
    },
    /// The order has already been settled.
    #[error("order {0} has already been settled")]
    AlreadySettled(B256),
    /// The seller does not own the asset, or has not approved the market.
    #[error("{seller} does not own {asset} or has not approved the market")]
    NotOwnerOrNotApproved {
        /// The asset being traded.
        asset: AssetId,
        /// The claimed seller.
        seller: Address,
    },
    /// The payer's balance or allowance does not cover the price.
    #[error("{payer} has insufficient balance or allowance to pay {price}")]
    InsufficientFundsOrAllowance {
        /// The paying party.
        payer: Address,
        /// The order price.
        price: U256,
    },
    /// A signature is malformed.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),
}

/// A quote-token registry mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Only the operator may add quote tokens.
    #[error("{caller} is not the registry operator {operator}")]
    NotOperator {
        /// The caller.
        caller: Address,
        /// The operator.
        operator: Address,
    },
}

/// A ledger transfer was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    /// The sender's token balance is too low.
    #[error("insufficient balance: have {balance}, need {amount}")]
    InsufficientBalance {
        /// The current balance.
        balance: U256,
        /// The requested amount.
        amount: U256,
    },
    /// The spender's allowance is too low.
    #[error("insufficient allowance: have {allowance}, need {amount}")]
    InsufficientAllowance {
        /// The current allowance.
        allowance: U256,
        /// The requested amount.
        amount: U256,
    },
    /// The asset does not exist.
    #[error("unknown asset {0}")]
    UnknownAsset(AssetId),
    /// The sender does not own the asset.
    #[error("{from} does not own {asset}")]
    NotOwner {
        /// The asset.
        asset: AssetId,
        /// The claimed owner.
        from: Address,
    },
    /// The operator may not move the asset.
    #[error("{operator} is not approved to move {asset}")]
    NotApproved {
        /// The asset.
        asset: AssetId,
        /// The operator attempting the transfer.
        operator: Address,
    },
    /// The token or collection contract refused the transfer outright, e.g.
    /// because it is paused.
    #[error("contract {0} refused the transfer")]
    Refused(Address),
}

impl SettlementError {
    /// True for rejections caused by elapsed or inconsistent deadlines.
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired(_))
    }
}
