use crate::TransferError;
use alloy::primitives::{Address, U256};
use gallery_types::AssetId;

/// Fungible quote tokens with `approve`-then-`transferFrom` semantics.
pub trait QuoteTokenLedger {
    /// The token balance of `owner`.
    fn balance_of(&self, token: Address, owner: Address) -> U256;

    /// The amount `spender` may move on behalf of `owner`.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256;

    /// Move `amount` of `token` from `from` to `to`, spending the allowance
    /// `from` granted to `spender`.
    fn token_transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError>;
}

/// Non-fungible assets with owner queries and approval-gated transfers.
pub trait AssetLedger {
    /// The current owner of the asset, if it exists.
    fn owner_of(&self, asset: &AssetId) -> Option<Address>;

    /// True if `operator` may move the asset on behalf of its owner, either
    /// through a per-asset approval or an approval for all of the owner's
    /// assets in the collection.
    fn is_approved(&self, asset: &AssetId, operator: Address) -> bool;

    /// Move the asset from `from` to `to`, acting as `operator`.
    fn asset_transfer_from(
        &mut self,
        asset: &AssetId,
        operator: Address,
        from: Address,
        to: Address,
    ) -> Result<(), TransferError>;
}

/// Ledgers whose changes can be grouped into frames and discarded.
///
/// Frames nest. Changes made after [`Journaled::enter_frame`] are discarded
/// by [`Journaled::revert_frame`] and kept by [`Journaled::exit_frame`].
pub trait Journaled {
    /// Enter a frame.
    fn enter_frame(&mut self);

    /// Discard every change made since the matching `enter_frame`.
    fn revert_frame(&mut self);

    /// Keep every change made since the matching `enter_frame`.
    fn exit_frame(&mut self);
}

/// The sequential ledger a market settles against.
pub trait Ledger: QuoteTokenLedger + AssetLedger + Journaled {
    /// The ledger's current timestamp. Deadlines are checked against this,
    /// never against wall-clock time.
    fn timestamp(&self) -> u64;
}
