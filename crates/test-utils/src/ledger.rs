//! An in-memory [`Ledger`] with framed reverts.

use alloy::primitives::{Address, U256};
use gallery_market::{AssetLedger, Journaled, Ledger, QuoteTokenLedger, TransferError};
use gallery_types::AssetId;
use std::collections::{HashMap, HashSet};
use tracing::trace;

type BalanceKey = (Address, Address);
type AllowanceKey = (Address, Address, Address);
type OperatorKey = (Address, Address, Address);

/// A single undoable write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Undo {
    Balance(BalanceKey, U256),
    Allowance(AllowanceKey, U256),
    Owner(AssetId, Option<Address>),
    Approval(AssetId, Option<Address>),
    Operator(OperatorKey, bool),
}

/// Token balances and allowances, asset ownership and approvals, and a clock.
///
/// Every write is journaled. Writes made inside a frame are undone in reverse
/// order when the frame is reverted, so a failed settlement leaves the ledger
/// exactly as it found it.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    timestamp: u64,

    balances: HashMap<BalanceKey, U256>,
    allowances: HashMap<AllowanceKey, U256>,

    owners: HashMap<AssetId, Address>,
    approvals: HashMap<AssetId, Address>,
    operators: HashSet<OperatorKey>,

    paused: HashSet<Address>,

    journal: Vec<Undo>,
    frame_boundaries: Vec<usize>,
}

impl MemoryLedger {
    /// Create an empty ledger at the given timestamp.
    pub fn at(timestamp: u64) -> Self {
        Self { timestamp, ..Default::default() }
    }

    /// Create an empty ledger at the current wall-clock time.
    pub fn now() -> Self {
        Self::at(chrono::Utc::now().timestamp().try_into().unwrap_or_default())
    }

    /// Set the clock.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Move the clock forward.
    pub fn advance(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    /// Credit `amount` of `token` to `owner`.
    pub fn mint_tokens(&mut self, token: Address, owner: Address, amount: U256) {
        let balance = self.balance_of(token, owner);
        self.write_balance((token, owner), balance.saturating_add(amount));
    }

    /// Set the amount `spender` may move on behalf of `owner`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.write_allowance((token, owner, spender), amount);
    }

    /// Create an asset owned by `owner`. Re-minting an existing asset moves
    /// it to `owner`.
    pub fn mint_asset(&mut self, asset: AssetId, owner: Address) {
        self.write_owner(asset, Some(owner));
        self.write_approval(asset, None);
    }

    /// Approve `operator` to move a single asset. The caller must own it.
    pub fn approve_asset(
        &mut self,
        asset: &AssetId,
        owner: Address,
        operator: Address,
    ) -> Result<(), TransferError> {
        self.ensure_owner(asset, owner)?;
        self.write_approval(*asset, Some(operator));
        Ok(())
    }

    /// Approve or revoke `operator` for every asset `owner` holds in
    /// `collection`.
    pub fn set_approval_for_all(
        &mut self,
        collection: Address,
        owner: Address,
        operator: Address,
        approved: bool,
    ) {
        self.write_operator((collection, owner, operator), approved);
    }

    /// Pause a token or collection contract. Queries keep answering, but
    /// every transfer through it is refused.
    pub fn pause(&mut self, contract: Address) {
        self.paused.insert(contract);
    }

    /// Unpause a token or collection contract.
    pub fn unpause(&mut self, contract: Address) {
        self.paused.remove(&contract);
    }

    /// Move tokens directly, as their owner.
    pub fn transfer_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        self.ensure_unpaused(token)?;
        self.move_tokens(token, from, to, amount)
    }

    /// True if all frames have been exited.
    pub fn is_complete(&self) -> bool {
        self.frame_boundaries.is_empty()
    }

    fn ensure_unpaused(&self, contract: Address) -> Result<(), TransferError> {
        if self.paused.contains(&contract) {
            return Err(TransferError::Refused(contract));
        }
        Ok(())
    }

    fn ensure_owner(&self, asset: &AssetId, from: Address) -> Result<(), TransferError> {
        match self.owner_of(asset) {
            None => Err(TransferError::UnknownAsset(*asset)),
            Some(owner) if owner != from => Err(TransferError::NotOwner { asset: *asset, from }),
            Some(_) => Ok(()),
        }
    }

    fn move_tokens(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        let balance = self.balance_of(token, from);
        if balance < amount {
            return Err(TransferError::InsufficientBalance { balance, amount });
        }
        self.write_balance((token, from), balance - amount);
        let credited = self.balance_of(token, to).saturating_add(amount);
        self.write_balance((token, to), credited);
        Ok(())
    }

    fn write_balance(&mut self, key: BalanceKey, value: U256) {
        let prev = self.balances.insert(key, value).unwrap_or_default();
        self.journal.push(Undo::Balance(key, prev));
    }

    fn write_allowance(&mut self, key: AllowanceKey, value: U256) {
        let prev = self.allowances.insert(key, value).unwrap_or_default();
        self.journal.push(Undo::Allowance(key, prev));
    }

    fn write_owner(&mut self, asset: AssetId, owner: Option<Address>) {
        let prev = match owner {
            Some(owner) => self.owners.insert(asset, owner),
            None => self.owners.remove(&asset),
        };
        self.journal.push(Undo::Owner(asset, prev));
    }

    fn write_approval(&mut self, asset: AssetId, operator: Option<Address>) {
        let prev = match operator {
            Some(operator) => self.approvals.insert(asset, operator),
            None => self.approvals.remove(&asset),
        };
        self.journal.push(Undo::Approval(asset, prev));
    }

    fn write_operator(&mut self, key: OperatorKey, approved: bool) {
        let prev = if approved { !self.operators.insert(key) } else { self.operators.remove(&key) };
        self.journal.push(Undo::Operator(key, prev));
    }

    fn undo(&mut self, entry: Undo) {
        match entry {
            Undo::Balance(key, prev) => {
                self.balances.insert(key, prev);
            }
            Undo::Allowance(key, prev) => {
                self.allowances.insert(key, prev);
            }
            Undo::Owner(asset, Some(owner)) => {
                self.owners.insert(asset, owner);
            }
            Undo::Owner(asset, None) => {
                self.owners.remove(&asset);
            }
            Undo::Approval(asset, Some(operator)) => {
                self.approvals.insert(asset, operator);
            }
            Undo::Approval(asset, None) => {
                self.approvals.remove(&asset);
            }
            Undo::Operator(key, true) => {
                self.operators.insert(key);
            }
            Undo::Operator(key, false) => {
                self.operators.remove(&key);
            }
        }
    }
}

impl QuoteTokenLedger for MemoryLedger {
    fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.balances.get(&(token, owner)).copied().unwrap_or_default()
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(token, owner, spender)).copied().unwrap_or_default()
    }

    fn token_transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TransferError> {
        self.ensure_unpaused(token)?;

        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(TransferError::InsufficientAllowance { allowance, amount });
        }
        self.move_tokens(token, from, to, amount)?;

        // unlimited approvals are never spent down
        if allowance != U256::MAX {
            self.write_allowance((token, from, spender), allowance - amount);
        }
        Ok(())
    }
}

impl AssetLedger for MemoryLedger {
    fn owner_of(&self, asset: &AssetId) -> Option<Address> {
        self.owners.get(asset).copied()
    }

    fn is_approved(&self, asset: &AssetId, operator: Address) -> bool {
        let Some(owner) = self.owner_of(asset) else { return false };
        owner == operator
            || self.approvals.get(asset) == Some(&operator)
            || self.operators.contains(&(asset.contract, owner, operator))
    }

    fn asset_transfer_from(
        &mut self,
        asset: &AssetId,
        operator: Address,
        from: Address,
        to: Address,
    ) -> Result<(), TransferError> {
        self.ensure_unpaused(asset.contract)?;
        self.ensure_owner(asset, from)?;
        if !self.is_approved(asset, operator) {
            return Err(TransferError::NotApproved { asset: *asset, operator });
        }

        self.write_approval(*asset, None);
        self.write_owner(*asset, Some(to));
        Ok(())
    }
}

impl Journaled for MemoryLedger {
    fn enter_frame(&mut self) {
        self.frame_boundaries.push(self.journal.len());
    }

    /// Revert the current frame. Does nothing if no frame is open.
    fn revert_frame(&mut self) {
        let Some(boundary) = self.frame_boundaries.pop() else { return };
        let undone = self.journal.len() - boundary;
        while self.journal.len() > boundary {
            if let Some(entry) = self.journal.pop() {
                self.undo(entry);
            }
        }
        trace!(undone, depth = self.frame_boundaries.len(), "frame reverted");
    }

    fn exit_frame(&mut self) {
        self.frame_boundaries.pop();
    }
}

impl Ledger for MemoryLedger {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use gallery_constants::test_utils::{TEST_MARKET_ADDRESS, TEST_NFT, TEST_QUOTE_TOKEN};

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    fn asset(id: u64) -> AssetId {
        AssetId::new(TEST_NFT, U256::from(id))
    }

    #[test]
    fn token_transfer_spends_allowance() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_tokens(TEST_QUOTE_TOKEN, ALICE, U256::from(10));
        ledger.approve(TEST_QUOTE_TOKEN, ALICE, TEST_MARKET_ADDRESS, U256::from(4));

        ledger
            .token_transfer_from(TEST_QUOTE_TOKEN, TEST_MARKET_ADDRESS, ALICE, BOB, U256::from(3))
            .unwrap();
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, ALICE), U256::from(7));
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, BOB), U256::from(3));
        assert_eq!(ledger.allowance(TEST_QUOTE_TOKEN, ALICE, TEST_MARKET_ADDRESS), U256::from(1));

        assert_eq!(
            ledger.token_transfer_from(
                TEST_QUOTE_TOKEN,
                TEST_MARKET_ADDRESS,
                ALICE,
                BOB,
                U256::from(3)
            ),
            Err(TransferError::InsufficientAllowance {
                allowance: U256::from(1),
                amount: U256::from(3)
            })
        );
    }

    #[test]
    fn unlimited_allowance_is_not_spent() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_tokens(TEST_QUOTE_TOKEN, ALICE, U256::from(10));
        ledger.approve(TEST_QUOTE_TOKEN, ALICE, TEST_MARKET_ADDRESS, U256::MAX);

        ledger
            .token_transfer_from(TEST_QUOTE_TOKEN, TEST_MARKET_ADDRESS, ALICE, BOB, U256::from(10))
            .unwrap();
        assert_eq!(ledger.allowance(TEST_QUOTE_TOKEN, ALICE, TEST_MARKET_ADDRESS), U256::MAX);
    }

    #[test]
    fn asset_transfer_requires_approval() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_asset(asset(1), ALICE);

        assert_eq!(
            ledger.asset_transfer_from(&asset(1), TEST_MARKET_ADDRESS, ALICE, BOB),
            Err(TransferError::NotApproved { asset: asset(1), operator: TEST_MARKET_ADDRESS })
        );
        assert_eq!(
            ledger.asset_transfer_from(&asset(2), TEST_MARKET_ADDRESS, ALICE, BOB),
            Err(TransferError::UnknownAsset(asset(2)))
        );

        ledger.approve_asset(&asset(1), ALICE, TEST_MARKET_ADDRESS).unwrap();
        ledger.asset_transfer_from(&asset(1), TEST_MARKET_ADDRESS, ALICE, BOB).unwrap();
        assert_eq!(ledger.owner_of(&asset(1)), Some(BOB));

        // single-asset approvals are cleared by the transfer
        assert!(!ledger.is_approved(&asset(1), TEST_MARKET_ADDRESS));
    }

    #[test]
    fn operator_approval_covers_collection() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_asset(asset(1), ALICE);
        ledger.mint_asset(asset(2), ALICE);
        ledger.mint_asset(AssetId::new(Address::repeat_byte(0x99), U256::from(1)), ALICE);

        ledger.set_approval_for_all(TEST_NFT, ALICE, TEST_MARKET_ADDRESS, true);
        assert!(ledger.is_approved(&asset(1), TEST_MARKET_ADDRESS));
        assert!(ledger.is_approved(&asset(2), TEST_MARKET_ADDRESS));
        assert!(!ledger.is_approved(
            &AssetId::new(Address::repeat_byte(0x99), U256::from(1)),
            TEST_MARKET_ADDRESS
        ));

        ledger.set_approval_for_all(TEST_NFT, ALICE, TEST_MARKET_ADDRESS, false);
        assert!(!ledger.is_approved(&asset(1), TEST_MARKET_ADDRESS));
    }

    #[test]
    fn paused_contracts_refuse_transfers() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_tokens(TEST_QUOTE_TOKEN, ALICE, U256::from(10));
        ledger.pause(TEST_QUOTE_TOKEN);

        assert_eq!(
            ledger.transfer_tokens(TEST_QUOTE_TOKEN, ALICE, BOB, U256::from(1)),
            Err(TransferError::Refused(TEST_QUOTE_TOKEN))
        );
        ledger.unpause(TEST_QUOTE_TOKEN);
        ledger.transfer_tokens(TEST_QUOTE_TOKEN, ALICE, BOB, U256::from(1)).unwrap();
    }

    #[test]
    fn frames() {
        let mut ledger = MemoryLedger::at(0);
        ledger.mint_tokens(TEST_QUOTE_TOKEN, ALICE, U256::from(10));
        ledger.mint_asset(asset(1), ALICE);

        // simple revert
        ledger.enter_frame();
        ledger.transfer_tokens(TEST_QUOTE_TOKEN, ALICE, BOB, U256::from(4)).unwrap();
        ledger.mint_asset(asset(1), BOB);
        ledger.revert_frame();
        assert!(ledger.is_complete());
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, ALICE), U256::from(10));
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, BOB), U256::ZERO);
        assert_eq!(ledger.owner_of(&asset(1)), Some(ALICE));

        // nested, inner reverted
        ledger.enter_frame();
        ledger.transfer_tokens(TEST_QUOTE_TOKEN, ALICE, BOB, U256::from(1)).unwrap();
        ledger.enter_frame();
        ledger.transfer_tokens(TEST_QUOTE_TOKEN, ALICE, BOB, U256::from(2)).unwrap();
        ledger.set_approval_for_all(TEST_NFT, ALICE, BOB, true);
        ledger.revert_frame();
        ledger.exit_frame();
        assert!(ledger.is_complete());
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, ALICE), U256::from(9));
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, BOB), U256::from(1));
        assert!(!ledger.is_approved(&asset(1), BOB));

        // nested, outer reverted after inner exit
        ledger.enter_frame();
        ledger.enter_frame();
        ledger.transfer_tokens(TEST_QUOTE_TOKEN, BOB, ALICE, U256::from(1)).unwrap();
        ledger.exit_frame();
        ledger.revert_frame();
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, BOB), U256::from(1));

        // reverting with no frame open is a no-op
        ledger.revert_frame();
        assert_eq!(ledger.balance_of(TEST_QUOTE_TOKEN, ALICE), U256::from(9));
    }
}
