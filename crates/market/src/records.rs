use crate::Settlement;
use alloy::primitives::{Address, B256, U256};
use gallery_types::{AssetId, OrderKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The record written when an order settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReceipt {
    /// The consumed order key.
    pub order_key: B256,
    /// The kind of the settled order.
    pub kind: OrderKind,
    /// The party that received payment and gave up the asset.
    pub seller: Address,
    /// The party that paid and received the asset.
    pub buyer: Address,
    /// The payment token.
    pub quote_token: Address,
    /// The amount paid.
    pub price: U256,
    /// The traded asset.
    pub asset: AssetId,
    /// Ledger timestamp of the settlement.
    pub settled_at: u64,
}

impl SettlementReceipt {
    pub(crate) const fn new(settlement: &Settlement, settled_at: u64) -> Self {
        Self {
            order_key: settlement.order_key,
            kind: settlement.kind,
            seller: settlement.seller,
            buyer: settlement.buyer,
            quote_token: settlement.quote_token,
            price: settlement.price,
            asset: settlement.asset,
            settled_at,
        }
    }
}

/// Consumption records, keyed by order key.
///
/// Records are only ever added. An order key present here can never settle
/// again.
#[derive(Debug, Clone, Default)]
pub struct ConsumptionRecords {
    records: HashMap<B256, SettlementReceipt>,
}

impl ConsumptionRecords {
    /// Create an empty record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the order has settled.
    pub fn is_consumed(&self, order_key: &B256) -> bool {
        self.records.contains_key(order_key)
    }

    /// Get the receipt of a settled order.
    pub fn get(&self, order_key: &B256) -> Option<&SettlementReceipt> {
        self.records.get(order_key)
    }

    /// The number of settled orders.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no order has settled.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all receipts, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SettlementReceipt> {
        self.records.values()
    }

    /// Record a settlement. The key must not be consumed yet.
    pub(crate) fn record(&mut self, receipt: SettlementReceipt) {
        let previous = self.records.insert(receipt.order_key, receipt);
        debug_assert!(previous.is_none(), "order settled twice");
    }
}
