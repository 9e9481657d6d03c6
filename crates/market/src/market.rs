use crate::{
    ConsumptionRecords, Ledger, OrderValidator, QuoteTokenRegistry, RegistryError, Settlement,
    SettlementError, SettlementReceipt,
};
use alloy::primitives::{Address, B256};
use gallery_constants::MarketConstants;
use gallery_types::{
    MarketDomain, OfferOrder, OrderSignature, SellOrder, SignatureError, SignaturePair,
};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The settlement engine.
///
/// Owns the consumption records and drives every transfer. The quote-token
/// registry and the ledger are injected. Settlement methods take `&mut self`,
/// so attempts against one market are strictly sequential; use
/// [`SharedMarket`] to submit from several threads.
#[derive(Debug)]
pub struct Market<L> {
    domain: MarketDomain,
    registry: QuoteTokenRegistry,
    records: ConsumptionRecords,
    ledger: L,
}

impl<L> Market<L> {
    /// Create a market for the deployment described by `constants`.
    pub fn new(constants: &MarketConstants, registry: QuoteTokenRegistry, ledger: L) -> Self {
        Self::with_domain(MarketDomain::from_constants(constants), registry, ledger)
    }

    /// Create a market with an explicit domain.
    pub fn with_domain(domain: MarketDomain, registry: QuoteTokenRegistry, ledger: L) -> Self {
        Self { domain, registry, records: ConsumptionRecords::new(), ledger }
    }

    /// Get the EIP-712 domain orders are signed under.
    pub const fn domain(&self) -> &MarketDomain {
        &self.domain
    }

    /// Get the market address.
    pub const fn address(&self) -> Address {
        self.domain.verifying_contract()
    }

    /// Get the quote-token registry.
    pub const fn registry(&self) -> &QuoteTokenRegistry {
        &self.registry
    }

    /// Get the consumption records.
    pub const fn records(&self) -> &ConsumptionRecords {
        &self.records
    }

    /// Get the ledger.
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get the ledger mutably, e.g. to advance time or fund accounts.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Add a quote token. Only the registry operator may call this.
    pub fn add_quote_token(&self, caller: Address, token: Address) -> Result<bool, RegistryError> {
        self.registry.add_quote_token(caller, token)
    }

    /// True if orders may be priced in `token`.
    pub fn is_quote_token(&self, token: Address) -> bool {
        self.registry.is_allowed(token)
    }

    /// True if the order with this key has settled.
    pub fn is_settled(&self, order_key: &B256) -> bool {
        self.records.is_consumed(order_key)
    }

    /// Recover the signer of a listing under this market's domain.
    pub fn sell_signer(
        &self,
        order: &SellOrder,
        signature: &OrderSignature,
    ) -> Result<Address, SignatureError> {
        signature.recover(&order.signing_hash(&self.domain))
    }

    /// Recover the signer of an offer under this market's domain.
    pub fn offer_signer(
        &self,
        order: &OfferOrder,
        signature: &OrderSignature,
    ) -> Result<Address, SignatureError> {
        signature.recover(&order.maker_signing_hash(&self.domain))
    }

    /// Recover the signer of an offer acceptance under this market's domain.
    pub fn acceptance_signer(
        &self,
        order: &OfferOrder,
        signature: &OrderSignature,
    ) -> Result<Address, SignatureError> {
        signature.recover(&order.acceptance_signing_hash(&self.domain))
    }
}

impl<L: Ledger> Market<L> {
    /// Get a validator reading this market's state.
    pub const fn validator(&self) -> OrderValidator<'_, L> {
        OrderValidator::new(&self.domain, &self.registry, &self.records, &self.ledger)
    }

    /// Settle a listing, with the caller as the buyer.
    pub fn execute_sell(
        &mut self,
        caller: Address,
        order: &SellOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.execute_sell_for(caller, caller, order, signatures)
    }

    /// Settle a listing on behalf of `buyer`.
    ///
    /// When `caller` is not `buyer`, the buyer signature is required and
    /// must recover to `buyer`.
    #[instrument(skip_all, fields(%caller, %buyer, seller = %order.seller, asset = %order.asset))]
    pub fn execute_sell_for(
        &mut self,
        caller: Address,
        buyer: Address,
        order: &SellOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        let settlement = self
            .validator()
            .validate_sell(caller, buyer, order, signatures)
            .inspect_err(|error| warn!(%error, "listing rejected"))?;
        self.settle(settlement)
    }

    /// Accept an offer, with the caller as the seller.
    pub fn execute_offer(
        &mut self,
        caller: Address,
        order: &OfferOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.execute_offer_for(caller, caller, order, signatures)
    }

    /// Accept an offer on behalf of `seller`.
    ///
    /// Both signatures are always checked, so the caller needs no special
    /// standing.
    #[instrument(
        skip_all,
        fields(%caller, %seller, offer_maker = %order.offer_maker, asset = %order.asset)
    )]
    pub fn execute_offer_for(
        &mut self,
        caller: Address,
        seller: Address,
        order: &OfferOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        let settlement = self
            .validator()
            .validate_offer(seller, order, signatures)
            .inspect_err(|error| warn!(%error, "offer rejected"))?;
        self.settle(settlement)
    }

    /// Perform the transfers of a validated settlement and consume the order.
    ///
    /// Both transfers run inside one ledger frame. If either fails the frame
    /// is reverted and the order stays unconsumed.
    fn settle(&mut self, settlement: Settlement) -> Result<SettlementReceipt, SettlementError> {
        self.ledger.enter_frame();
        if let Err(error) = self.transfer(&settlement) {
            self.ledger.revert_frame();
            warn!(%error, order_key = %settlement.order_key, "settlement reverted");
            return Err(error);
        }
        self.ledger.exit_frame();

        let receipt = SettlementReceipt::new(&settlement, self.ledger.timestamp());
        self.records.record(receipt);

        debug!(
            order_key = %receipt.order_key,
            kind = %receipt.kind,
            price = %receipt.price,
            "order settled"
        );
        Ok(receipt)
    }

    fn transfer(&mut self, settlement: &Settlement) -> Result<(), SettlementError> {
        let market = self.address();

        self.ledger
            .token_transfer_from(
                settlement.quote_token,
                market,
                settlement.buyer,
                settlement.seller,
                settlement.price,
            )
            .map_err(|_| SettlementError::InsufficientFundsOrAllowance {
                payer: settlement.buyer,
                price: settlement.price,
            })?;

        self.ledger
            .asset_transfer_from(&settlement.asset, market, settlement.seller, settlement.buyer)
            .map_err(|_| SettlementError::NotOwnerOrNotApproved {
                asset: settlement.asset,
                seller: settlement.seller,
            })
    }
}

/// A [`Market`] shared between threads.
///
/// The mutex is the total order over settlement attempts: whichever attempt
/// takes it second observes everything the first one recorded.
#[derive(Debug)]
pub struct SharedMarket<L> {
    inner: Arc<Mutex<Market<L>>>,
}

impl<L> Clone for SharedMarket<L> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<L> From<Market<L>> for SharedMarket<L> {
    fn from(market: Market<L>) -> Self {
        Self::new(market)
    }
}

impl<L> SharedMarket<L> {
    /// Share a market.
    pub fn new(market: Market<L>) -> Self {
        Self { inner: Arc::new(Mutex::new(market)) }
    }

    /// Lock the market for exclusive access.
    pub fn lock(&self) -> MutexGuard<'_, Market<L>> {
        self.inner.lock()
    }
}

impl<L: Ledger> SharedMarket<L> {
    /// Settle a listing, with the caller as the buyer.
    pub fn execute_sell(
        &self,
        caller: Address,
        order: &SellOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.lock().execute_sell(caller, order, signatures)
    }

    /// Settle a listing on behalf of `buyer`.
    pub fn execute_sell_for(
        &self,
        caller: Address,
        buyer: Address,
        order: &SellOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.lock().execute_sell_for(caller, buyer, order, signatures)
    }

    /// Accept an offer, with the caller as the seller.
    pub fn execute_offer(
        &self,
        caller: Address,
        order: &OfferOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.lock().execute_offer(caller, order, signatures)
    }

    /// Accept an offer on behalf of `seller`.
    pub fn execute_offer_for(
        &self,
        caller: Address,
        seller: Address,
        order: &OfferOrder,
        signatures: &SignaturePair,
    ) -> Result<SettlementReceipt, SettlementError> {
        self.lock().execute_offer_for(caller, seller, order, signatures)
    }
}
