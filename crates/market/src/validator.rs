use crate::{ConsumptionRecords, Expiry, Ledger, QuoteTokenRegistry, SettlementError};
use alloy::primitives::{Address, B256, U256};
use gallery_types::{
    AssetId, MarketDomain, OfferOrder, OrderKind, OrderSignature, SellOrder, SignaturePair,
};
use tracing::trace;

/// A validated settlement: the transfers the market will perform and the
/// key it will consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// The order key to consume.
    pub order_key: B256,
    /// The kind of the order.
    pub kind: OrderKind,
    /// Receives payment, gives up the asset.
    pub seller: Address,
    /// Pays, receives the asset.
    pub buyer: Address,
    /// The payment token.
    pub quote_token: Address,
    /// The amount paid.
    pub price: U256,
    /// The traded asset.
    pub asset: AssetId,
}

/// Checks orders against the market's business rules.
///
/// The validator only reads. It borrows the market domain, the quote-token
/// registry, the consumption records and the ledger, and either returns the
/// [`Settlement`] to perform or the first rule the order breaks.
#[derive(Debug, Clone, Copy)]
pub struct OrderValidator<'a, L> {
    domain: &'a MarketDomain,
    registry: &'a QuoteTokenRegistry,
    records: &'a ConsumptionRecords,
    ledger: &'a L,
}

impl<'a, L: Ledger> OrderValidator<'a, L> {
    /// Create a new validator.
    pub const fn new(
        domain: &'a MarketDomain,
        registry: &'a QuoteTokenRegistry,
        records: &'a ConsumptionRecords,
        ledger: &'a L,
    ) -> Self {
        Self { domain, registry, records, ledger }
    }

    /// The market address, which spends allowances and moves assets.
    const fn market(&self) -> Address {
        self.domain.verifying_contract()
    }

    /// Validate a listing settlement.
    ///
    /// The buyer's authorization is implicit only when the buyer is the
    /// caller. A relayed settlement must carry a buyer signature over the
    /// listing digest.
    pub fn validate_sell(
        &self,
        caller: Address,
        buyer: Address,
        order: &SellOrder,
        signatures: &SignaturePair,
    ) -> Result<Settlement, SettlementError> {
        self.check_deadline(order.deadline)?;
        self.check_token(order.quote_token)?;

        let digest = order.signing_hash(self.domain);
        self.check_seller(order.seller, &digest, &signatures.seller)?;
        if caller != buyer {
            self.check_buyer(buyer, &digest, signatures.buyer.as_ref())?;
        }

        let order_key = order.order_key();
        self.check_unsettled(order_key)?;
        self.check_asset(&order.asset, order.seller)?;
        self.check_funds(order.quote_token, buyer, order.price)?;

        trace!(%order_key, %buyer, "listing validated");
        Ok(Settlement {
            order_key,
            kind: OrderKind::DirectSell,
            seller: order.seller,
            buyer,
            quote_token: order.quote_token,
            price: order.price,
            asset: order.asset,
        })
    }

    /// Validate an offer acceptance by `seller`.
    ///
    /// Both signatures are always checked: the offer provider's over the
    /// offer-deadline terms, and the seller's over the sale-deadline terms.
    pub fn validate_offer(
        &self,
        seller: Address,
        order: &OfferOrder,
        signatures: &SignaturePair,
    ) -> Result<Settlement, SettlementError> {
        if order.offer_deadline > order.sale_deadline {
            return Err(Expiry::OfferOutlivesSale {
                offer_deadline: order.offer_deadline,
                sale_deadline: order.sale_deadline,
            }
            .into());
        }
        self.check_deadline(order.offer_deadline)?;
        self.check_deadline(order.sale_deadline)?;
        self.check_token(order.quote_token)?;

        let maker_digest = order.maker_signing_hash(self.domain);
        self.check_buyer(order.offer_maker, &maker_digest, signatures.buyer.as_ref())?;

        let acceptance_digest = order.acceptance_signing_hash(self.domain);
        self.check_seller(seller, &acceptance_digest, &signatures.seller)?;

        let order_key = order.order_key();
        self.check_unsettled(order_key)?;
        self.check_asset(&order.asset, seller)?;
        self.check_funds(order.quote_token, order.offer_maker, order.price)?;

        trace!(%order_key, %seller, "offer validated");
        Ok(Settlement {
            order_key,
            kind: OrderKind::Offer,
            seller,
            buyer: order.offer_maker,
            quote_token: order.quote_token,
            price: order.price,
            asset: order.asset,
        })
    }

    fn check_deadline(&self, deadline: u64) -> Result<(), SettlementError> {
        let current = self.ledger.timestamp();
        if current > deadline {
            return Err(Expiry::DeadlinePassed { current, deadline }.into());
        }
        Ok(())
    }

    fn check_token(&self, token: Address) -> Result<(), SettlementError> {
        if !self.registry.is_allowed(token) {
            return Err(SettlementError::UnsupportedToken(token));
        }
        Ok(())
    }

    fn check_seller(
        &self,
        expected: Address,
        digest: &B256,
        signature: &OrderSignature,
    ) -> Result<(), SettlementError> {
        let recovered = signature.recover(digest)?;
        if recovered != expected {
            return Err(SettlementError::BadSellerSignature { expected, recovered });
        }
        Ok(())
    }

    fn check_buyer(
        &self,
        expected: Address,
        digest: &B256,
        signature: Option<&OrderSignature>,
    ) -> Result<(), SettlementError> {
        let Some(signature) = signature else {
            return Err(SettlementError::BadBuyerSignature { expected, recovered: None });
        };
        let recovered = signature.recover(digest)?;
        if recovered != expected {
            return Err(SettlementError::BadBuyerSignature { expected, recovered: Some(recovered) });
        }
        Ok(())
    }

    fn check_unsettled(&self, order_key: B256) -> Result<(), SettlementError> {
        if self.records.is_consumed(&order_key) {
            return Err(SettlementError::AlreadySettled(order_key));
        }
        Ok(())
    }

    fn check_asset(&self, asset: &AssetId, seller: Address) -> Result<(), SettlementError> {
        let owned = self.ledger.owner_of(asset) == Some(seller);
        if !owned || !self.ledger.is_approved(asset, self.market()) {
            return Err(SettlementError::NotOwnerOrNotApproved { asset: *asset, seller });
        }
        Ok(())
    }

    fn check_funds(
        &self,
        token: Address,
        payer: Address,
        price: U256,
    ) -> Result<(), SettlementError> {
        let balance = self.ledger.balance_of(token, payer);
        let allowance = self.ledger.allowance(token, payer, self.market());
        if balance < price || allowance < price {
            return Err(SettlementError::InsufficientFundsOrAllowance { payer, price });
        }
        Ok(())
    }
}
