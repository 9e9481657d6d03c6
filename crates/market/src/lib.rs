//! Gallery marketplace settlement.
//!
//! Validates signed [`SellOrder`]s and [`OfferOrder`]s and settles them
//! atomically against an injected [`Ledger`]: the quote token moves from
//! buyer to seller, the asset moves from seller to buyer, and the order is
//! recorded as consumed so it can never settle again.
//!
//! [`SellOrder`]: gallery_types::SellOrder
//! [`OfferOrder`]: gallery_types::OfferOrder

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    clippy::missing_const_for_fn,
    rustdoc::all
)]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(unused_must_use, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::{Expiry, RegistryError, SettlementError, TransferError};

mod ledger;
pub use ledger::{AssetLedger, Journaled, Ledger, QuoteTokenLedger};

mod market;
pub use market::{Market, SharedMarket};

mod records;
pub use records::{ConsumptionRecords, SettlementReceipt};

mod registry;
pub use registry::QuoteTokenRegistry;

mod validator;
pub use validator::{OrderValidator, Settlement};
