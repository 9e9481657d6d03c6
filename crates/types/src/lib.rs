//! Order, domain and signature types for the NFT gallery marketplace.
//!
//! Orders are signed off-chain as EIP-712 typed data and validated by the
//! settlement engine in `gallery-market`. Everything needed to reproduce the
//! exact digest a party signs lives in this crate, so signer tooling and the
//! settlement engine share a single implementation.

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
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod bindings;

mod order;
pub use order::{AssetId, OfferOrder, Order, OrderKind, SellOrder};

mod signing;
pub use signing::{
    MarketDomain, OrderSignature, SignatureError, SignaturePair, SigningError,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
