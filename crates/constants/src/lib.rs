//! Gallery marketplace constants.
//!
//! This crate contains the deployment constants of a marketplace instance:
//! the EIP-712 domain name and version, the chain it settles on, the address
//! of the settlement contract, and the operator allowed to manage the
//! quote-token allow-list.

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

mod env;
pub use env::{load_address, load_string, load_string_opt, load_u64};

mod error;
pub use error::ConfigError;

mod market;
pub use market::MarketConstants;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// EIP-712 domain name used by the gallery settlement contract.
pub const GALLERY_DOMAIN_NAME: &str = "NFTGallery721";

/// EIP-712 domain version used by the gallery settlement contract.
pub const GALLERY_DOMAIN_VERSION: &str = "1";
