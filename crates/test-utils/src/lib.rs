//! Common utilities for testing gallery marketplace components.

pub mod ledger;
pub mod scenario;

pub use gallery_constants::test_utils as test_constants;
pub use gallery_types::test_utils as users;

use tracing_subscriber::{fmt, EnvFilter};

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `debug`
/// for the gallery crates. Safe to call from every test.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gallery_market=debug,gallery_test_utils=trace"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}
