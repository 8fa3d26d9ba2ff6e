//! Shared helpers for integration tests

#![allow(dead_code)] // Not every test binary uses every helper

pub mod builders;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize tracing output for tests (once per binary)
///
/// Set `RUST_LOG=scopevis_rs=trace` to see engine state transitions while
/// debugging a test.
pub fn init_tracing() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Assert two floats are equal within a tolerance
pub fn assert_float_eq(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}, difference {}",
        actual,
        tolerance,
        expected,
        (actual - expected).abs()
    );
}
