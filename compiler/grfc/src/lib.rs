//! GRF compiler driver.
//!
//! A `Session` owns everything one compilation needs: the string interner,
//! the `CompileOptions` it was configured with, and for each `compile` call a
//! fresh scope stack and namespace. Nothing is process-global, so sessions in
//! the same process never see each other's definitions.
//!
//! # Pipeline
//!
//! 1. Registration of every statement, in document order (`grf_sema::Registrar`)
//! 2. Parameter validation of every registered layout
//! 3. Action generation per layout for the configured features, through the
//!    reference `LayoutEncoder`
//!
//! Registration stops at its first error. Layout checks and generation
//! report every failing layout, up to the configured error limit. Layout
//! arguments that name no registered layout are reported as warnings.

mod encoder;
mod options;
pub mod problem;
mod session;

use std::sync::Once;

pub use encoder::LayoutEncoder;
pub use options::CompileOptions;
pub use session::{CompileOutput, Session};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only does anything when `RUST_LOG` is set, e.g.
/// `RUST_LOG=grf_sema=debug` or `RUST_LOG=grf_eval=trace`. Safe to call more
/// than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
