pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod enrich;
pub mod netutils;
pub mod pipeline;
pub mod probes;
pub mod report;
pub mod risk;
pub mod scan;
pub mod signatures;
pub mod types;

pub use aggregate::aggregate;
pub use enrich::Enricher;
pub use pipeline::{assess, run_assessment};
pub use scan::run;

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber. `RUST_LOG` wins over `default_level`.
/// Calling it again is a no-op.
pub fn init_tracing_with(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn init_tracing() {
    init_tracing_with("info");
}
