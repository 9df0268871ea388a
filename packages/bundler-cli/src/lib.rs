#![deny(clippy::all)]

/**
 * Neuron Bundler CLI
 *
 * Build orchestration around the core resolver: manifest loading, package
 * metadata, per-target resolution, bundle writing and console reporting.
 */
pub use neuron_bundler as bundler;

pub mod build;
pub mod config;
pub mod logging;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
