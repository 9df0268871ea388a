#![deny(clippy::all)]

/**
 * Neuron Bundler - core resolution library
 *
 * Turns one entry source file into the complete, deduplicated,
 * dependency-ordered set of wrapped module artifacts needed to produce a
 * single concatenated bundle.
 */
pub mod error;
pub mod graph;
pub mod identifier;
pub mod package;
pub mod render;
pub mod specifier;
pub mod testing;
pub mod version;
pub mod wrap;

pub use error::BundleError;
pub use graph::{GraphResolver, ResolveOptions, ResolvedArtifact};
pub use package::PackageDescriptor;

/// Library version
pub fn lib_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
