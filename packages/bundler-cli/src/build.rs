// Build Driver
//
// Runs one graph resolution per configured entry/destination pair and writes
// each concatenated bundle. Failure isolation is per target: a failing entry
// is recorded in the summary and the remaining targets still build.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use neuron_bundler::graph::{GraphResolver, ResolveOptions};
use neuron_bundler::package::PackageDescriptor;
use neuron_bundler::specifier;
use neuron_bundler::wrap::SourceWrapper;
use neuron_bundler::BundleError;

use crate::config::BuildConfig;
use crate::logging::Logger;

/// Outcome of one entry/destination target.
#[derive(Debug)]
pub struct TargetOutcome {
    pub entry: PathBuf,
    pub dest: PathBuf,
    /// Number of modules written into the bundle, when the target succeeded.
    pub modules: usize,
    pub error: Option<anyhow::Error>,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub targets: Vec<TargetOutcome>,
}

impl BuildSummary {
    pub fn failed(&self) -> bool {
        self.targets.iter().any(|target| target.error.is_some())
    }
}

/// Build every configured target. Configuration problems (unreadable
/// package.json, invalid manifest) fail the whole run before any traversal;
/// anything later is isolated to its target.
pub async fn perform_build(
    config: &BuildConfig,
    logger: &dyn Logger,
) -> Result<BuildSummary, BundleError> {
    config.validate()?;
    let cwd = absolutize(config.cwd());
    let pkg = PackageDescriptor::load(&cwd)?;
    let target_version = config
        .target_version
        .clone()
        .unwrap_or_else(|| pkg.version.clone());

    logger.debug(&format!(
        "building {} with target version {}",
        pkg.package_id(),
        target_version
    ));

    let mut summary = BuildSummary::default();
    for (entry, dest) in &config.entries {
        let entry_path = specifier::normalize(&cwd.join(entry));
        let dest_path = specifier::normalize(&cwd.join(dest));

        let options = ResolveOptions::new(pkg.clone(), &cwd)
            .with_target_version(target_version.as_str())
            .with_define(config.define.as_str());
        let (modules, error) = match build_target(&entry_path, &dest_path, options, logger).await {
            Ok(count) => (count, None),
            Err(err) => (0, Some(err)),
        };

        summary.targets.push(TargetOutcome {
            entry: entry_path,
            dest: dest_path,
            modules,
            error,
        });
    }
    Ok(summary)
}

async fn build_target(
    entry: &Path,
    dest: &Path,
    options: ResolveOptions,
    logger: &dyn Logger,
) -> Result<usize, anyhow::Error> {
    let resolver = GraphResolver::new(Arc::new(SourceWrapper), options);
    let artifacts = resolver.resolve(entry).await?;

    let content = artifacts
        .iter()
        .map(|artifact| artifact.output.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    fs::write(dest, content).with_context(|| format!("cannot write {}", dest.display()))?;

    logger.info(&format!("File \"{}\" created.", dest.display()));
    Ok(artifacts.len())
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        specifier::normalize(path)
    } else {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        specifier::normalize(&base.join(path))
    }
}
