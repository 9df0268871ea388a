// Build Manifest
//
// The multi-target build configuration consumed by the driver: working
// directory, entry -> destination pairs, the optional uniform version
// override and the registration function name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use neuron_bundler::render::DEFAULT_DEFINE;
use neuron_bundler::BundleError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    /// Package working directory. Defaults to the manifest's directory.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    /// Entry source path -> destination bundle path. Each pair is an
    /// independent resolution run.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
    /// Uniform identifier re-tagging override for the whole run.
    #[serde(default)]
    pub target_version: Option<String>,
    /// Registration function name used in rendered output.
    #[serde(default = "default_define")]
    pub define: String,
}

fn default_define() -> String {
    DEFAULT_DEFINE.to_string()
}

impl BuildConfig {
    /// Load a build manifest, defaulting `cwd` to the manifest's directory.
    pub fn load(path: &Path) -> Result<Self, BundleError> {
        let content = fs::read_to_string(path).map_err(|err| {
            BundleError::Configuration(format!("cannot read {}: {}", path.display(), err))
        })?;
        let mut config: BuildConfig = serde_json::from_str(&content).map_err(|err| {
            BundleError::Configuration(format!("invalid {}: {}", path.display(), err))
        })?;
        if config.cwd.is_none() {
            config.cwd = path.parent().map(Path::to_path_buf);
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the driver cannot act on, before any traversal.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.cwd.is_none() {
            return Err(BundleError::Configuration(
                "working directory is not set".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Err(BundleError::Configuration(
                "no entries configured".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cwd(&self) -> &Path {
        self.cwd.as_deref().unwrap_or_else(|| Path::new("."))
    }
}
