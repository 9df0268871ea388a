// Package Descriptor
//
// The package.json surface the bundler consumes: identity, pinned dependency
// versions, optional async dependencies and the designated main file.
// Immutable for the duration of one resolution run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::BundleError;
use crate::specifier;

#[derive(Debug, Clone, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    /// Declared dependency versions. Exact pins only, never ranges.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "asyncDependencies")]
    pub async_dependencies: BTreeMap<String, String>,
    /// Package-relative path of the public entry point.
    #[serde(default = "default_main")]
    pub main: String,
}

fn default_main() -> String {
    "index.js".to_string()
}

impl PackageDescriptor {
    /// Read `package.json` from the package root.
    pub fn load(cwd: &Path) -> Result<Self, BundleError> {
        let path = cwd.join("package.json");
        let content = fs::read_to_string(&path).map_err(|err| {
            BundleError::Configuration(format!("cannot read {}: {}", path.display(), err))
        })?;
        serde_json::from_str(&content).map_err(|err| {
            BundleError::Configuration(format!("invalid {}: {}", path.display(), err))
        })
    }

    /// `<name>@<version>`, the versioned identifier of the package itself.
    pub fn package_id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Absolute path of the designated main file.
    pub fn main_file(&self, cwd: &Path) -> PathBuf {
        specifier::normalize(&cwd.join(&self.main))
    }
}
