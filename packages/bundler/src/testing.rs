// Test Support
//
// An in-memory wrapper for driving the graph resolver without touching the
// filesystem. Modules are registered up front with their code body and the
// dependency specifiers the real extraction step would have found.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::BundleError;
use crate::render::RenderRequest;
use crate::wrap::{WrapOptions, WrappedModule, Wrapper};

#[derive(Debug, Clone, Default)]
pub struct MockModule {
    pub code: String,
    pub deps: Vec<String>,
}

/// Wrapper backed by an in-memory module map. Unknown files fail the same
/// way a missing file fails the real wrapper.
#[derive(Debug, Default)]
pub struct MockWrapper {
    modules: HashMap<PathBuf, MockModule>,
}

impl MockWrapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, file: impl Into<PathBuf>, code: &str, deps: &[&str]) -> Self {
        self.modules.insert(
            file.into(),
            MockModule {
                code: code.to_string(),
                deps: deps.iter().map(|dep| dep.to_string()).collect(),
            },
        );
        self
    }
}

#[async_trait]
impl Wrapper for MockWrapper {
    async fn wrap(
        &self,
        file: &Path,
        options: WrapOptions<'_>,
    ) -> Result<WrappedModule, BundleError> {
        let module = self.modules.get(file).ok_or_else(|| BundleError::Wrap {
            file: file.to_path_buf(),
            parent: None,
            source: io::Error::new(io::ErrorKind::NotFound, "no such module"),
        })?;
        let output = options.renderer.render(&RenderRequest {
            file,
            id: &options.id,
            deps: &module.deps,
            code: &module.code,
        })?;
        Ok(WrappedModule {
            deps: module.deps.clone(),
            output,
        })
    }
}
