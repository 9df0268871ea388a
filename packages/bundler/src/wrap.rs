// Module Wrapping
//
// The wrap collaborator: reads one source file, extracts its require()
// specifiers, and hands the renderer the raw code body. The graph resolver
// depends only on the `Wrapper` trait, so the extraction strategy stays
// swappable (tests use the in-memory wrapper from `testing`).

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BundleError;
use crate::render::{ModuleRenderer, RenderRequest};

static REQUIRE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\brequire\s*\(\s*(?:"([^"\\]+)"|'([^'\\]+)')\s*\)"#).unwrap()
});

/// Wrap configuration supplied per file by the graph resolver.
pub struct WrapOptions<'a> {
    /// Canonical identifier of the file being wrapped.
    pub id: String,
    /// Renders the extracted body into the final wrapped-module text.
    pub renderer: ModuleRenderer<'a>,
}

/// Result of wrapping one file.
#[derive(Debug, Clone)]
pub struct WrappedModule {
    /// Raw dependency specifiers, in order of first appearance.
    pub deps: Vec<String>,
    /// Final wrapped-module text.
    pub output: String,
}

/// Asynchronous single-file wrap operation:
/// `wrap(file, {id, render}) -> {deps, output} | error`.
#[async_trait]
pub trait Wrapper: Send + Sync {
    async fn wrap(
        &self,
        file: &Path,
        options: WrapOptions<'_>,
    ) -> Result<WrappedModule, BundleError>;
}

/// Default wrapper: the code body is the file's verbatim source and the
/// dependency list is every `require("...")` specifier found in it.
pub struct SourceWrapper;

/// Extract require() specifiers in order of first appearance, deduplicated.
pub fn extract_requires(code: &str) -> Vec<String> {
    let mut deps: Vec<String> = Vec::new();
    for caps in REQUIRE_RE.captures_iter(code) {
        let matched = caps.get(1).or_else(|| caps.get(2));
        if let Some(spec) = matched {
            let spec = spec.as_str().to_string();
            if !deps.contains(&spec) {
                deps.push(spec);
            }
        }
    }
    deps
}

#[async_trait]
impl Wrapper for SourceWrapper {
    async fn wrap(
        &self,
        file: &Path,
        options: WrapOptions<'_>,
    ) -> Result<WrappedModule, BundleError> {
        let code = tokio::fs::read_to_string(file)
            .await
            .map_err(|source| BundleError::Wrap {
                file: file.to_path_buf(),
                parent: None,
                source,
            })?;
        let deps = extract_requires(&code);
        let output = options.renderer.render(&RenderRequest {
            file,
            id: &options.id,
            deps: &deps,
            code: &code,
        })?;
        Ok(WrappedModule { deps, output })
    }
}
