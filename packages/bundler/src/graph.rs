// Graph Resolution
//
// Recursive traversal from an entry file to the full deduplicated,
// dependency-ordered artifact set. One wrap per node is the only suspension
// point; sibling subtrees resolve concurrently and join all-or-nothing, with
// the first failure aborting the whole run. Ordering is imposed at the join,
// never derived from completion order.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_recursion::async_recursion;
use futures::future::try_join_all;

use crate::error::BundleError;
use crate::identifier::{self, IdentifierContext, IdentifierPolicy};
use crate::package::PackageDescriptor;
use crate::render::{ModuleFlags, ModuleRenderer, DEFAULT_DEFINE};
use crate::specifier;
use crate::wrap::{WrapOptions, Wrapper};

/// One wrapped module. `file` is the stable identity key: two traversal
/// paths reaching the same file collapse to a single artifact at the join.
/// Never mutated after creation.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    /// Absolute, normalized path of the source file.
    pub file: PathBuf,
    /// Final wrapped-module text.
    pub output: String,
    /// Raw dependency specifiers the file declares.
    pub deps: Vec<String>,
}

/// Immutable context for one resolution run, threaded through every
/// recursive call.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub pkg: PackageDescriptor,
    pub cwd: PathBuf,
    pub main_file: PathBuf,
    /// Uniform identifier re-tagging override.
    pub target_version: Option<String>,
    pub policy: IdentifierPolicy,
    /// Registration function name used in rendered output.
    pub define: String,
}

impl ResolveOptions {
    pub fn new(pkg: PackageDescriptor, cwd: impl Into<PathBuf>) -> Self {
        let cwd = specifier::normalize(&cwd.into());
        let main_file = pkg.main_file(&cwd);
        Self {
            pkg,
            cwd,
            main_file,
            target_version: None,
            policy: IdentifierPolicy::default(),
            define: DEFAULT_DEFINE.to_string(),
        }
    }

    pub fn with_target_version(mut self, target_version: impl Into<String>) -> Self {
        self.target_version = Some(target_version.into());
        self
    }

    pub fn with_policy(mut self, policy: IdentifierPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.define = define.into();
        self
    }
}

/// The recursive orchestrator.
pub struct GraphResolver {
    wrapper: Arc<dyn Wrapper>,
    options: ResolveOptions,
}

impl GraphResolver {
    pub fn new(wrapper: Arc<dyn Wrapper>, options: ResolveOptions) -> Self {
        Self { wrapper, options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve the complete artifact set reachable from `entry`. The entry
    /// may be given relative to the run's working directory.
    pub async fn resolve(&self, entry: &Path) -> Result<Vec<ResolvedArtifact>, BundleError> {
        let entry = if entry.is_absolute() {
            specifier::normalize(entry)
        } else {
            specifier::normalize(&self.options.cwd.join(entry))
        };
        self.resolve_file(entry, None, true).await
    }

    #[async_recursion]
    async fn resolve_file(
        &self,
        file: PathBuf,
        parent: Option<PathBuf>,
        top_level: bool,
    ) -> Result<Vec<ResolvedArtifact>, BundleError> {
        let package_id = self.options.pkg.package_id();
        let id = identifier::generate(
            &file,
            &IdentifierContext {
                cwd: &self.options.cwd,
                main_file: &self.options.main_file,
                package_id: &package_id,
                policy: self.options.policy,
            },
        );

        // Only the top-level file of a run is marked; transitively pulled-in
        // files carry neither flag regardless of their own content.
        let flags = if top_level {
            if file == self.options.main_file {
                ModuleFlags {
                    main: true,
                    entry: false,
                }
            } else {
                ModuleFlags {
                    main: false,
                    entry: true,
                }
            }
        } else {
            ModuleFlags::default()
        };

        let renderer = ModuleRenderer::new(
            &self.options.pkg,
            self.options.target_version.as_deref(),
            &self.options.define,
            flags,
        );

        let wrapped = self
            .wrapper
            .wrap(&file, WrapOptions { id, renderer })
            .await
            .map_err(|err| err.with_parent(parent.as_deref()))?;

        // Bare specifiers were fully resolved inside the render step; only
        // relative ones spawn further traversal.
        let child_files: Vec<PathBuf> = wrapped
            .deps
            .iter()
            .filter(|dep| specifier::is_relative(dep))
            .map(|dep| specifier::to_candidate_file(&file, dep))
            .collect();

        let artifact = ResolvedArtifact {
            file: file.clone(),
            output: wrapped.output,
            deps: wrapped.deps,
        };

        if child_files.is_empty() {
            return Ok(vec![artifact]);
        }

        let children = child_files
            .into_iter()
            .map(|child| self.resolve_file(child, Some(file.clone()), false));
        let child_lists = try_join_all(children).await?;

        let mut artifacts: Vec<ResolvedArtifact> = child_lists.into_iter().flatten().collect();
        artifacts.push(artifact);
        artifacts.sort_by(|a, b| a.file.cmp(&b.file));
        artifacts.dedup_by(|a, b| a.file == b.file);
        Ok(artifacts)
    }
}
