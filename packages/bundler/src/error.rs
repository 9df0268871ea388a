// Bundle Errors
//
// Every failure a resolution run can surface. All of them are fatal for the
// run that raised them; there is no local recovery or retry in the resolver.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Remediation text for an undeclared dependency. Kept next to the error
/// rather than inside its message so presentation layers can decide whether
/// and where to show it.
pub const UNDECLARED_DEPENDENCY_HINT: &str =
    "declare an exact version in package.json and re-run your package installation";

#[derive(Debug, Error)]
pub enum BundleError {
    /// A bare specifier has no pinned version in the package descriptor.
    #[error(
        "explicit version of dependency \"{}\" is not declared in package.json (required by {})",
        .specifier,
        .file.display()
    )]
    UndeclaredDependency { specifier: String, file: PathBuf },

    /// The wrap collaborator could not produce code and dependencies for a
    /// file. `parent` is the file that required it, when known.
    #[error("failed to wrap module {}{}: {}", .file.display(), required_by(.parent), .source)]
    Wrap {
        file: PathBuf,
        parent: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// Required run configuration is missing or unreadable. Surfaces before
    /// any traversal begins.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BundleError {
    /// Attach the referencing file to a wrap failure for diagnostics. Leaves
    /// an already-attached parent and every other error kind untouched.
    pub fn with_parent(mut self, parent: Option<&Path>) -> Self {
        if let BundleError::Wrap {
            parent: existing, ..
        } = &mut self
        {
            if existing.is_none() {
                *existing = parent.map(Path::to_path_buf);
            }
        }
        self
    }

    /// User-actionable follow-up for this error, when one exists.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            BundleError::UndeclaredDependency { .. } => Some(UNDECLARED_DEPENDENCY_HINT),
            _ => None,
        }
    }
}

fn required_by(parent: &Option<PathBuf>) -> String {
    match parent {
        Some(file) => format!(" (required by {})", file.display()),
        None => String::new(),
    }
}
