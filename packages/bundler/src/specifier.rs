// Dependency Specifiers
//
// Classification of require() specifiers and the mapping from a relative
// specifier onto its candidate source file. Pure path arithmetic, no I/O:
// a malformed specifier simply yields a path that later fails to open, and
// that failure surfaces in the graph resolver.

use std::path::{Component, Path, PathBuf};

/// Extension appended to a relative specifier when locating its source file.
pub const SOURCE_EXT: &str = ".js";

/// True iff `specifier` points at another file of the same package.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Absolute candidate file for a relative specifier, resolved against the
/// directory of the file that requires it.
pub fn to_candidate_file(referencing_file: &Path, specifier: &str) -> PathBuf {
    let dir = referencing_file.parent().unwrap_or_else(|| Path::new("/"));
    normalize(&dir.join(format!("{}{}", specifier, SOURCE_EXT)))
}

/// Fold `.` and `..` segments out of a path without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Relative path from the directory `base` to `target`, both normalized
/// first. Walks up with `..` segments where the paths diverge.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base = normalize(base);
    let target = normalize(target);

    let mut base_components = base.components().peekable();
    let mut target_components = target.components().peekable();
    while let (Some(b), Some(t)) = (base_components.peek(), target_components.peek()) {
        if b != t {
            break;
        }
        base_components.next();
        target_components.next();
    }

    let mut out = PathBuf::new();
    for _ in base_components {
        out.push("..");
    }
    for component in target_components {
        out.push(component.as_os_str());
    }
    out
}
