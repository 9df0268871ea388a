// Dependency Version Resolution
//
// A bare specifier must carry an exact pinned version from the package
// descriptor; relative specifiers are the traversal's concern and pass
// through untouched. Lookup is exact-match only: keeping the declared
// version in sync is the package descriptor's burden, not this resolver's.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::BundleError;
use crate::specifier;

/// Resolve one dependency specifier against the declared version map,
/// yielding `<specifier>@<version>` for bare specifiers. Fails naming both
/// the dependency and the file that requires it when no version is declared.
pub fn resolve(
    dep: &str,
    declared: &BTreeMap<String, String>,
    context_file: &Path,
) -> Result<String, BundleError> {
    if specifier::is_relative(dep) {
        return Ok(dep.to_string());
    }
    match declared.get(dep) {
        Some(version) => Ok(format!("{}@{}", dep, version)),
        None => Err(BundleError::UndeclaredDependency {
            specifier: dep.to_string(),
            file: context_file.to_path_buf(),
        }),
    }
}
