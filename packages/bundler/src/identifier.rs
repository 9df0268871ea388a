// Module Identifiers
//
// The canonical identifier of a file: the package's versioned identifier
// joined with the file's package-relative path, source extension stripped.
// Identifiers always use `/` separators regardless of host platform.

use std::path::Path;

use crate::specifier;

/// How the package-relative part of an identifier is computed.
///
/// Both policies exist in shipped revisions of this format. A resolution run
/// picks one and applies it to every file; mixing them within one package
/// produces inconsistent identifiers. `RootRelative` is the canonical choice
/// for new work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierPolicy {
    /// Every file, the main file included, is identified relative to the
    /// package working directory.
    #[default]
    RootRelative,
    /// The main file is the bare package identifier; every other file is
    /// identified relative to the main file's directory.
    MainRelative,
}

/// Per-run inputs for identifier generation.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierContext<'a> {
    pub cwd: &'a Path,
    pub main_file: &'a Path,
    /// `<name>@<version>` of the package being bundled.
    pub package_id: &'a str,
    pub policy: IdentifierPolicy,
}

/// Compute the module identifier for `file` under the run's policy.
pub fn generate(file: &Path, ctx: &IdentifierContext<'_>) -> String {
    match ctx.policy {
        IdentifierPolicy::RootRelative => join_id(ctx.package_id, &relative_id(ctx.cwd, file)),
        IdentifierPolicy::MainRelative => {
            if file == ctx.main_file {
                ctx.package_id.to_string()
            } else {
                let main_dir = ctx.main_file.parent().unwrap_or(ctx.cwd);
                join_id(ctx.package_id, &relative_id(main_dir, file))
            }
        }
    }
}

fn relative_id(base: &Path, file: &Path) -> String {
    let relative = specifier::relative_path(base, file);
    let mut id = relative.to_string_lossy().replace('\\', "/");
    if id.ends_with(specifier::SOURCE_EXT) {
        let stripped_len = id.len() - specifier::SOURCE_EXT.len();
        id.truncate(stripped_len);
    }
    id
}

fn join_id(package_id: &str, relative_id: &str) -> String {
    if relative_id.is_empty() {
        package_id.to_string()
    } else {
        format!("{}/{}", package_id, relative_id)
    }
}
