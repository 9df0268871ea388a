// Module Rendering
//
// Expands one wrapped-module envelope: registration call, quoted identifier,
// resolved dependency list, verbatim code body and an optional trailing
// options literal. Output bytes must be stable across runs because bundles
// are produced by concatenating these strings directly.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::BundleError;
use crate::package::PackageDescriptor;
use crate::version;

static SEMVER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+\.\d+").unwrap());

/// Default registration function name.
pub const DEFAULT_DEFINE: &str = "define";

/// Entry/main marking for one rendered module. At most one of the two is
/// set, and only on the top-level file of a resolution run; every
/// transitively pulled-in file carries neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleFlags {
    pub main: bool,
    pub entry: bool,
}

/// Per-file inputs handed to the renderer by the wrap collaborator.
#[derive(Debug)]
pub struct RenderRequest<'a> {
    /// Absolute path of the file being rendered, for error context.
    pub file: &'a Path,
    /// Canonical identifier computed for the file.
    pub id: &'a str,
    /// Raw dependency specifiers as they appear in the source.
    pub deps: &'a [String],
    /// Extracted code body, verbatim.
    pub code: &'a str,
}

/// Renders the final wrapped-module text for files of one package.
#[derive(Debug, Clone, Copy)]
pub struct ModuleRenderer<'a> {
    pkg: &'a PackageDescriptor,
    target_version: Option<&'a str>,
    define: &'a str,
    flags: ModuleFlags,
}

/// Trailing options literal, serialized only when at least one field is set.
#[derive(Serialize)]
struct ModuleOptions {
    #[serde(rename = "asyncDeps", skip_serializing_if = "Vec::is_empty")]
    async_deps: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    main: bool,
    #[serde(skip_serializing_if = "is_false")]
    entry: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(flag: &bool) -> bool {
    !*flag
}

impl ModuleOptions {
    fn is_empty(&self) -> bool {
        self.async_deps.is_empty() && !self.main && !self.entry
    }
}

impl<'a> ModuleRenderer<'a> {
    pub fn new(
        pkg: &'a PackageDescriptor,
        target_version: Option<&'a str>,
        define: &'a str,
        flags: ModuleFlags,
    ) -> Self {
        Self {
            pkg,
            target_version,
            define,
            flags,
        }
    }

    /// Produce the wrapped-module text. Fails when any bare specifier in the
    /// dependency list (sync or async) has no declared version.
    pub fn render(&self, request: &RenderRequest<'_>) -> Result<String, BundleError> {
        let deps = request
            .deps
            .iter()
            .map(|dep| version::resolve(dep, &self.pkg.dependencies, request.file))
            .collect::<Result<Vec<_>, _>>()?;

        let id = match self.target_version {
            Some(target) => SEMVER_RE.replace(request.id, target).into_owned(),
            None => request.id.to_string(),
        };

        let async_deps = self
            .pkg
            .async_dependencies
            .keys()
            .map(|dep| version::resolve(dep, &self.pkg.async_dependencies, request.file))
            .collect::<Result<Vec<_>, _>>()?;

        let options = ModuleOptions {
            async_deps,
            main: self.flags.main,
            entry: self.flags.entry,
        };

        let mut out = String::new();
        out.push_str(self.define);
        out.push('(');
        if !id.is_empty() {
            out.push('"');
            out.push_str(&id);
            out.push_str("\", ");
        }
        out.push('[');
        out.push_str(&quote_list(&deps));
        out.push_str("], function(require, exports, module) {\n");
        out.push_str(&normalize_newlines(request.code));
        out.push_str("\n}");
        if !options.is_empty() {
            out.push_str(", ");
            out.push_str(&options_literal(&options)?);
        }
        out.push_str(");");
        Ok(out)
    }
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collapse CRLF and lone CR line terminators to a single LF.
fn normalize_newlines(code: &str) -> String {
    code.replace("\r\n", "\n").replace('\r', "\n")
}

fn options_literal(options: &ModuleOptions) -> Result<String, BundleError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    options.serialize(&mut ser).map_err(|err| {
        BundleError::Configuration(format!("cannot serialize module options: {}", err))
    })?;
    String::from_utf8(buf)
        .map_err(|err| BundleError::Configuration(format!("module options are not UTF-8: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn package() -> PackageDescriptor {
        let mut dependencies = BTreeMap::new();
        dependencies.insert("events".to_string(), "0.3.1".to_string());
        PackageDescriptor {
            name: "clock".to_string(),
            version: "1.0.0".to_string(),
            dependencies,
            async_dependencies: BTreeMap::new(),
            main: "src/index.js".to_string(),
        }
    }

    fn request<'a>(deps: &'a [String], code: &'a str) -> RenderRequest<'a> {
        RenderRequest {
            file: Path::new("/pkg/src/a.js"),
            id: "clock@1.0.0/src/a",
            deps,
            code,
        }
    }

    #[test]
    fn renders_the_plain_envelope() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let output = renderer
            .render(&request(&[], "module.exports = 1;"))
            .unwrap();
        assert_eq!(
            output,
            "define(\"clock@1.0.0/src/a\", [], function(require, exports, module) {\nmodule.exports = 1;\n});"
        );
    }

    #[test]
    fn resolves_bare_deps_and_passes_relative_through() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let deps = vec!["./b".to_string(), "events".to_string()];
        let output = renderer.render(&request(&deps, "")).unwrap();
        assert!(output.contains("[\"./b\", \"events@0.3.1\"]"));
    }

    #[test]
    fn undeclared_bare_dep_fails_the_render() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let deps = vec!["lodash".to_string()];
        let err = renderer.render(&request(&deps, "")).unwrap_err();
        match err {
            BundleError::UndeclaredDependency { specifier, file } => {
                assert_eq!(specifier, "lodash");
                assert_eq!(file, PathBuf::from("/pkg/src/a.js"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn target_version_retags_the_identifier() {
        let pkg = package();
        let renderer =
            ModuleRenderer::new(&pkg, Some("2.0.0"), DEFAULT_DEFINE, ModuleFlags::default());
        let output = renderer.render(&request(&[], "")).unwrap();
        assert!(output.starts_with("define(\"clock@2.0.0/src/a\", "));
    }

    #[test]
    fn entry_flag_emits_the_options_literal() {
        let pkg = package();
        let flags = ModuleFlags {
            main: false,
            entry: true,
        };
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, flags);
        let output = renderer.render(&request(&[], "")).unwrap();
        assert!(output.ends_with("}, {\n    \"entry\": true\n});"));
    }

    #[test]
    fn async_deps_are_version_resolved_into_the_options() {
        let mut pkg = package();
        pkg.async_dependencies
            .insert("heavy".to_string(), "2.1.0".to_string());
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let output = renderer.render(&request(&[], "")).unwrap();
        assert!(output.contains("\"asyncDeps\": [\n        \"heavy@2.1.0\"\n    ]"));
    }

    #[test]
    fn line_terminators_collapse_to_lf() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let output = renderer
            .render(&request(&[], "var a = 1;\r\nvar b = 2;\rvar c = 3;"))
            .unwrap();
        assert!(output.contains("var a = 1;\nvar b = 2;\nvar c = 3;"));
        assert!(!output.contains('\r'));
    }

    #[test]
    fn custom_registration_name_is_honored() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, "neuron.define", ModuleFlags::default());
        let output = renderer.render(&request(&[], "")).unwrap();
        assert!(output.starts_with("neuron.define(\""));
    }

    #[test]
    fn identical_input_renders_identical_bytes() {
        let pkg = package();
        let renderer = ModuleRenderer::new(&pkg, None, DEFAULT_DEFINE, ModuleFlags::default());
        let deps = vec!["events".to_string()];
        let first = renderer.render(&request(&deps, "var x;")).unwrap();
        let second = renderer.render(&request(&deps, "var x;")).unwrap();
        assert_eq!(first, second);
    }
}
