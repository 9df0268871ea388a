// Build Driver Tests
//
// End-to-end runs of the driver over real package trees: manifest loading,
// bundle writing, concatenation order and per-target failure isolation.

use std::fs;
use std::path::Path;

use neuron_bundler::BundleError;
use neuron_bundler_cli::build::perform_build;
use neuron_bundler_cli::config::BuildConfig;
use neuron_bundler_cli::logging::NullLogger;

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn scaffold_package(root: &Path) {
    write_file(
        root,
        "package.json",
        r#"{
            "name": "clock",
            "version": "1.0.0",
            "main": "src/a.js",
            "dependencies": { "events": "0.3.1" }
        }"#,
    );
    write_file(
        root,
        "src/a.js",
        "var b = require('./b');\nvar events = require('events');",
    );
    write_file(root, "src/b.js", "module.exports = 2;");
}

#[tokio::test]
async fn builds_a_bundle_from_a_manifest() {
    let dir = tempfile::tempdir().unwrap();
    scaffold_package(dir.path());
    write_file(
        dir.path(),
        "neuron.json",
        r#"{ "entries": { "src/a.js": "dist/a.js" } }"#,
    );

    let config = BuildConfig::load(&dir.path().join("neuron.json")).unwrap();
    // cwd defaulted to the manifest's directory.
    assert_eq!(config.cwd(), dir.path());

    let summary = perform_build(&config, &NullLogger::new()).await.unwrap();
    assert!(!summary.failed());
    assert_eq!(summary.targets.len(), 1);
    assert_eq!(summary.targets[0].modules, 2);

    let bundle = fs::read_to_string(dir.path().join("dist/a.js")).unwrap();
    // Two wrapped modules, concatenated in the resolver's returned order.
    assert_eq!(bundle.matches("define(").count(), 2);
    let a_pos = bundle.find("/src/a\"").unwrap();
    let b_pos = bundle.find("/src/b\"").unwrap();
    assert!(a_pos < b_pos);
    assert!(bundle.contains("events@0.3.1"));
    assert!(bundle.contains("\"main\": true"));
}

#[tokio::test]
async fn target_version_flows_into_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    scaffold_package(dir.path());
    write_file(
        dir.path(),
        "neuron.json",
        r#"{ "entries": { "src/a.js": "dist/a.js" }, "targetVersion": "2.0.0" }"#,
    );

    let config = BuildConfig::load(&dir.path().join("neuron.json")).unwrap();
    let summary = perform_build(&config, &NullLogger::new()).await.unwrap();
    assert!(!summary.failed());

    let bundle = fs::read_to_string(dir.path().join("dist/a.js")).unwrap();
    assert!(bundle.contains("clock@2.0.0/src/a"));
    assert!(!bundle.contains("clock@1.0.0"));
}

#[tokio::test]
async fn one_bad_target_does_not_stop_the_others() {
    let dir = tempfile::tempdir().unwrap();
    scaffold_package(dir.path());
    write_file(
        dir.path(),
        "neuron.json",
        r#"{ "entries": {
            "src/a.js": "dist/a.js",
            "src/gone.js": "dist/gone.js"
        } }"#,
    );

    let config = BuildConfig::load(&dir.path().join("neuron.json")).unwrap();
    let summary = perform_build(&config, &NullLogger::new()).await.unwrap();

    assert!(summary.failed());
    assert_eq!(summary.targets.len(), 2);
    let good = summary
        .targets
        .iter()
        .find(|t| t.entry.ends_with("src/a.js"))
        .unwrap();
    let bad = summary
        .targets
        .iter()
        .find(|t| t.entry.ends_with("src/gone.js"))
        .unwrap();
    assert!(good.error.is_none());
    assert!(bad.error.is_some());
    // The healthy target's bundle was still written.
    assert!(dir.path().join("dist/a.js").exists());
    assert!(!dir.path().join("dist/gone.js").exists());
}

#[tokio::test]
async fn undeclared_dependency_fails_the_target_with_context() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "package.json",
        r#"{ "name": "clock", "version": "1.0.0" }"#,
    );
    write_file(dir.path(), "src/a.js", "require('y');");
    write_file(
        dir.path(),
        "neuron.json",
        r#"{ "entries": { "src/a.js": "dist/a.js" } }"#,
    );

    let config = BuildConfig::load(&dir.path().join("neuron.json")).unwrap();
    let summary = perform_build(&config, &NullLogger::new()).await.unwrap();

    assert!(summary.failed());
    let err = summary.targets[0].error.as_ref().unwrap();
    let bundle_err = err.downcast_ref::<BundleError>().unwrap();
    match bundle_err {
        BundleError::UndeclaredDependency { specifier, file } => {
            assert_eq!(specifier, "y");
            assert!(file.ends_with("src/a.js"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(bundle_err.remediation().is_some());
}

#[tokio::test]
async fn missing_package_json_fails_before_any_target() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "neuron.json",
        r#"{ "entries": { "src/a.js": "dist/a.js" } }"#,
    );

    let config = BuildConfig::load(&dir.path().join("neuron.json")).unwrap();
    let err = perform_build(&config, &NullLogger::new()).await.unwrap_err();
    match err {
        BundleError::Configuration(message) => {
            assert!(message.contains("package.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
