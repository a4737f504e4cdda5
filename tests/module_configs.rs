//! Resolution of JavaScript configuration files evaluated with Node.js.
//!
//! These tests need a `node` binary (or `VSCODE_TEST_NODE`). When none is
//! available they print a note and return early.

use std::fs;

use pretty_assertions::assert_eq;

use vscode_test_config::config::{self, ConfigError, LoadFailure};
use vscode_test_config::env::Env;
use vscode_test_config::models::OneOrMany;

/// Returns `true` if Node.js can be executed, `false` otherwise.
fn has_node() -> bool {
    let node = Env::real().node_binary();
    let available = std::process::Command::new(&node)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("SKIPPING: `{node}` is not available. Install Node.js to run module config tests.");
    }
    available
}

/// Macro that returns early from a test if Node.js is unavailable.
macro_rules! require_node {
    () => {
        if !has_node() {
            return;
        }
    };
}

#[tokio::test]
async fn mjs_default_export_object() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        "export default { tests: [{ files: 'out/test/**/*.test.js', label: 'unit' }], coverage: { reporter: ['text'] } };\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(resolved.tests().len(), 1);
    assert_eq!(resolved.tests()[0].label.as_deref(), Some("unit"));
    assert_eq!(
        resolved.coverage().and_then(|c| c.reporter.clone()),
        Some(serde_json::json!(["text"]))
    );
}

#[tokio::test]
async fn default_function_returning_promise_of_array() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        r#"
console.log('noise before the result');
export default async () => [
  { files: 'out/a.test.js' },
  { files: 'out/b.test.js', extensionDevelopmentPath: './ext' },
];
"#,
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    let tests = resolved.tests();
    assert_eq!(tests.len(), 2);
    assert!(resolved.coverage().is_none());
    assert_eq!(
        resolved.extension_development_paths(&tests[1]),
        vec![project.path().join("ext")]
    );
}

#[tokio::test]
async fn default_promise_resolving_to_default_wrapper() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        "export default Promise.resolve({ default: { tests: [{ files: 'out/a.test.js' }] } });\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(resolved.tests().len(), 1);
    assert_eq!(resolved.tests()[0].files, OneOrMany::from("out/a.test.js"));
}

#[tokio::test]
async fn default_dynamic_import_of_another_module() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join("real.mjs"),
        "export default [{ files: 'out/a.test.js' }, { files: 'out/b.test.js', label: 'b' }];\n",
    )
    .unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        "export default import('./real.mjs');\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(resolved.tests().len(), 2);
    assert_eq!(resolved.tests()[1].label.as_deref(), Some("b"));
}

#[tokio::test]
async fn commonjs_module_exports() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.js"),
        "module.exports = { files: 'out/**/*.test.js', version: 'insiders' };\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(resolved.tests()[0].version.as_deref(), Some("insiders"));
}

#[tokio::test]
async fn named_tests_export_without_default() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        "export const tests = [{ files: 'a.js' }];\nexport function helper() { return 1; }\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(resolved.tests().len(), 1);
}

#[tokio::test]
async fn top_level_throw_is_load_error_with_stack() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".vscode-test.mjs"),
        "throw new Error('config exploded');\n",
    )
    .unwrap();

    let err = config::resolve(project.path(), None).await.unwrap_err();
    match &err {
        ConfigError::Load {
            source: LoadFailure::Module { stderr, .. },
            path,
        } => {
            assert!(stderr.contains("config exploded"));
            assert_eq!(path, &project.path().join(".vscode-test.mjs"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn syntax_error_is_load_error() {
    require_node!();
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".vscode-test.mjs"), "export default {\n").unwrap();

    let err = config::resolve(project.path(), None).await.unwrap_err();
    assert!(matches!(err, ConfigError::Load { .. }));
}

#[tokio::test]
async fn json_wins_over_js_in_same_directory() {
    // The JSON file wins, so Node.js is never invoked.
    let project = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".vscode-test.json"), r#"{"files":"from-json.js"}"#).unwrap();
    fs::write(
        project.path().join(".vscode-test.js"),
        "module.exports = { files: 'from-js.js' };\n",
    )
    .unwrap();

    let resolved = config::resolve(project.path(), None).await.unwrap();
    assert_eq!(
        resolved.tests()[0].files.iter().collect::<Vec<_>>(),
        vec!["from-json.js"]
    );
}
