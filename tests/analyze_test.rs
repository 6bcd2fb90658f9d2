//! Integration tests for `granite analyze`

mod common;

use common::{combined_output, run_granite, TestWorkspace};

#[test]
fn test_overview_counts() {
    let ws = TestWorkspace::new();
    ws.write_root_config("true");
    ws.add_package("util", &[], None);
    ws.add_package("core", &["util"], None);

    let output = run_granite(&ws, &["analyze"]);
    assert!(output.status.success(), "{}", combined_output(&output));

    let text = combined_output(&output);
    assert!(text.contains("Total packages: 2"));
    assert!(text.contains("Total dependencies: 1"));
    assert!(text.contains("lib: 2 packages"));
}

#[test]
fn test_json_output_is_parseable() {
    let ws = TestWorkspace::new();
    ws.write_root_config("true");
    ws.add_package("util", &[], None);

    let output = run_granite(&ws, &["analyze", "--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("analyze --json must emit valid JSON");
    assert_eq!(parsed["total_packages"], 1);
    assert_eq!(parsed["packages"]["util"]["type"], "lib");
}

#[test]
fn test_missing_readme_is_reported() {
    let ws = TestWorkspace::new();
    ws.write_root_config("true");
    ws.add_package("bare", &[], None);

    let output = run_granite(&ws, &["analyze"]);
    let text = combined_output(&output);
    assert!(text.contains("Missing README.md"));
}

#[test]
fn test_circular_dependencies_are_reported() {
    let ws = TestWorkspace::new();
    ws.write_root_config("true");
    ws.add_package("a", &["b"], None);
    ws.add_package("b", &["a"], None);

    let output = run_granite(&ws, &["analyze"]);
    let text = combined_output(&output);
    assert!(text.contains("Circular Dependencies"));
    assert!(text.contains("Found 1 circular dependencies"));
}
