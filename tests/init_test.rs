//! Integration tests for `granite init`

mod common;

use common::{combined_output, run_granite, TestWorkspace};

#[test]
fn test_init_creates_workspace_files() {
    let ws = TestWorkspace::new();

    let output = run_granite(&ws, &["init"]);
    assert!(output.status.success(), "{}", combined_output(&output));

    assert!(ws.file_exists("granite.toml"));
    assert!(ws.file_exists(".granite"));

    let config = ws.read_file("granite.toml");
    assert!(config.contains("[types.lib]"));
    assert!(config.contains("packages/lib"));
}

#[test]
fn test_init_is_idempotent() {
    let ws = TestWorkspace::new();

    assert!(run_granite(&ws, &["init"]).status.success());
    let first = ws.read_file("granite.toml");

    assert!(run_granite(&ws, &["init"]).status.success());
    assert_eq!(ws.read_file("granite.toml"), first);
}

#[test]
fn test_init_preserves_custom_types() {
    let ws = TestWorkspace::new();
    ws.create_file(
        "granite.toml",
        r#"[types.lib]
package_dir = "custom/location"
"#,
    );

    assert!(run_granite(&ws, &["init"]).status.success());
    assert!(ws.read_file("granite.toml").contains("custom/location"));
}
