//! Integration tests for `amrdiff tables`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::Command;

fn amrdiff_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("amrdiff");
    path
}

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

#[test]
fn json_tables_decode_as_gold_tables() {
    let out = Command::new(amrdiff_bin())
        .args(["tables", fixture("gold_only.json").to_str().expect("path")])
        .env_remove("RUST_LOG")
        .output()
        .expect("run amrdiff tables");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());

    let tables: amrdiff_core::GoldTables =
        serde_json::from_slice(&out.stdout).expect("stdout is GoldTables JSON");
    assert_eq!(tables.node_count(), 2);
    assert_eq!(tables.concept(1), Some("boy"));
    assert!(
        tables
            .relation_labels(0, 1)
            .is_some_and(|labels| labels.contains("ARG0"))
    );
    assert!(
        tables
            .attribute_labels(0, "want-01")
            .is_some_and(|labels| labels.contains("TOP"))
    );
}

#[test]
fn human_tables_list_entries() {
    let out = Command::new(amrdiff_bin())
        .args([
            "tables",
            fixture("gold_only.json").to_str().expect("path"),
            "--format",
            "human",
        ])
        .env_remove("RUST_LOG")
        .output()
        .expect("run amrdiff tables");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("instance  0  want-01"), "stdout: {stdout}");
    assert!(stdout.contains("relation  0  ARG0  1"), "stdout: {stdout}");
}

#[test]
fn undeclared_variable_is_exit_1() {
    let mut f = tempfile::NamedTempFile::new().expect("temp file");
    f.write_all(
        br#"{"instances": [{"variable": "x", "concept": "dog"}],
            "relations": [{"relation": "ARG0", "source": "x", "target": "q"}]}"#,
    )
    .expect("write");
    let out = Command::new(amrdiff_bin())
        .args(["tables", f.path().to_str().expect("path")])
        .env_remove("RUST_LOG")
        .output()
        .expect("run amrdiff tables");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("undeclared variable"), "stderr: {stderr}");
}
