//! Integration test: the preview binary end to end

use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        format!(
            "column_width = 700.0\nlog_file_path = {:?}\n",
            dir.join("logs").join("richlog.log")
        ),
    )
    .expect("write config");

    Command::new(env!("CARGO_BIN_EXE_richlog"))
        .args(args)
        .env("RICHLOG_CONFIG", &config)
        .env_remove("RICHLOG_COLUMN_WIDTH")
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn binary_prints_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_richlog"))
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("0.1.0"),
        "Expected output to contain version '0.1.0', but got: {}",
        stdout
    );
}

#[test]
fn text_listing_shows_segments_and_total() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "[title]News[/title]Fixed [u]everything[/u]").expect("write notes");

    let output = run(dir.path(), &[file.to_str().expect("utf-8 path"), "--brackets"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Title"), "{stdout}");
    assert!(stdout.contains("\"News\""), "{stdout}");
    assert!(stdout.contains("total "), "{stdout}");
}

#[test]
fn json_report_lists_heights() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, "Hello <font>Tiny</font>World").expect("write notes");

    let output = run(
        dir.path(),
        &[file.to_str().expect("utf-8 path"), "--format", "json", "--width", "350"],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(report["column_width"], 350.0);
    let heights: Vec<u64> = report["segments"]
        .as_array()
        .expect("segments array")
        .iter()
        .map(|row| row["height"].as_u64().expect("height"))
        .collect();
    // MonospaceMeasurer::default: 22px lines, Tiny at 0.75
    assert_eq!(heights, vec![22, 0, 17, 17]);
    assert_eq!(report["total_height"], 22 + 17 + 17 + 17);
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["/definitely/not/here.txt"]);
    assert!(!output.status.success());
}
