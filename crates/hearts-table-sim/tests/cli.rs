use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn write_config(dir: &std::path::Path, run_id: &str) -> std::path::PathBuf {
    let path = dir.join("sim.yaml");
    let yaml = format!(
        r#"
run_id: "{run_id}"
games:
  seed: 5
  count: 2
outputs:
  jsonl: "{out}/{{run_id}}/games.jsonl"
  summary_md: "{out}/{{run_id}}/summary.md"
"#,
        out = dir.join("out").display(),
    );
    fs::write(&path, yaml).expect("write config");
    path
}

#[test]
fn validate_only_skips_the_run() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "cli_check");

    Command::cargo_bin("hearts-table-sim")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation-only mode"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn run_writes_outputs_under_overridden_run_id() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "cli_check");

    Command::cargo_bin("hearts-table-sim")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .args(["--run-id", "renamed", "--games", "1", "--seed", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation complete for 'renamed': 1 games"));

    let jsonl = fs::read_to_string(dir.path().join("out/renamed/games.jsonl")).expect("jsonl");
    assert_eq!(jsonl.lines().count(), 1);
    assert!(dir.path().join("out/renamed/summary.md").exists());
}

#[test]
fn invalid_run_id_is_rejected() {
    let dir = tempdir().expect("temp dir");
    let config = write_config(dir.path(), "cli_check");

    Command::cargo_bin("hearts-table-sim")
        .expect("binary built")
        .arg("--config")
        .arg(&config)
        .args(["--run-id", "bad id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run_id"));
}
