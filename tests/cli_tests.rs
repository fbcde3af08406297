//! Integration tests for CLI

use assert_cmd::Command;
use git2::Repository;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sential() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sential"));
    cmd.env_remove("RUST_LOG").env("SENTIAL_NO_PROGRESS", "1");
    cmd
}

fn python_repo() -> TempDir {
    let dir = TempDir::new().expect("temp repo");
    Repository::init(dir.path()).expect("git init");
    let files = [
        ("README.md", "# Demo\n\nA tiny service.\n"),
        ("requirements.txt", "requests==2.32\n"),
        ("main.py", "from app.util import run\n\nrun()\n"),
        ("app/util.py", "def run():\n    return 1\n"),
        ("tests/test_util.py", "def test_run():\n    assert True\n"),
    ];
    for (path, content) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
        fs::write(full, content).expect("write");
    }
    dir
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}

#[test]
fn test_cli_version() {
    sential().arg("--version").assert().success().stdout(predicate::str::contains("sential"));
}

#[test]
fn test_cli_help() {
    sential()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("token-budgeted digest"))
        .stdout(predicate::str::contains("digest"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_digest_rejects_non_git_directory() {
    let dir = TempDir::new().expect("temp dir");
    if Repository::discover(dir.path()).is_ok() {
        return;
    }
    sential()
        .args(["digest", arg(dir.path()), "--language", "python"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a git repository"));
}

#[test]
fn test_digest_rejects_unknown_language() {
    let repo = python_repo();
    sential()
        .args(["digest", arg(repo.path()), "--language", "cobol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Selected language not supported"));
}

#[test]
fn test_digest_requires_language_when_not_interactive() {
    let repo = python_repo();
    sential()
        .args(["digest", arg(repo.path())])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pass --language"));
}

#[test]
fn test_digest_rejects_zero_batch_size() {
    let repo = python_repo();
    sential()
        .args(["digest", arg(repo.path()), "--language", "python", "--batch-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch_size"));
}

#[test]
fn test_digest_writes_payload_and_report() {
    let repo = python_repo();
    let out = TempDir::new().expect("temp out");
    let payload = out.path().join("payload.jsonl");
    let report = out.path().join("report.json");

    sential()
        .args([
            "digest",
            arg(repo.path()),
            "--language",
            "python",
            "--tokenizer",
            "estimate",
            "--output",
            arg(&payload),
            "--report",
            arg(&report),
            "--all",
            "--quiet",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("payload.jsonl"));

    let content = fs::read_to_string(&payload).expect("payload");
    let records: Vec<serde_json::Value> =
        content.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();

    assert_eq!(records[0]["path"], "README.md");
    assert_eq!(records[0]["type"], "context_file");
    assert!(records
        .iter()
        .any(|r| r["path"] == "requirements.txt" && r["type"] == "manifest_file"));
    assert!(records.iter().any(|r| r["path"] == "main.py" && r["type"] == "signal_file"));

    let last = records.last().expect("file_paths record");
    assert_eq!(last["type"], "file_paths");
    assert_eq!(last["paths"].as_array().expect("paths").len(), 5);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report")).expect("report json");
    assert_eq!(report["language"], "Python");
    assert_eq!(report["files_discovered"], 5);
    assert_eq!(report["categories"]["context"]["processed"], 1);
    assert!(report["generated_at"].is_string());
}

#[test]
fn test_digest_respects_scope() {
    let repo = python_repo();
    let out = TempDir::new().expect("temp out");
    let payload = out.path().join("payload.jsonl");

    sential()
        .args([
            "digest",
            arg(repo.path()),
            "--language",
            "python",
            "--tokenizer",
            "estimate",
            "--scope",
            "app",
            "--output",
            arg(&payload),
            "--quiet",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&payload).expect("payload");
    let last: serde_json::Value =
        serde_json::from_str(content.lines().last().expect("last line")).expect("json");
    assert_eq!(last["paths"], serde_json::json!(["app/util.py"]));
}

#[test]
fn test_info_lists_categories() {
    let repo = python_repo();
    sential()
        .args(["info", arg(repo.path()), "--language", "py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Language: Python"))
        .stdout(predicate::str::contains("Total discovered: 5"))
        .stdout(predicate::str::contains("README.md (score 1000)"))
        .stdout(predicate::str::contains("Modules:"));
}

#[test]
fn test_info_reads_language_from_config() {
    let repo = python_repo();
    fs::write(repo.path().join("sential.toml"), "language = 'python'\n").expect("write config");
    sential()
        .args(["info", arg(repo.path())])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config:"));
}

#[test]
fn test_completions_bash() {
    sential()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sential"));
}
