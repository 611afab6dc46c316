//! End-to-end tests for the `kbload` binary.

mod common;

use common::{Workspace, kbload_cmd};
use kbload_storage::Storage;
use predicates::prelude::*;

#[test]
fn help_goes_to_stderr_and_exits_zero() {
    let ws = Workspace::new();
    for flag in ["-h", "--help"] {
        kbload_cmd(ws.home())
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Usage:"))
            .stderr(predicate::str::contains("--description"));
    }
    assert!(!ws.db().exists());
}

#[test]
fn version_goes_to_stderr_and_exits_zero() {
    let ws = Workspace::new();
    for flag in ["-V", "--version"] {
        kbload_cmd(ws.home())
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
    assert!(!ws.db().exists());
}

#[test]
fn missing_arguments_exit_one() {
    let ws = Workspace::new();
    ws.cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Missing kb-file or kb-name"))
        .stderr(predicate::str::contains("Usage:"));

    let file = ws.source("kb.txt", "A---B\n");
    ws.cmd()
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing kb-file or kb-name"));
}

#[test]
fn nonexistent_file_exits_one_without_touching_storage() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["/nonexistent/kbload/source.txt", "sample"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Path to non-existing file"))
        .stderr(predicate::str::contains("Usage:"));
    assert!(!ws.db().exists());
}

#[test]
fn unknown_option_exits_two() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\n");
    ws.cmd()
        .arg(&file)
        .arg("sample")
        .arg("--bogus")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--bogus"));
    assert!(!ws.db().exists());
}

#[test]
fn loads_pairs_and_prints_summary() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\nC---D\n");
    ws.cmd()
        .arg(&file)
        .arg("sample")
        .assert()
        .success()
        .stdout("Added 2 entries to sample\n");
    assert!(ws.db().exists());
}

#[test]
fn whitespace_and_blank_lines_are_tolerated() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", " A --- B \n\n   \nC---D\n");
    ws.cmd()
        .arg(&file)
        .arg("  sample  ")
        .assert()
        .success()
        .stdout("Added 2 entries to sample\n");
}

#[test]
fn malformed_lines_are_reported_and_skipped() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---\nK---V\nx---y---z\n");
    ws.cmd()
        .arg(&file)
        .arg("kb")
        .assert()
        .success()
        .stdout("Added 1 entries to kb\n")
        .stderr(predicate::str::contains("line 1"))
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn reload_with_description_updates_existing_kb() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\n");

    ws.cmd()
        .arg(&file)
        .arg("sample")
        .arg("-d")
        .arg("first load")
        .assert()
        .success()
        .stdout("Added 1 entries to sample\n");

    ws.cmd()
        .arg(&file)
        .arg("sample")
        .arg("--description=second load")
        .assert()
        .success()
        .stdout("Added 1 entries to sample\n");

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let storage = Storage::open(&ws.db()).await.expect("open db");
        let kb = storage
            .get_kb("sample")
            .await
            .expect("query kb")
            .expect("kb exists");
        assert_eq!(kb.description, "second load");
        assert_eq!(storage.count_mappings("sample").await.unwrap(), 2);
    });
}

#[test]
fn database_path_from_environment() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\n");
    let db = ws.home().join("env.db");

    kbload_cmd(ws.home())
        .env("KBLOAD_DB", &db)
        .arg(&file)
        .arg("sample")
        .assert()
        .success()
        .stdout("Added 1 entries to sample\n");
    assert!(db.exists());
}

#[test]
fn config_file_sets_database_and_delimiter() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A | B\nC | D\nE---F\n");
    let db = ws.home().join("configured.db");
    let config = ws.source(
        "kbload.toml",
        &format!(
            "[database]\npath = {:?}\n\n[loader]\ndelimiter = \"|\"\n",
            db.to_string_lossy()
        ),
    );

    kbload_cmd(ws.home())
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .arg("piped")
        .assert()
        .success()
        .stdout("Added 2 entries to piped\n")
        .stderr(predicate::str::contains("line 3"));
    assert!(db.exists());
}

#[test]
fn db_flag_overrides_empty_configured_path() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\n");
    let config = ws.source("kbload.toml", "[database]\npath = \"\"\n");

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .arg("sample")
        .assert()
        .success()
        .stdout("Added 1 entries to sample\n");
    assert!(ws.db().exists());

    kbload_cmd(ws.home())
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .arg("sample")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("database.path"));
}

#[test]
fn invalid_config_fails() {
    let ws = Workspace::new();
    let file = ws.source("kb.txt", "A---B\n");
    let config = ws.source("kbload.toml", "[loader]\ndelimiter = \"\"\n");

    kbload_cmd(ws.home())
        .arg("--config")
        .arg(&config)
        .arg(&file)
        .arg("kb")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("delimiter"));
}
