//! Shared test utilities for kbload CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get a Command for the kbload binary, isolated from the user's
/// home directory, config, and environment overrides.
///
/// # Panics
///
/// Panics if the kbload binary cannot be found.
#[allow(deprecated)]
pub fn kbload_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kbload").expect("kbload binary should exist");
    cmd.env("HOME", home)
        .env_remove("KBLOAD_DB")
        .env_remove("RUST_LOG");
    cmd
}

/// Scratch directory holding a fake home, the database, and source files.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    pub fn db(&self) -> PathBuf {
        self.dir.path().join("db").join("kb.db")
    }

    /// Write a source file and return its path.
    pub fn source(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write source file");
        path
    }

    /// Command preloaded with `--db` pointing into this workspace.
    pub fn cmd(&self) -> Command {
        let mut cmd = kbload_cmd(self.home());
        cmd.arg("--db").arg(self.db());
        cmd
    }
}
