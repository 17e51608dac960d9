//! Isolated sets root and CLI runner.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::NaiveDate;
use ledgerpack::domain::value_objects::parse_date;
use tempfile::TempDir;

use super::fixtures::*;

/// Result of running a ledgerpack CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// stdout parsed as NDJSON events.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON: {l}: {e}")))
            .collect()
    }
}

/// A temp directory laid out as `<root>/sets/<set>/...`.
pub struct SetsFixture {
    dir: TempDir,
}

impl SetsFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Fixture with the ACME set (three files) and the wildcard set.
    pub fn standard() -> Self {
        let fixture = Self::new();
        fixture.write("acme/root.yaml", ACME_ROOT);
        fixture.write("acme/policies/budget.yaml", ACME_BUDGET_POLICIES);
        fixture.write("acme/policies/expense.yaml", ACME_EXPENSE_POLICIES);
        fixture.write("shared/root.yaml", SHARED_ROOT);
        fixture
    }

    /// Working directory for CLI runs.
    pub fn project_root(&self) -> &Path {
        self.dir.path()
    }

    pub fn sets_root(&self) -> PathBuf {
        self.dir.path().join("sets")
    }

    pub fn set_dir(&self, name: &str) -> PathBuf {
        self.sets_root().join(name)
    }

    /// Write a file relative to the sets root.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.sets_root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.sets_root().join(relative)).unwrap()
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.sets_root().join(relative)).unwrap();
    }

    /// Run the binary with the fixture as working directory and an empty
    /// user config directory.
    pub fn run(&self, args: &[&str]) -> TestResult {
        let home = self.dir.path().join(".home");
        fs::create_dir_all(&home).unwrap();
        let output = Command::new(env!("CARGO_BIN_EXE_ledgerpack"))
            .current_dir(self.dir.path())
            .args(args)
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("LEDGERPACK_LOG", "warn")
            .env("LEDGERPACK_LOG_FORMAT", "pretty")
            .env_remove("LEDGERPACK_SETS_ROOT")
            .env_remove("LEDGERPACK_ALLOW_DRAFTS")
            .output()
            .unwrap();
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}
