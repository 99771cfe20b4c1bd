//! Test environment builder for isolated ldapsync testing.
//!
//! Provides `TestEnv` - a temp directory holding a config file, directory
//! snapshots and the user store, plus helpers to run the ldapsync CLI
//! against it.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use ldapsync::infrastructure::{StoredUser, TomlUserStore};
use tempfile::TempDir;

/// Result of running an ldapsync CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// stdout parsed as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l).unwrap_or_else(|e| panic!("bad NDJSON line {l:?}: {e}"))
            })
            .collect()
    }
}

/// Isolated test environment with a temp directory.
pub struct TestEnv {
    pub root: TempDir,
    home: TempDir,
}

impl TestEnv {
    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::new()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Run ldapsync from the environment root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run ldapsync from the environment root with extra env vars
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_ldapsync"));
        cmd.current_dir(self.root.path())
            .args(args)
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("LDAPSYNC_MECHANISM")
            .env_remove("LDAPSYNC_ABORT_ON_DOMAIN_ERROR")
            .env_remove("LDAPSYNC_EXCLUDED_USERNAMES")
            .env_remove("LDAPSYNC_DRY_RUN");

        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute ldapsync");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Write a file below the environment root
    pub fn write_file(&self, relative_path: &str, content: &str) {
        write_file(self.root.path(), relative_path, content);
    }

    /// Records of the user store
    pub fn store_records(&self) -> Vec<StoredUser> {
        TomlUserStore::new(self.path("users.toml"))
            .records()
            .expect("Failed to read user store")
    }

    pub fn store_record(&self, name: &str) -> StoredUser {
        self.store_records()
            .into_iter()
            .find(|u| u.name.eq_ignore_ascii_case(name))
            .unwrap_or_else(|| panic!("no stored user named {name}"))
    }

    pub fn store_contents(&self) -> String {
        std::fs::read_to_string(self.path("users.toml")).unwrap_or_default()
    }
}

fn write_file(root: &Path, relative_path: &str, content: &str) {
    let full_path = root.join(relative_path);
    if let Some(parent) = full_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(&full_path, content).expect("Failed to write file");
}

/// Builder for TestEnv with fluent API
pub struct TestEnvBuilder {
    config: Option<String>,
    files: Vec<(String, String)>,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            files: Vec::new(),
        }
    }

    /// Content of `ldapsync.toml`
    pub fn with_config(mut self, toml: &str) -> Self {
        self.config = Some(toml.to_string());
        self
    }

    /// Directory snapshot (or any other file) below the root
    pub fn with_file(mut self, name: &str, content: &str) -> Self {
        self.files.push((name.to_string(), content.to_string()));
        self
    }

    /// Pre-existing user store
    pub fn with_store(self, toml: &str) -> Self {
        self.with_file("users.toml", toml)
    }

    pub fn build(self) -> TestEnv {
        let root = TempDir::new().expect("Failed to create temp dir");
        let home = TempDir::new().expect("Failed to create home temp dir");

        if let Some(config) = &self.config {
            write_file(root.path(), "ldapsync.toml", config);
        }
        for (name, content) in &self.files {
            write_file(root.path(), name, content);
        }

        TestEnv { root, home }
    }
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}
