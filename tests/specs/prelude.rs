//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running cairn against a scratch repository.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

// Short waits so a stuck pending row fails fast instead of hanging the suite
const CAIRN_PENDING_POLL_MS: &str = "20";
const CAIRN_PENDING_TIMEOUT_MS: &str = "500";

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // The test binary lives at target/debug/deps/specs-<hash>
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

pub fn cairn_binary() -> PathBuf {
    binary_path("cairn")
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![
                ("CAIRN_PENDING_POLL_MS".into(), CAIRN_PENDING_POLL_MS.into()),
                (
                    "CAIRN_PENDING_TIMEOUT_MS".into(),
                    CAIRN_PENDING_TIMEOUT_MS.into(),
                ),
            ],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    pub fn command(self) -> Command {
        let mut cmd = Command::new(cairn_binary());
        cmd.args(&self.args);
        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }
        // A developer's own database must never leak into a spec
        cmd.env_remove("CAIRN_DB");
        cmd.env_remove("CAIRN_LOG");
        for (key, value) in self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect exit code 1
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert_eq!(
            output.status.code(),
            Some(1),
            "expected command to fail with exit code 1\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly.
    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }
}

// =============================================================================
// Project
// =============================================================================

/// Scratch git repository with a SQLite database beside it.
///
/// Migration scripts append `<direction> <name>` to `applied.log` in the
/// project root, so specs can see exactly what ran and in which order.
pub struct Project {
    dir: tempfile::TempDir,
    db_dir: tempfile::TempDir,
}

impl Project {
    /// Create an empty git repository
    pub fn empty() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
            db_dir: tempfile::tempdir().unwrap(),
        };
        project.git(&["init", "-q"]);
        project.git(&["config", "user.name", "Spec Runner"]);
        project.git(&["config", "user.email", "specs@example.com"]);
        project.git(&["config", "commit.gpgsign", "false"]);
        project.file(".gitignore", "applied.log\n");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_url(&self) -> String {
        format!("sqlite://{}", self.db_dir.path().join("cairn.db").display())
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.path().join(path)).unwrap_or_default()
    }

    /// Write `migrations/<name>.toml` whose scripts log to `applied.log`
    pub fn migration(&self, name: &str) {
        self.file(
            format!("migrations/{}.toml", name),
            &format!(
                "up = \"echo up {name} >> ../applied.log\"\ndown = \"echo down {name} >> ../applied.log\"\n"
            ),
        );
    }

    /// Lines of `applied.log`
    pub fn applied(&self) -> Vec<String> {
        self.read("applied.log").lines().map(str::to_string).collect()
    }

    /// Run git in the project and return trimmed stdout
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .stdin(Stdio::null())
            .output()
            .expect("git should run");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Stage everything and commit, returning the new commit hash
    pub fn commit(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "--allow-empty", "--no-verify", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// cairn with `--db` pointing at this project's database
    pub fn cairn(&self) -> CliBuilder {
        CliBuilder::new()
            .pwd(self.path())
            .args(&["--db", &self.db_url()])
    }

    /// cairn without a database
    pub fn cairn_no_db(&self) -> CliBuilder {
        CliBuilder::new().pwd(self.path())
    }
}
