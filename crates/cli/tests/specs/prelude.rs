//! Shared helpers for CLI specs
//!
//! `Project` owns a temp directory of recipe and config files and builds
//! `sous` invocations rooted in it.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Two short steps: dice then boil
pub const SOUP_TOML: &str = r#"
name = "Vegetable soup"
description = "Quick weeknight soup"
total_duration_seconds = 80
servings = 2

[[ingredients]]
name = "carrot"
quantity = 2
unit = "pcs"

[[ingredients]]
name = "salt"
unit = "to taste"

[[steps]]
type = "cut"
operation = "dice"
duration_seconds = 20
speed = 6
description = "Dice the carrots"

[[steps]]
type = "temperature"
operation = "boil"
duration_seconds = 60
temperature_c = 100
"#;

pub const BREAD_JSON: &str = r#"{
  "name": "Flatbread",
  "steps": [
    {"type": "mechanical", "name": "knead", "duration_seconds": 30, "speed": 4},
    {"type": "temperature", "operation": "heat", "duration_seconds": 15, "temperature_c": 250}
  ]
}"#;

/// Timing small enough that whole recipes finish in milliseconds
pub const FAST_CONFIG: &str = r#"
step_settle = "1ms"

[simulator]
speed_multiplier = 0.0001
min_real_wait = "10ms"
min_ticks = 2
max_ticks = 5
pause_poll_interval = "1ms"
"#;

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn sous(&self) -> Sous {
        let mut cmd = Command::cargo_bin("sous").unwrap();
        cmd.current_dir(self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("SOUS_LOG");
        Sous { cmd }
    }
}

pub struct Sous {
    cmd: Command,
}

impl Sous {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Run and hand back the raw assertion for predicate checks
    pub fn assert(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert()
    }

    pub fn passes(mut self) -> Output {
        Output::from(self.cmd.assert().success())
    }

    pub fn fails(mut self) -> Output {
        Output::from(self.cmd.assert().failure())
    }
}

pub struct Output {
    stdout: String,
    stderr: String,
}

impl From<assert_cmd::assert::Assert> for Output {
    fn from(assert: assert_cmd::assert::Assert) -> Self {
        let output = assert.get_output();
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected, "stderr: {}", self.stderr);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "stdout missing {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {needle:?}:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "stderr missing {needle:?}:\n{}",
            self.stderr
        );
        self
    }
}
