//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility shared by several test crates
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Fluent wrapper around `assert_cmd::Command` for the `neuron` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct NeuronCommand {
    args: Vec<String>,
    config_home: Option<PathBuf>,
}

impl NeuronCommand {
    /// Creates a new command for the `neuron` binary.
    pub fn new() -> Self {
        Self {
            args: Vec::new(),
            config_home: None,
        }
    }

    /// Sets the `--dir` option to specify the zettelkasten directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Points `XDG_CONFIG_HOME` at `path` so the user's config is never read.
    pub fn config_home(mut self, path: &Path) -> Self {
        self.config_home = Some(path.to_path_buf());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("neuron").expect("Failed to find neuron binary");
        cmd.env_remove("RUST_LOG");
        if let Some(home) = &self.config_home {
            cmd.env("XDG_CONFIG_HOME", home);
        }
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `query` command with a link.
    pub fn query(self, link: &str) -> Self {
        self.args(["query", link])
    }

    /// Configures for the `search` command.
    pub fn search(self) -> Self {
        self.args(["search"])
    }

    /// Configures for the `backlinks` command with an ID.
    pub fn backlinks(self, id: &str) -> Self {
        self.args(["backlinks", id])
    }

    /// Configures for the `uplinks` command with an ID.
    pub fn uplinks(self, id: &str) -> Self {
        self.args(["uplinks", id])
    }

    /// Configures for the `graph` command.
    pub fn graph(self) -> Self {
        self.args(["graph"])
    }

    /// Configures for the `check` command.
    pub fn check(self) -> Self {
        self.args(["check"])
    }

    /// Configures for the `new` command.
    pub fn new_zettel(self) -> Self {
        self.args(["new"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for NeuronCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ===========================================
    // Phase 5: NeuronCommand Basics
    // ===========================================

    #[test]
    fn test_command_runs_binary() {
        NeuronCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_dir() {
        let temp = TempDir::new().unwrap();
        let cmd = NeuronCommand::new().dir(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = NeuronCommand::new().args(["--help"]).output_success();
        assert!(output.contains("neuron") || output.contains("zettel"));
    }

    #[test]
    fn test_command_shortcuts_append_args() {
        let cmd = NeuronCommand::new().backlinks("abc").format_json();
        assert_eq!(cmd.get_args(), ["backlinks", "abc", "--format", "json"]);
    }
}
