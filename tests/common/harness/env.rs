//! Isolated test environment with temp directory.

use super::{NeuronCommand, TestNote};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary zettelkasten directory.
///
/// Creates a temp directory that is automatically cleaned up on drop. The
/// zettels live in `zk/` and a private config home in `config/`, so the
/// user's own configuration never leaks into a test.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the zettelkasten directory
    notes_dir: PathBuf,
    /// Value for `XDG_CONFIG_HOME`
    config_home: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let notes_dir = temp_dir.path().join("zk");
        let config_home = temp_dir.path().join("config");
        std::fs::create_dir_all(&notes_dir).expect("Failed to create notes directory");
        std::fs::create_dir_all(&config_home).expect("Failed to create config directory");
        Self {
            _temp_dir: temp_dir,
            notes_dir,
            config_home,
        }
    }

    /// Returns the path to the zettelkasten directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Adds a test zettel to the environment and returns its path.
    pub fn add_note(&self, test_note: &TestNote) -> PathBuf {
        self.write_file(&test_note.filename(), &test_note.to_markdown())
    }

    /// Writes `~/.config/neuron/config.toml` for this environment.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let dir = self.config_home.join("neuron");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Creates a NeuronCommand configured for this test environment.
    pub fn cmd(&self) -> NeuronCommand {
        self.cmd_without_dir().dir(&self.notes_dir)
    }

    /// Creates a NeuronCommand that relies on config for the directory.
    pub fn cmd_without_dir(&self) -> NeuronCommand {
        NeuronCommand::new().config_home(&self.config_home)
    }

    /// Writes a file into the zettelkasten and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.notes_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Lists the markdown files in the zettelkasten, sorted.
    pub fn markdown_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.notes_dir)
            .expect("Failed to read notes directory")
            .map(|e| e.expect("Failed to read entry").path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
            .collect();
        files.sort();
        files
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuron::domain::ZettelId;
    use neuron::infra::read_note_file;

    // ===========================================
    // Phase 1: TestEnv Foundation
    // ===========================================

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.notes_dir().is_dir(), "notes directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.notes_dir().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.notes_dir().to_string_lossy());
    }

    // ===========================================
    // Phase 3: TestEnv Zettel Addition
    // ===========================================

    #[test]
    fn test_env_add_note_creates_file() {
        let env = TestEnv::new();
        let path = env.add_note(&TestNote::new("alpha").title("Alpha"));

        assert!(path.is_file(), "zettel should be a file");
        assert_eq!(env.markdown_files(), vec![path]);
    }

    #[test]
    fn test_env_add_note_parseable() {
        let env = TestEnv::new();
        let note = TestNote::new("parseable")
            .title("Parseable Zettel")
            .tag("testing/integration")
            .body("See [[other]].\n");

        let path = env.add_note(&note);
        let id: ZettelId = "parseable".parse().unwrap();
        let stored = read_note_file(&id, &path).expect("Should parse the zettel");

        assert_eq!(stored.zettel.title(), "Parseable Zettel");
        assert_eq!(stored.zettel.tags()[0].as_str(), "testing/integration");
        assert_eq!(stored.links.len(), 1);
    }
}
