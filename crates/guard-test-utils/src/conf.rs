//! [`ConfDir`] fixture for syno-guard test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary root holding a `conf/` directory (the watched directory) and
/// a `backups/` directory (where backup artifacts land).
///
/// # Example
///
/// ```rust,no_run
/// use guard_test_utils::ConfDir;
///
/// let conf = ConfDir::new();
/// conf.write("blacklist.filter", "[Common]\n");
/// assert_eq!(conf.read("blacklist.filter"), "[Common]\n");
/// ```
pub struct ConfDir {
    temp_dir: TempDir,
}

impl Default for ConfDir {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfDir {
    /// Create the temporary root with empty `conf/` and `backups/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("conf")).unwrap();
        fs::create_dir_all(temp_dir.path().join("backups")).unwrap();
        Self { temp_dir }
    }

    /// The temporary root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The watched configuration directory.
    pub fn path(&self) -> PathBuf {
        self.root().join("conf")
    }

    /// Directory for backup artifacts.
    pub fn backup_dir(&self) -> PathBuf {
        self.root().join("backups")
    }

    /// Path of `name` inside the configuration directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    /// Write `content` to `name` inside the configuration directory.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.file(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Read `name` from the configuration directory.
    ///
    /// Panics if the file does not exist.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name))
            .unwrap_or_else(|e| panic!("ConfDir::read: {name}: {e}"))
    }

    /// Names of the `.backup` files in the backup directory, sorted.
    pub fn backups(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.backup_dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".backup"))
            .collect();
        names.sort();
        names
    }
}
