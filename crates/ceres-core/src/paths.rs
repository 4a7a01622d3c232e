//! Release directory management.
//!
//! Compiled test modules for an assignment are published into a shared
//! package directory:
//!
//! ```text
//! release/
//! └── <assignment_id>/
//!     └── tests/
//!         ├── __init__.py      # package marker, created once
//!         └── <notebook>.so    # one compiled module per notebook
//! ```

use std::fs;
use std::path::PathBuf;

use crate::error::Result;

/// Package marker file that makes the tests directory importable.
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Layout of the release tree compiled test modules are published into.
#[derive(Debug, Clone)]
pub struct ReleaseLayout {
    root: PathBuf,
}

impl ReleaseLayout {
    /// Layout rooted at the given course directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at the process working directory.
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    /// Package directory for an assignment's compiled test modules.
    pub fn tests_dir(&self, assignment_id: &str) -> PathBuf {
        self.root.join("release").join(assignment_id).join("tests")
    }

    /// Ensure the assignment's package directory exists and is importable.
    ///
    /// Creates the directory tree and an empty package marker. The marker is
    /// only written when absent, so successive notebook builds accumulate
    /// into the same package without clobbering it.
    pub fn ensure_tests_package(&self, assignment_id: &str) -> Result<PathBuf> {
        let dir = self.tests_dir(assignment_id);
        fs::create_dir_all(&dir)?;

        let marker = dir.join(PACKAGE_MARKER);
        if !marker.exists() {
            fs::write(&marker, "")?;
        }

        Ok(dir)
    }
}

/// Portable filename for a compiled test module.
pub fn artifact_name(module: &str) -> String {
    format!("{}.{}", module, artifact_extension())
}

/// Platform-specific extension of a loadable extension module.
pub fn artifact_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "pyd"
    }
    #[cfg(not(target_os = "windows"))]
    {
        "so"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_tests_dir_layout() {
        let layout = ReleaseLayout::new("/course");
        assert_eq!(
            layout.tests_dir("ps1"),
            Path::new("/course/release/ps1/tests")
        );
    }

    #[test]
    fn test_ensure_creates_dir_and_marker() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = ReleaseLayout::new(temp.path());

        let dir = layout.ensure_tests_package("ps1").expect("ensure failed");
        assert!(dir.exists());
        assert!(dir.join(PACKAGE_MARKER).exists());
    }

    #[test]
    fn test_marker_written_only_once() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = ReleaseLayout::new(temp.path());

        let dir = layout.ensure_tests_package("ps1").expect("ensure failed");
        let marker = dir.join(PACKAGE_MARKER);
        fs::write(&marker, "# touched by another build").expect("write failed");

        layout.ensure_tests_package("ps1").expect("ensure failed");
        let content = fs::read_to_string(&marker).expect("read failed");
        assert_eq!(content, "# touched by another build");
    }

    #[test]
    fn test_artifact_name() {
        #[cfg(not(target_os = "windows"))]
        assert_eq!(artifact_name("problem1"), "problem1.so");
        #[cfg(target_os = "windows")]
        assert_eq!(artifact_name("problem1"), "problem1.pyd");
    }
}
