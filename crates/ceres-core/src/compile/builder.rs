//! Test module compiler.
//!
//! Turns the hidden-block buffer collected from one notebook into a
//! loadable native module published under the assignment's release package.

use std::fs;
use std::path::PathBuf;

use crate::error::Result;
use crate::extract::HiddenBlockBuffer;
use crate::notebook::Resources;
use crate::paths::{artifact_name, ReleaseLayout};

use super::descriptor::{generate_build_descriptor, DESCRIPTOR_FILE};
use super::toolchain::BuildToolchain;

/// Normalize a notebook id into a safe module name.
///
/// Applied consistently wherever the id becomes a filesystem or import name,
/// so the published artifact and the injected import always agree.
pub fn normalize_module_name(notebook_id: &str) -> String {
    notebook_id.to_lowercase().replace(' ', "_")
}

/// Import statement that puts the compiled module's symbols in scope.
pub fn import_line(module: &str) -> String {
    format!("from tests.{} import *", module)
}

/// Compiles extracted hidden-block source into a published test module.
pub struct TestModuleCompiler<T> {
    toolchain: T,
    layout: ReleaseLayout,
}

impl<T: BuildToolchain> TestModuleCompiler<T> {
    pub fn new(toolchain: T, layout: ReleaseLayout) -> Self {
        Self { toolchain, layout }
    }

    /// Build and publish the test module for one notebook.
    ///
    /// Materializes the buffered source into a fresh temporary directory,
    /// generates the build descriptor next to it, invokes the toolchain
    /// synchronously, and copies the artifact into
    /// `release/<assignment_id>/tests/`. A stale artifact at the destination
    /// is overwritten. Returns the published artifact path.
    ///
    /// # Errors
    ///
    /// Toolchain failures propagate as [`crate::Error::Build`] and are never
    /// retried; the ephemeral directory may be left behind in that case.
    pub fn compile(&self, buffer: &HiddenBlockBuffer, resources: &Resources) -> Result<PathBuf> {
        let module = normalize_module_name(&resources.notebook_id);
        let source_file = format!("{}.py", module);

        // Isolated per-build workspace so successive or interleaved builds
        // cannot clobber each other's intermediates.
        let build_dir = tempfile::Builder::new()
            .prefix("ceres-build-")
            .tempdir()?;

        fs::write(build_dir.path().join(&source_file), buffer.to_source())?;
        fs::write(
            build_dir.path().join(DESCRIPTOR_FILE),
            generate_build_descriptor(&module, &source_file),
        )?;

        tracing::info!(
            module = %module,
            assignment = %resources.assignment_id,
            lines = buffer.len(),
            "building test module"
        );
        self.toolchain.build_extension(build_dir.path(), &module)?;

        let artifact = artifact_name(&module);
        let built = build_dir.path().join(&artifact);

        let package_dir = self.layout.ensure_tests_package(&resources.assignment_id)?;
        let published = package_dir.join(&artifact);
        fs::copy(&built, &published)?;

        if let Err(e) = build_dir.close() {
            tracing::warn!("failed to remove build directory: {}", e);
        }

        tracing::info!(artifact = %published.display(), "test module published");
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::error::Error;
    use crate::extract::HiddenBlockExtractor;
    use crate::paths::PACKAGE_MARKER;

    /// Toolchain stub that fakes the artifact instead of compiling.
    struct StubToolchain;

    impl BuildToolchain for StubToolchain {
        fn build_extension(&self, build_dir: &Path, module: &str) -> Result<()> {
            // The real toolchain requires both inputs in place; assert the
            // compiler materialized them.
            assert!(build_dir.join(format!("{}.py", module)).exists());
            assert!(build_dir.join(DESCRIPTOR_FILE).exists());
            fs::write(build_dir.join(artifact_name(module)), b"\x7fELF-stub")?;
            Ok(())
        }
    }

    struct FailingToolchain;

    impl BuildToolchain for FailingToolchain {
        fn build_extension(&self, _build_dir: &Path, module: &str) -> Result<()> {
            Err(Error::Build {
                module: Some(module.to_string()),
                message: "undeclared name not builtin: bar".to_string(),
            })
        }
    }

    fn buffer_from(source: &str) -> HiddenBlockBuffer {
        let mut buffer = HiddenBlockBuffer::default();
        HiddenBlockExtractor::default()
            .scan_cell(0, source, &mut buffer)
            .unwrap();
        buffer
    }

    #[test]
    fn test_normalize_module_name() {
        assert_eq!(normalize_module_name("problem1"), "problem1");
        assert_eq!(normalize_module_name("Problem 1"), "problem_1");
        assert_eq!(normalize_module_name("Unit 2 Review"), "unit_2_review");
    }

    #[test]
    fn test_import_line() {
        assert_eq!(import_line("problem1"), "from tests.problem1 import *");
    }

    #[test]
    fn test_compile_publishes_artifact() {
        let course = TempDir::new().expect("Failed to create temp dir");
        let compiler = TestModuleCompiler::new(StubToolchain, ReleaseLayout::new(course.path()));

        let buffer = buffer_from("BEGIN HIDDEN BLOCK\ndef test_bar():\n    pass\nEND HIDDEN BLOCK");
        let resources = Resources::new("ps1", "problem1");

        let published = compiler.compile(&buffer, &resources).expect("compile failed");

        assert_eq!(
            published,
            course
                .path()
                .join("release/ps1/tests")
                .join(artifact_name("problem1"))
        );
        assert!(published.exists());
        assert!(published.with_file_name(PACKAGE_MARKER).exists());
    }

    #[test]
    fn test_recompile_overwrites_artifact() {
        let course = TempDir::new().expect("Failed to create temp dir");
        let compiler = TestModuleCompiler::new(StubToolchain, ReleaseLayout::new(course.path()));
        let resources = Resources::new("ps1", "problem1");

        let first = compiler
            .compile(&buffer_from("BEGIN HIDDEN BLOCK\na = 1\nEND HIDDEN BLOCK"), &resources)
            .unwrap();
        let second = compiler
            .compile(&buffer_from("BEGIN HIDDEN BLOCK\na = 2\nEND HIDDEN BLOCK"), &resources)
            .unwrap();

        assert_eq!(first, second);
        let entries: Vec<_> = fs::read_dir(first.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        // Marker plus exactly one artifact, no duplicates.
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_module_name_normalized_everywhere() {
        let course = TempDir::new().expect("Failed to create temp dir");
        let compiler = TestModuleCompiler::new(StubToolchain, ReleaseLayout::new(course.path()));

        let buffer = buffer_from("BEGIN HIDDEN BLOCK\nx = 1\nEND HIDDEN BLOCK");
        let resources = Resources::new("ps1", "Problem 1");

        let published = compiler.compile(&buffer, &resources).unwrap();
        assert!(published.ends_with(artifact_name("problem_1")));
    }

    #[test]
    fn test_build_failure_propagates() {
        let course = TempDir::new().expect("Failed to create temp dir");
        let compiler =
            TestModuleCompiler::new(FailingToolchain, ReleaseLayout::new(course.path()));

        let buffer = buffer_from("BEGIN HIDDEN BLOCK\nbad\nEND HIDDEN BLOCK");
        let err = compiler
            .compile(&buffer, &Resources::new("ps1", "problem1"))
            .unwrap_err();

        assert!(matches!(err, Error::Build { .. }));
        // Nothing published on failure.
        assert!(!course.path().join("release").exists());
    }
}
