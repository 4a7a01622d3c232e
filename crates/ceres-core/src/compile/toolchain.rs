//! External build toolchain invocation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

use super::descriptor::DESCRIPTOR_FILE;

/// Capability interface over the external build toolchain.
///
/// Given a build directory holding a source file and a descriptor, an
/// implementation produces the compiled extension module in place. The
/// production implementation shells out to a Python interpreter; tests
/// substitute a stub.
pub trait BuildToolchain {
    /// Build the extension module named `module` inside `build_dir`.
    ///
    /// Synchronous; returns once the artifact exists in `build_dir` or the
    /// build has failed.
    fn build_extension(&self, build_dir: &Path, module: &str) -> Result<()>;
}

/// Toolchain that runs the generated descriptor through an interpreter.
#[derive(Debug, Clone)]
pub struct SetupToolchain {
    interpreter: PathBuf,
}

impl SetupToolchain {
    /// Locate the interpreter on PATH.
    pub fn discover() -> Result<Self> {
        let interpreter = which::which("python3")
            .or_else(|_| which::which("python"))
            .map_err(|e| Error::Toolchain(format!("no python interpreter on PATH: {}", e)))?;
        Ok(Self { interpreter })
    }

    /// Use a specific interpreter binary.
    pub fn with_interpreter(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }
}

impl BuildToolchain for SetupToolchain {
    fn build_extension(&self, build_dir: &Path, module: &str) -> Result<()> {
        // The descriptor expects to run from the directory holding the
        // source file; scope the switch to the child process rather than
        // moving the host process.
        let output = Command::new(&self.interpreter)
            .current_dir(build_dir)
            .args([DESCRIPTOR_FILE, "build_ext", "--inplace"])
            .output()
            .map_err(|e| {
                Error::Toolchain(format!(
                    "failed to run {} (working dir: {}): {}",
                    self.interpreter.display(),
                    build_dir.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Build {
                module: Some(module.to_string()),
                message: stderr.into_owned(),
            });
        }

        Ok(())
    }
}
