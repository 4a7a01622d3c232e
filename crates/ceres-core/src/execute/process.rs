//! Process-backed execution engine.
//!
//! Drives the external notebook executor as a child process: the document is
//! written to a scratch file, executed in place, and read back with its
//! outputs populated.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{EngineError, Error, Result};
use crate::notebook::{Notebook, Resources};

use super::engine::{ExecuteOptions, ExecutionEngine};

/// Engine that shells out to `jupyter nbconvert --execute`.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    executor: PathBuf,
}

impl ProcessEngine {
    /// Locate the executor on PATH.
    pub fn discover() -> Result<Self> {
        let executor = which::which("jupyter")
            .map_err(|e| Error::Toolchain(format!("no notebook executor on PATH: {}", e)))?;
        Ok(Self { executor })
    }

    /// Use a specific executor binary.
    pub fn with_executor(executor: impl Into<PathBuf>) -> Self {
        Self {
            executor: executor.into(),
        }
    }

    /// Command-line arguments for one execution attempt.
    fn build_args(notebook_path: &Path, options: &ExecuteOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "nbconvert".into(),
            "--to".into(),
            "notebook".into(),
            "--execute".into(),
            "--inplace".into(),
        ];

        if options.allow_errors {
            args.push("--allow-errors".into());
        }
        if options.interrupt_on_timeout {
            args.push("--ExecutePreprocessor.interrupt_on_timeout=True".into());
        }
        if options.raise_on_engine_timeout {
            args.push("--ExecutePreprocessor.raise_on_iopub_timeout=True".into());
        }
        if let Some(timeout) = options.timeout {
            args.push(format!("--ExecutePreprocessor.timeout={}", timeout.as_secs()).into());
        }
        for extra in &options.extra_arguments {
            args.push(format!("--ExecutePreprocessor.extra_arguments={}", extra).into());
        }

        args.push(notebook_path.into());
        args
    }
}

impl ExecutionEngine for ProcessEngine {
    fn execute(
        &self,
        notebook: &mut Notebook,
        _resources: &Resources,
        options: &ExecuteOptions,
    ) -> std::result::Result<(), EngineError> {
        let scratch = tempfile::Builder::new().prefix("ceres-exec-").tempdir()?;
        let path = scratch.path().join("notebook.ipynb");

        let json = serde_json::to_string(notebook).map_err(|e| EngineError::Output(e.to_string()))?;
        std::fs::write(&path, json)?;

        let output = Command::new(&self.executor)
            .args(Self::build_args(&path, options))
            .output()?;

        if !output.status.success() {
            return Err(EngineError::Fatal {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let executed = std::fs::read_to_string(&path)?;
        *notebook =
            serde_json::from_str(&executed).map_err(|e| EngineError::Output(e.to_string()))?;

        Ok(())
    }
}
