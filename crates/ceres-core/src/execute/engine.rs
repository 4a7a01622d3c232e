//! Execution engine capability interface.

use std::time::Duration;

use crate::error::EngineError;
use crate::notebook::{Notebook, Resources};

/// Configuration handed to the engine for one execution attempt.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Interrupt a cell that exceeds [`ExecuteOptions::timeout`] instead of
    /// waiting forever.
    pub interrupt_on_timeout: bool,

    /// Keep executing past per-cell errors. Grading inspects failed cells
    /// afterwards, so a broken cell must not abort the run.
    pub allow_errors: bool,

    /// Raise an engine-level error on an engine-communication timeout
    /// rather than hanging silently.
    pub raise_on_engine_timeout: bool,

    /// Per-cell execution timeout.
    pub timeout: Option<Duration>,

    /// Extra startup arguments for the kernel.
    pub extra_arguments: Vec<String>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            interrupt_on_timeout: true,
            allow_errors: true,
            raise_on_engine_timeout: true,
            timeout: None,
            extra_arguments: Vec::new(),
        }
    }
}

/// Capability interface over the black-box notebook execution engine.
///
/// One call executes one notebook: cell outputs are populated in place.
/// An [`EngineError`] means the engine itself failed (startup race,
/// communication timeout, crash) as opposed to a cell raising — the caller
/// may retry the whole attempt. Implementations block until done.
pub trait ExecutionEngine {
    fn execute(
        &self,
        notebook: &mut Notebook,
        resources: &Resources,
        options: &ExecuteOptions,
    ) -> std::result::Result<(), EngineError>;
}
