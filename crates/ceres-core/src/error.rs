//! Error types for ceres-core.

use thiserror::Error;

/// Result type for ceres-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ceres-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A begin delimiter was found inside an already open hidden block.
    #[error("nested hidden-block begin delimiter in cell {cell}")]
    NestedBlock { cell: usize },

    /// A cell ended while a hidden block was still open.
    #[error("hidden block in cell {cell} has no end delimiter")]
    UnterminatedBlock { cell: usize },

    /// The external build toolchain failed.
    #[error("test module build failed{}: {message}", module.as_ref().map(|m| format!(" for {}", m)).unwrap_or_default())]
    Build {
        module: Option<String>,
        message: String,
    },

    /// A required external tool could not be located.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// The execution engine kept failing after the retry budget ran out.
    #[error("execution engine unresponsive after {attempts} attempts")]
    UnresponsiveExecution {
        attempts: u32,
        #[source]
        source: EngineError,
    },

    /// Failed to read or write a notebook document.
    #[error("notebook error: {0}")]
    Notebook(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Engine-level failures raised by the notebook execution engine.
///
/// These abort a whole execution attempt and are the only class of error the
/// harness retries. Errors raised by individual cells are tolerated by the
/// engine configuration and never surface here.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine process exited unsuccessfully.
    #[error("execution engine exited with {status}: {stderr}")]
    Fatal { status: i32, stderr: String },

    /// The engine succeeded but returned an unreadable document.
    #[error("execution engine produced an unreadable notebook: {0}")]
    Output(String),

    /// IO error while talking to the engine.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
