//! Core engine for the Ceres notebook grading pipeline.
//!
//! This crate provides:
//! - Hidden-block extraction (instructor-only code lifted out of cells)
//! - Test module compilation (extracted source → loadable native artifact)
//! - Resilient notebook execution (graded subset, bounded retries)
//!
//! The stages are independent but compose over the same notebook document:
//! extraction rewrites cell source and fills a buffer, compilation publishes
//! the buffer as an importable module, and the harness executes the graded
//! cells before grading.

pub mod compile;
pub mod error;
pub mod execute;
pub mod extract;
pub mod notebook;
pub mod paths;
pub mod pipeline;

pub use compile::{BuildToolchain, SetupToolchain, TestModuleCompiler};
pub use error::{EngineError, Error, Result};
pub use execute::{ExecuteOptions, ExecutionEngine, ExecutionHarness, ProcessEngine};
pub use extract::{Extraction, HiddenBlockBuffer, HiddenBlockExtractor};
pub use notebook::{Cell, CellKind, Notebook, Resources};
pub use paths::ReleaseLayout;
pub use pipeline::GradingPipeline;
