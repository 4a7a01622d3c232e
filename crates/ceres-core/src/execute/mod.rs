//! Notebook execution under a constrained, retry-capable harness.
//!
//! # Architecture
//!
//! ```text
//! Notebook ──► ExecutionHarness
//!                  │  graded subset, pristine per attempt
//!                  ▼
//!            ExecutionEngine (capability trait)
//!                  │
//!                  └── ProcessEngine ──► external executor process
//! ```
//!
//! Engine-level failures (kernel startup races, communication timeouts) are
//! retried up to a configured budget; per-cell errors are tolerated by
//! configuration and flow through as cell outputs for grading.

mod engine;
mod harness;
mod process;

pub use engine::{ExecuteOptions, ExecutionEngine};
pub use harness::ExecutionHarness;
pub use process::ProcessEngine;
