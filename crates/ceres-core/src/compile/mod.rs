//! Compilation pipeline for extracted hidden blocks.
//!
//! This module provides:
//! - Build descriptor generation (one extension target per notebook)
//! - Toolchain invocation (isolated, synchronous, per-build temp directory)
//! - Artifact publication into the assignment's release package
//!
//! # Architecture
//!
//! ```text
//! HiddenBlockBuffer
//!     │
//!     ├── <module>.py + setup.py ──► ephemeral build dir
//!     │                                   │
//!     │                                   └── BuildToolchain ──► <module>.so
//!     │                                                               │
//!     └────────────────────── release/<assignment>/tests/<module>.so ◄┘
//! ```

mod builder;
mod descriptor;
mod toolchain;

pub use builder::{import_line, normalize_module_name, TestModuleCompiler};
pub use descriptor::{generate_build_descriptor, DESCRIPTOR_FILE};
pub use toolchain::{BuildToolchain, SetupToolchain};
