//! Notebook document model.
//!
//! A notebook is an ordered sequence of [`Cell`]s plus a metadata mapping.
//! The pipeline owns no notebook state of its own: callers pass a document
//! in, stages mutate it in place, and the same document flows out.

mod cell;
mod resources;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub use cell::{Cell, CellKind, CellMetadata, GradingMeta};
pub use resources::Resources;

/// Kernel the notebook executes under when no kernelspec is recorded.
pub const DEFAULT_KERNEL: &str = "python";

/// A notebook document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    #[serde(default)]
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub metadata: NotebookMetadata,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Notebook-level metadata. Only the kernel identity is modeled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpec>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Kernel identity from the notebook metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpec {
    pub name: String,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Notebook {
    /// Create an empty notebook with no kernelspec.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            metadata: NotebookMetadata::default(),
            rest: Map::new(),
        }
    }

    /// Parse a notebook from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Notebook(e.to_string()))
    }

    /// Serialize the notebook to JSON text.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Notebook(e.to_string()))
    }

    /// Read a notebook document from a file.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Notebook(format!("{}: {}", path.display(), e)))
    }

    /// Write the notebook document to a file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    /// Name of the kernel this notebook executes under.
    ///
    /// Falls back to [`DEFAULT_KERNEL`] when the document records none.
    pub fn kernel_name(&self) -> &str {
        self.metadata
            .kernelspec
            .as_ref()
            .map(|k| k.name.as_str())
            .unwrap_or(DEFAULT_KERNEL)
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}
