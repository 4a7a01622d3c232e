//! Identifiers carried alongside a notebook through the pipeline.

use serde::{Deserialize, Serialize};

/// Side-channel identifiers for one grading pass.
///
/// The notebook document itself does not know which assignment it belongs
/// to; callers supply that context here and every stage reads from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    /// Assignment the notebook belongs to (e.g. `ps1`). Selects the
    /// destination package directory for compiled test modules.
    pub assignment_id: String,

    /// Notebook identity within the assignment (e.g. `problem1`). Names the
    /// compiled test module.
    pub notebook_id: String,
}

impl Resources {
    pub fn new(assignment_id: impl Into<String>, notebook_id: impl Into<String>) -> Self {
        Self {
            assignment_id: assignment_id.into(),
            notebook_id: notebook_id.into(),
        }
    }
}
