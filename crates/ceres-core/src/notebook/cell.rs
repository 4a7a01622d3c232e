//! Cell records of the notebook document tree.
//!
//! The model is typed where the pipeline needs structure (cell kind, grading
//! metadata, source text) and opaque everywhere else: unknown fields are
//! collected into flattened maps so documents round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
    /// Any cell type this pipeline does not model.
    #[serde(other)]
    Other,
}

/// One cell of a notebook.
///
/// Identity is positional: a cell is addressed by its index in the notebook's
/// cell sequence. The extractor mutates `source` in place; everything the
/// pipeline does not touch (outputs, execution counts, attachments) rides
/// along in `rest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "cell_type")]
    pub kind: CellKind,

    #[serde(default)]
    pub metadata: CellMetadata,

    /// Cell source text. On the wire this is either a single string or a
    /// list of lines; both forms are accepted, and the joined string is
    /// always written back.
    #[serde(with = "source_text")]
    pub source: String,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Cell {
    /// Create a code cell with the given source. Used by tests and tooling.
    pub fn code(source: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Code,
            metadata: CellMetadata::default(),
            source: source.into(),
            rest: Map::new(),
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    /// Whether this cell is flagged for automated grading.
    pub fn is_graded(&self) -> bool {
        self.metadata.grading.as_ref().is_some_and(|g| g.grade)
    }

    /// Whether this cell holds (part of) a solution.
    pub fn is_solution(&self) -> bool {
        self.metadata.grading.as_ref().is_some_and(|g| g.solution)
    }
}

/// Per-cell metadata with a typed grading section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading: Option<GradingMeta>,

    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Grading flags attached to a cell by the assignment author.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradingMeta {
    #[serde(default)]
    pub grade: bool,

    #[serde(default)]
    pub solution: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Serde codec for the string-or-list-of-lines source field.
mod source_text {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Joined(String),
        Lines(Vec<String>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Wire::deserialize(deserializer)? {
            Wire::Joined(s) => s,
            // Wire lines carry their own trailing newlines.
            Wire::Lines(lines) => lines.concat(),
        })
    }

    pub fn serialize<S>(source: &str, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(source)
    }
}
