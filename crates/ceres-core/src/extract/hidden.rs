//! Line scanner for delimited hidden regions.

use crate::error::{Error, Result};
use crate::notebook::Notebook;

/// Default marker opening a hidden block.
pub const DEFAULT_BEGIN_DELIMITER: &str = "BEGIN HIDDEN BLOCK";

/// Default marker closing a hidden block.
pub const DEFAULT_END_DELIMITER: &str = "END HIDDEN BLOCK";

/// Ordered lines removed from one notebook's cells.
///
/// Created empty at the start of a notebook pass and owned by that pass;
/// append-only while the pass runs. Lines appear in cell order, then in-cell
/// order.
#[derive(Debug, Default)]
pub struct HiddenBlockBuffer {
    lines: Vec<String>,
}

impl HiddenBlockBuffer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Join the collected lines into a single source module.
    pub fn to_source(&self) -> String {
        self.lines.join("\n")
    }

    fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Result of scanning one cell.
#[derive(Debug)]
pub struct CellScan {
    /// The cell's new student-visible source.
    pub visible: String,

    /// Whether at least one hidden block was removed from this cell.
    pub removed_block: bool,
}

/// Result of scanning a whole notebook.
#[derive(Debug)]
pub struct Extraction {
    /// Everything removed across all cells, in encounter order.
    pub buffer: HiddenBlockBuffer,

    /// Index of the first code cell, where the compiled-module import will
    /// be inserted. `None` when the notebook has no code cell.
    pub first_code_cell: Option<usize>,

    /// How many cells had at least one block removed.
    pub cells_with_blocks: usize,
}

/// Removes delimited hidden regions from cell source.
///
/// Delimiters match as substrings anywhere in a line, so authors can prefix
/// them with comment markers (`### BEGIN HIDDEN BLOCK`). Delimiter lines
/// themselves appear in neither the visible source nor the buffer.
#[derive(Debug, Clone)]
pub struct HiddenBlockExtractor {
    begin_delimiter: String,
    end_delimiter: String,
}

impl Default for HiddenBlockExtractor {
    fn default() -> Self {
        Self {
            begin_delimiter: DEFAULT_BEGIN_DELIMITER.to_string(),
            end_delimiter: DEFAULT_END_DELIMITER.to_string(),
        }
    }
}

impl HiddenBlockExtractor {
    /// Create an extractor with custom delimiter markers.
    pub fn new(begin_delimiter: impl Into<String>, end_delimiter: impl Into<String>) -> Self {
        Self {
            begin_delimiter: begin_delimiter.into(),
            end_delimiter: end_delimiter.into(),
        }
    }

    /// Scan one cell's source, appending hidden content to `buffer`.
    ///
    /// Returns the new visible source and whether a block was removed.
    /// `cell` is the cell's position in the notebook, used in errors.
    ///
    /// # Errors
    ///
    /// [`Error::NestedBlock`] when a begin delimiter appears inside an open
    /// block; [`Error::UnterminatedBlock`] when the source ends with a block
    /// still open. Both abort the whole notebook pass.
    pub fn scan_cell(
        &self,
        cell: usize,
        source: &str,
        buffer: &mut HiddenBlockBuffer,
    ) -> Result<CellScan> {
        let mut visible = Vec::new();
        let mut in_block = false;
        let mut removed_block = false;

        for line in source.split('\n') {
            if line.contains(&self.begin_delimiter) {
                if in_block {
                    return Err(Error::NestedBlock { cell });
                }
                in_block = true;
                removed_block = true;
            } else if line.contains(&self.end_delimiter) {
                in_block = false;
            } else if in_block {
                buffer.push(line);
            } else {
                visible.push(line);
            }
        }

        if in_block {
            return Err(Error::UnterminatedBlock { cell });
        }

        Ok(CellScan {
            visible: visible.join("\n"),
            removed_block,
        })
    }

    /// Scan every cell of a notebook, rewriting visible source in place.
    ///
    /// All cells are scanned regardless of kind, so hidden regions in
    /// markdown or raw cells are removed as well. The first code cell's
    /// index is tracked while iterating for the later import rewrite.
    pub fn extract(&self, notebook: &mut Notebook) -> Result<Extraction> {
        let mut buffer = HiddenBlockBuffer::default();
        let mut first_code_cell = None;
        let mut cells_with_blocks = 0;

        for (index, cell) in notebook.cells.iter_mut().enumerate() {
            if first_code_cell.is_none() && cell.is_code() {
                first_code_cell = Some(index);
            }

            let scan = self.scan_cell(index, &cell.source, &mut buffer)?;
            cell.source = scan.visible;
            if scan.removed_block {
                cells_with_blocks += 1;
            }
        }

        tracing::debug!(
            lines = buffer.len(),
            cells = cells_with_blocks,
            "hidden-block extraction complete"
        );

        Ok(Extraction {
            buffer,
            first_code_cell,
            cells_with_blocks,
        })
    }
}
