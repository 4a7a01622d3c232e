//! Whole-notebook grading pipeline.

use crate::compile::{import_line, normalize_module_name, BuildToolchain, TestModuleCompiler};
use crate::error::Result;
use crate::extract::HiddenBlockExtractor;
use crate::notebook::{Notebook, Resources};

/// Drives one notebook through extraction, compilation, and the import
/// rewrite.
///
/// Extraction always runs; the compiler is invoked only when hidden blocks
/// were actually found, so notebooks without any incur no build cost and no
/// release directory.
pub struct GradingPipeline<T> {
    extractor: HiddenBlockExtractor,
    compiler: TestModuleCompiler<T>,
}

impl<T: BuildToolchain> GradingPipeline<T> {
    pub fn new(extractor: HiddenBlockExtractor, compiler: TestModuleCompiler<T>) -> Self {
        Self {
            extractor,
            compiler,
        }
    }

    /// Process one notebook in place.
    ///
    /// After a successful pass every hidden region is gone from the visible
    /// cells, the compiled test module is published under the assignment's
    /// release package, and the first code cell imports it.
    pub fn process(&self, notebook: &mut Notebook, resources: &Resources) -> Result<()> {
        let extraction = self.extractor.extract(notebook)?;

        if extraction.buffer.is_empty() {
            tracing::debug!(notebook = %resources.notebook_id, "no hidden blocks, skipping build");
            return Ok(());
        }

        self.compiler.compile(&extraction.buffer, resources)?;

        match extraction.first_code_cell {
            Some(index) => {
                let module = normalize_module_name(&resources.notebook_id);
                let cell = &mut notebook.cells[index];
                cell.source = format!("{}\n{}", import_line(&module), cell.source);
            }
            None => {
                // Artifact is published either way; downstream grading just
                // has nowhere to import it from.
                tracing::warn!(
                    notebook = %resources.notebook_id,
                    "notebook has hidden blocks but no code cell, skipping import rewrite"
                );
            }
        }

        Ok(())
    }
}
