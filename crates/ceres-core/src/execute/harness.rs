//! Retry-capable harness around the execution engine.
//!
//! The harness reduces a notebook to its graded subset, drives the engine
//! against that subset, and retries engine-level failures up to a configured
//! budget. Parse and build errors never reach this code path; only the
//! engine's own failures are considered transient.

use crate::error::{Error, Result};
use crate::notebook::{Notebook, Resources, DEFAULT_KERNEL};

use super::engine::{ExecuteOptions, ExecutionEngine};

/// Kernel argument disabling persistent history for the default kernel.
/// A hygiene default only; grading output does not depend on it.
const DISABLE_HISTORY_ARG: &str = "--HistoryManager.hist_file=:memory:";

/// Executes the graded subset of a notebook with bounded retries.
pub struct ExecutionHarness<E> {
    engine: E,
    options: ExecuteOptions,
    max_retries: u32,
}

impl<E: ExecutionEngine> ExecutionHarness<E> {
    /// Harness with default options and no retries.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            options: ExecuteOptions::default(),
            max_retries: 0,
        }
    }

    /// Set the retry budget for engine-level failures.
    ///
    /// Generally unnecessary; useful where kernel startup is flaky.
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute the notebook's graded cells, retrying engine failures.
    ///
    /// Only cells flagged as graded or as solution cells are executed,
    /// preserving their relative order. On success their executed versions
    /// are written back into the original positions of the full cell
    /// sequence; every other cell is untouched. Each attempt runs against a
    /// pristine copy of the graded subset, so nothing carries over from a
    /// failed attempt.
    ///
    /// # Errors
    ///
    /// [`Error::UnresponsiveExecution`] once the engine has failed
    /// `max_retries + 1` times.
    pub fn execute(&self, notebook: &mut Notebook, resources: &Resources) -> Result<()> {
        let graded: Vec<usize> = notebook
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_graded() || cell.is_solution())
            .map(|(index, _)| index)
            .collect();

        tracing::info!(
            cells = notebook.cells.len(),
            graded = graded.len(),
            "executing notebook"
        );

        let options = self.resolve_options(notebook);

        let mut remaining = self.max_retries;
        let mut attempt: u32 = 1;
        loop {
            let mut subset = graded_subset(notebook, &graded);

            match self.engine.execute(&mut subset, resources, &options) {
                Ok(()) => {
                    for (cell, &index) in subset.cells.into_iter().zip(&graded) {
                        notebook.cells[index] = cell;
                    }
                    return Ok(());
                }
                Err(source) if remaining == 0 => {
                    return Err(Error::UnresponsiveExecution {
                        attempts: attempt,
                        source,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        %error,
                        attempt,
                        remaining,
                        "failed to execute notebook, trying again"
                    );
                    remaining -= 1;
                    attempt += 1;
                }
            }
        }
    }

    /// Apply option defaults that depend on the notebook.
    fn resolve_options(&self, notebook: &Notebook) -> ExecuteOptions {
        let mut options = self.options.clone();
        if options.extra_arguments.is_empty() && notebook.kernel_name() == DEFAULT_KERNEL {
            options.extra_arguments = vec![DISABLE_HISTORY_ARG.to_string()];
        }
        options
    }
}

/// Pristine copy of the graded cells, carrying the notebook's metadata.
fn graded_subset(notebook: &Notebook, graded: &[usize]) -> Notebook {
    Notebook {
        cells: graded.iter().map(|&i| notebook.cells[i].clone()).collect(),
        metadata: notebook.metadata.clone(),
        rest: notebook.rest.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell as StdCell, RefCell};

    use crate::error::EngineError;
    use crate::notebook::{Cell, GradingMeta, KernelSpec};

    /// Engine stub that fails a fixed number of times, then succeeds by
    /// tagging every cell it executed.
    struct FlakyEngine {
        failures: u32,
        calls: StdCell<u32>,
        seen_extra_args: RefCell<Vec<String>>,
    }

    impl FlakyEngine {
        fn failing(failures: u32) -> Self {
            Self {
                failures,
                calls: StdCell::new(0),
                seen_extra_args: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.get()
        }
    }

    impl ExecutionEngine for FlakyEngine {
        fn execute(
            &self,
            notebook: &mut Notebook,
            _resources: &Resources,
            options: &ExecuteOptions,
        ) -> std::result::Result<(), EngineError> {
            self.calls.set(self.calls.get() + 1);
            *self.seen_extra_args.borrow_mut() = options.extra_arguments.clone();

            // Every attempt must start from pristine cells.
            for cell in &notebook.cells {
                assert!(!cell.source.contains("# executed"));
            }

            for cell in &mut notebook.cells {
                cell.source.push_str("\n# executed");
            }

            if self.calls.get() <= self.failures {
                return Err(EngineError::Fatal {
                    status: 1,
                    stderr: "kernel never responded".to_string(),
                });
            }
            Ok(())
        }
    }

    fn graded_cell(source: &str) -> Cell {
        let mut cell = Cell::code(source);
        cell.metadata.grading = Some(GradingMeta {
            grade: true,
            ..Default::default()
        });
        cell
    }

    fn solution_cell(source: &str) -> Cell {
        let mut cell = Cell::code(source);
        cell.metadata.grading = Some(GradingMeta {
            solution: true,
            ..Default::default()
        });
        cell
    }

    fn resources() -> Resources {
        Resources::new("ps1", "problem1")
    }

    #[test]
    fn test_single_attempt_success() {
        let mut nb = Notebook::new();
        nb.cells.push(graded_cell("check()"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(0));
        harness.execute(&mut nb, &resources()).expect("execute failed");

        assert_eq!(harness.engine.calls(), 1);
        assert_eq!(nb.cells[0].source, "check()\n# executed");
    }

    #[test]
    fn test_retries_until_success() {
        let mut nb = Notebook::new();
        nb.cells.push(graded_cell("check()"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(2)).with_retries(3);
        harness.execute(&mut nb, &resources()).expect("execute failed");

        // k failures then one success: exactly k + 1 invocations.
        assert_eq!(harness.engine.calls(), 3);
        assert_eq!(nb.cells[0].source, "check()\n# executed");
    }

    #[test]
    fn test_budget_exhaustion_is_terminal() {
        let mut nb = Notebook::new();
        nb.cells.push(graded_cell("check()"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(5)).with_retries(1);
        let err = harness.execute(&mut nb, &resources()).unwrap_err();

        // budget + 1 invocations, then the terminal error.
        assert_eq!(harness.engine.calls(), 2);
        assert!(matches!(err, Error::UnresponsiveExecution { attempts: 2, .. }));
        // The full sequence is still intact.
        assert_eq!(nb.cells[0].source, "check()");
    }

    #[test]
    fn test_only_graded_subset_executes() {
        let mut nb = Notebook::new();
        nb.cells.push(Cell::code("setup"));
        nb.cells.push(graded_cell("check_one()"));
        nb.cells.push(Cell::code("scratch"));
        nb.cells.push(solution_cell("answer"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(0));
        harness.execute(&mut nb, &resources()).unwrap();

        assert_eq!(nb.cells[0].source, "setup");
        assert_eq!(nb.cells[1].source, "check_one()\n# executed");
        assert_eq!(nb.cells[2].source, "scratch");
        assert_eq!(nb.cells[3].source, "answer\n# executed");
    }

    #[test]
    fn test_default_kernel_gets_history_argument() {
        let mut nb = Notebook::new();
        nb.cells.push(graded_cell("check()"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(0));
        harness.execute(&mut nb, &resources()).unwrap();

        assert_eq!(
            *harness.engine.seen_extra_args.borrow(),
            vec![DISABLE_HISTORY_ARG.to_string()]
        );
    }

    #[test]
    fn test_other_kernels_get_no_default_arguments() {
        let mut nb = Notebook::new();
        nb.metadata.kernelspec = Some(KernelSpec {
            name: "ir".to_string(),
            rest: Default::default(),
        });
        nb.cells.push(graded_cell("check()"));

        let harness = ExecutionHarness::new(FlakyEngine::failing(0));
        harness.execute(&mut nb, &resources()).unwrap();

        assert!(harness.engine.seen_extra_args.borrow().is_empty());
    }

    #[test]
    fn test_configured_arguments_win_over_default() {
        let mut nb = Notebook::new();
        nb.cells.push(graded_cell("check()"));

        let options = ExecuteOptions {
            extra_arguments: vec!["--Kernel.quiet=True".to_string()],
            ..Default::default()
        };
        let harness = ExecutionHarness::new(FlakyEngine::failing(0)).with_options(options);
        harness.execute(&mut nb, &resources()).unwrap();

        assert_eq!(
            *harness.engine.seen_extra_args.borrow(),
            vec!["--Kernel.quiet=True".to_string()]
        );
    }
}
