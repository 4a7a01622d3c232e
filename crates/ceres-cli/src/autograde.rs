//! `ceres autograde` - execute graded cells under the retry harness.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use ceres_core::{ExecuteOptions, ExecutionHarness, Notebook, ProcessEngine, Resources};

use crate::release::resolve_notebook_id;

pub struct Args {
    pub notebook: String,
    pub assignment: String,
    pub notebook_id: Option<String>,
    pub retries: u32,
    pub timeout: Option<u64>,
    pub output: Option<String>,
}

pub fn execute(args: &Args) -> anyhow::Result<()> {
    let path = Path::new(&args.notebook);
    let mut notebook =
        Notebook::read_file(path).with_context(|| format!("reading {}", path.display()))?;

    let resources = Resources::new(
        args.assignment.as_str(),
        resolve_notebook_id(path, args.notebook_id.as_deref())?,
    );

    let options = ExecuteOptions {
        timeout: args.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    let harness = ExecutionHarness::new(ProcessEngine::discover()?)
        .with_options(options)
        .with_retries(args.retries);

    harness
        .execute(&mut notebook, &resources)
        .with_context(|| format!("executing {}", resources.notebook_id))?;

    let output = args.output.as_deref().unwrap_or(&args.notebook);
    notebook.write_file(output)?;
    tracing::info!(notebook = %output, "executed notebook written");

    Ok(())
}
