//! `ceres release` - hidden-block extraction and test module compilation.

use std::path::Path;

use anyhow::Context;
use ceres_core::{
    GradingPipeline, HiddenBlockExtractor, Notebook, ReleaseLayout, Resources, SetupToolchain,
    TestModuleCompiler,
};

pub struct Args {
    pub notebook: String,
    pub assignment: String,
    pub notebook_id: Option<String>,
    pub course_root: String,
    pub output: Option<String>,
    pub begin_delimiter: String,
    pub end_delimiter: String,
}

pub fn execute(args: &Args) -> anyhow::Result<()> {
    let path = Path::new(&args.notebook);
    let mut notebook =
        Notebook::read_file(path).with_context(|| format!("reading {}", path.display()))?;

    let resources = Resources::new(
        args.assignment.as_str(),
        resolve_notebook_id(path, args.notebook_id.as_deref())?,
    );

    let pipeline = GradingPipeline::new(
        HiddenBlockExtractor::new(args.begin_delimiter.as_str(), args.end_delimiter.as_str()),
        TestModuleCompiler::new(
            SetupToolchain::discover()?,
            ReleaseLayout::new(&args.course_root),
        ),
    );

    pipeline
        .process(&mut notebook, &resources)
        .with_context(|| format!("processing {}", resources.notebook_id))?;

    let output = args.output.as_deref().unwrap_or(&args.notebook);
    notebook.write_file(output)?;
    tracing::info!(notebook = %output, "release notebook written");

    Ok(())
}

/// Notebook id from the flag, falling back to the file stem.
pub fn resolve_notebook_id(path: &Path, explicit: Option<&str>) -> anyhow::Result<String> {
    match explicit {
        Some(id) => Ok(id.to_string()),
        None => path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("cannot derive notebook id from {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_notebook_id_from_stem() {
        let id = resolve_notebook_id(Path::new("work/problem1.ipynb"), None).unwrap();
        assert_eq!(id, "problem1");
    }

    #[test]
    fn test_explicit_notebook_id_wins() {
        let id = resolve_notebook_id(Path::new("work/problem1.ipynb"), Some("unit2")).unwrap();
        assert_eq!(id, "unit2");
    }
}
