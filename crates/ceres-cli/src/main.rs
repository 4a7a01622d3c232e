//! Ceres CLI - grading pipeline for computational notebooks.

mod autograde;
mod release;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ceres")]
#[command(about = "Grading pipeline for computational notebooks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract hidden blocks, compile the test module, rewrite the notebook
    Release {
        /// Path to the notebook (.ipynb file)
        notebook: String,

        /// Assignment the notebook belongs to
        #[arg(short, long)]
        assignment: String,

        /// Notebook id (defaults to the file stem)
        #[arg(long)]
        notebook_id: Option<String>,

        /// Course directory the release tree is rooted at
        #[arg(long, default_value = ".")]
        course_root: String,

        /// Where to write the transformed notebook (defaults to in-place)
        #[arg(short, long)]
        output: Option<String>,

        /// Marker opening a hidden block
        #[arg(long, default_value = ceres_core::extract::DEFAULT_BEGIN_DELIMITER)]
        begin_delimiter: String,

        /// Marker closing a hidden block
        #[arg(long, default_value = ceres_core::extract::DEFAULT_END_DELIMITER)]
        end_delimiter: String,
    },

    /// Execute a notebook's graded cells under the retry harness
    Autograde {
        /// Path to the notebook (.ipynb file)
        notebook: String,

        /// Assignment the notebook belongs to
        #[arg(short, long)]
        assignment: String,

        /// Notebook id (defaults to the file stem)
        #[arg(long)]
        notebook_id: Option<String>,

        /// How many times to re-run the engine after a fatal failure
        #[arg(long, default_value = "0")]
        retries: u32,

        /// Per-cell timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Where to write the executed notebook (defaults to in-place)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Release {
            notebook,
            assignment,
            notebook_id,
            course_root,
            output,
            begin_delimiter,
            end_delimiter,
        } => release::execute(&release::Args {
            notebook,
            assignment,
            notebook_id,
            course_root,
            output,
            begin_delimiter,
            end_delimiter,
        })?,

        Commands::Autograde {
            notebook,
            assignment,
            notebook_id,
            retries,
            timeout,
            output,
        } => autograde::execute(&autograde::Args {
            notebook,
            assignment,
            notebook_id,
            retries,
            timeout,
            output,
        })?,
    }

    Ok(())
}
