//! corner-eval CLI - corner-count model evaluation plots

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use corner_eval::dataset::DEFAULT_URL;
use corner_eval::eval::output::DEFAULT_PLOTS_ROOT;
use corner_eval::{EvalConfig, ModelEvaluation};
use tracing_subscriber::EnvFilter;

/// Fetch the corner comparison dataset and plot truth against prediction.
///
/// Prints the directory holding the generated charts.
#[derive(Parser, Debug)]
#[command(name = "corner-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Dataset URL
    #[arg(long, env = "CORNER_EVAL_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Directory under which the timestamped run directory is created
    #[arg(long, default_value = DEFAULT_PLOTS_ROOT)]
    plots_dir: PathBuf,

    /// Seed for the sampled bar chart (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn eval_config(&self) -> EvalConfig {
        let builder = EvalConfig::builder()
            .source_url(self.url.as_str())
            .plots_root(&self.plots_dir);
        match self.seed {
            Some(seed) => builder.seed(seed),
            None => builder,
        }
        .build()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut evaluation = ModelEvaluation::new(cli.eval_config())
        .with_context(|| format!("Failed to start evaluation of {}", cli.url))?;
    let dir = evaluation.draw_plots().context("Failed to draw plots")?;

    println!("{}", dir.display());
    Ok(())
}
