//! Evaluation session and run output.
//!
//! - [`session::ModelEvaluation`]: loads the dataset, draws and saves the charts
//! - [`session::EvalConfig`]: configuration for a run
//! - [`output::OutputDir`]: the timestamped directory a run writes into

pub mod output;
pub mod session;

pub use output::OutputDir;
pub use session::{EvalConfig, EvalConfigBuilder, ModelEvaluation};
