use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::filter::{
    MAX_DURATION_S, MAX_EMPTY_SECONDS_RATIO, MIN_DURATION_S, MIN_MATCHES_PER_SECOND,
};

#[derive(Parser, Debug)]
#[command(
    name = "panako-eval",
    version,
    about = "Accuracy evaluation for audio fingerprint match results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tally true/false positives and false negatives per modification.
    Evaluate(EvaluateArgs),
    /// Keep confident matches, ordered by score.
    Filter(FilterArgs),
    /// Decode a single result line.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[arg(required = true)]
    pub results_files: Vec<PathBuf>,

    #[arg(long, default_value = "results")]
    pub output_dir: PathBuf,

    /// Report file prefix; defaults to the results file stem followed by `_`.
    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long, default_value_t = false)]
    pub stdout: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(required = true)]
    pub results_files: Vec<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub symmetric_only: bool,

    #[arg(long, default_value_t = MIN_DURATION_S)]
    pub min_duration: f64,

    #[arg(long, default_value_t = MAX_DURATION_S)]
    pub max_duration: f64,

    #[arg(long, default_value_t = MIN_MATCHES_PER_SECOND)]
    pub min_matches_per_second: f64,

    #[arg(long, default_value_t = MAX_EMPTY_SECONDS_RATIO)]
    pub max_empty_seconds: f64,
}

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    pub line: String,
}
