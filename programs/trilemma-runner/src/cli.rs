//! Command-line interface for the trilemma runner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use trilemma_logic::{Format, Settings};

/// Three-player Iterated Prisoner's Dilemma: matches and tournaments
#[derive(Parser, Debug)]
#[command(name = "trilemma")]
#[command(
    about = "Play strategies against each other in a three-player Prisoner's Dilemma",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// detailed, fast or tournament [default: tournament for more than 3 strategies, else detailed]
    #[arg(long)]
    pub mode: Option<String>,

    /// Rounds per match in fast and tournament modes [default: 10]
    #[arg(long)]
    pub steps: Option<String>,

    /// File of whitespace-separated `key=value` strategy parameters
    #[arg(long)]
    pub configs: Option<PathBuf>,

    /// Payoff matrix file, one `c c c s s s` record per combination
    #[arg(long)]
    pub matrix: Option<PathBuf>,

    /// Suppress reports, print nothing but errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// List registered strategies and exit
    #[arg(long)]
    pub list: bool,

    /// Strategy names, in slot order
    pub strategies: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
        }
    }
}

impl Cli {
    /// Raw settings, validated later by the runner
    pub fn settings(&self) -> Settings {
        Settings {
            mode: self.mode.clone(),
            steps: self.steps.clone(),
            configs: self.configs.clone(),
            matrix: self.matrix.clone(),
            names: self.strategies.clone(),
        }
    }
}
