//! Trilemma - command-line runner
//!
//! Plays detailed, fast or tournament games of the three-player
//! Prisoner's Dilemma and prints the reports to stdout.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use trilemma_logic::{
    describe_strategy, Registry, Reporter, RunOutcome, Runner, StrategyBase, StrategyParams,
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("run failed: {:?}", e);
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = Registry::builtin();
    if cli.list {
        return list_strategies(&registry, &mut io::stdout().lock());
    }

    let runner = Runner::new(cli.settings(), registry)?;
    log::info!("starting {} run with {} strategies", runner.mode().name(), runner.names().len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock(), cli.format.into()).with_printing(!cli.quiet);

    let outcome = runner.run(stdin.lock(), &mut reporter)?;
    reporter.into_inner().flush().context("flushing report")?;

    match outcome {
        RunOutcome::Match(result) => log::info!("match over after {} rounds", result.round_count),
        RunOutcome::Tournament(result) => {
            log::info!("tournament over after {} matches", result.matches.len())
        }
    }
    Ok(())
}

/// Every name the registry accepts, with a description for built-ins
fn list_strategies<W: Write>(registry: &Registry, out: &mut W) -> Result<()> {
    for name in registry.names() {
        match StrategyBase::ALL.into_iter().find(|base| base.name() == name) {
            Some(base) => {
                let description = describe_strategy(base, &StrategyParams::default());
                writeln!(out, "{}\t{}", name, description)?
            }
            None => writeln!(out, "{}", name)?,
        }
    }
    Ok(())
}
