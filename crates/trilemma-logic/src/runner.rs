//! Validated game setup from command-line style settings, and mode dispatch

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::choice::PLAYERS;
use crate::config::Configs;
use crate::error::{ArenaError, Result};
use crate::game::{Match, MatchResult};
use crate::matrix::PayoffMatrix;
use crate::report::Reporter;
use crate::strategy::Registry;
use crate::tournament::{run_tournament, TournamentResult, MIN_TOURNAMENT_STRATEGIES};

/// Rounds per match when no step count is given
pub const DEFAULT_STEPS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Operator-driven, one report per round
    Detailed,
    /// Fixed number of rounds, one report at the end
    Fast,
    /// Every 3-subset of the pool
    Tournament,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Detailed => "detailed",
            Mode::Fast => "fast",
            Mode::Tournament => "tournament",
        }
    }
}

impl FromStr for Mode {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "detailed" => Ok(Mode::Detailed),
            "fast" => Ok(Mode::Fast),
            "tournament" => Ok(Mode::Tournament),
            _ => Err(ArenaError::WrongMode(s.to_owned())),
        }
    }
}

/// Unvalidated run parameters, as given on the command line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub mode: Option<String>,
    pub steps: Option<String>,
    pub configs: Option<PathBuf>,
    pub matrix: Option<PathBuf>,
    pub names: Vec<String>,
}

/// What a run produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Match(MatchResult),
    Tournament(TournamentResult),
}

/// A fully validated game setup.
///
/// Construction performs every check, so a `Runner` that exists can run.
pub struct Runner {
    mode: Mode,
    steps: u32,
    configs: Configs,
    matrix: PayoffMatrix,
    names: Vec<String>,
    registry: Registry,
}

impl Runner {
    /// Validate settings in order: mode, steps, configs file, matrix file,
    /// strategy names, strategy count. The first failure is returned.
    pub fn new(settings: Settings, registry: Registry) -> Result<Self> {
        let mode = match settings.mode.as_deref() {
            Some(name) => name.parse()?,
            None if settings.names.len() > PLAYERS => Mode::Tournament,
            None => Mode::Detailed,
        };

        let steps = match settings.steps.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ArenaError::WrongSteps(raw.to_owned()))?,
            None => DEFAULT_STEPS,
        };

        let configs = match &settings.configs {
            Some(path) => Configs::load(path)?,
            None => Configs::default(),
        };

        let matrix = match &settings.matrix {
            Some(path) => PayoffMatrix::load(path)?,
            None => PayoffMatrix::default(),
        };

        registry.check_names(&settings.names)?;
        check_count(mode, settings.names.len())?;

        log::debug!(
            "runner: mode={} steps={} configs={} tokens, strategies {:?}",
            mode.name(),
            steps,
            configs.tokens().len(),
            settings.names
        );

        Ok(Self { mode, steps, configs, matrix, names: settings.names, registry })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    pub fn configs(&self) -> &Configs {
        &self.configs
    }

    /// Run the configured mode. `input` is only read in detailed mode.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        reporter: &mut Reporter<W>,
    ) -> Result<RunOutcome> {
        match self.mode {
            Mode::Tournament => run_tournament(
                &self.names,
                &self.registry,
                &self.matrix,
                &self.configs,
                self.steps,
                reporter,
            )
            .map(RunOutcome::Tournament),
            Mode::Fast => {
                let game = Match::new(&self.names, &self.registry, &self.matrix, &self.configs)?;
                game.run_fast(self.steps, reporter).map(RunOutcome::Match)
            }
            Mode::Detailed => {
                let game = Match::new(&self.names, &self.registry, &self.matrix, &self.configs)?;
                game.run_detailed(input, reporter).map(RunOutcome::Match)
            }
        }
    }
}

/// Exactly 3 strategies outside tournaments, at least 4 in them
fn check_count(mode: Mode, got: usize) -> Result<()> {
    match mode {
        Mode::Tournament if got < MIN_TOURNAMENT_STRATEGIES => {
            Err(ArenaError::NotEnoughStrats { mode: mode.name(), needed: "at least 4", got })
        }
        Mode::Tournament => Ok(()),
        _ if got < PLAYERS => Err(ArenaError::NotEnoughStrats {
            mode: mode.name(),
            needed: "exactly 3",
            got,
        }),
        _ if got > PLAYERS => Err(ArenaError::TooManyStrats { mode: mode.name(), got }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn settings(mode: Option<&str>, steps: Option<&str>, names: &[&str]) -> Settings {
        Settings {
            mode: mode.map(str::to_owned),
            steps: steps.map(str::to_owned),
            names: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    fn build(settings: Settings) -> Result<Runner> {
        Runner::new(settings, Registry::builtin())
    }

    fn kind(settings: Settings) -> ErrorKind {
        build(settings).err().unwrap().kind()
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("fast".parse::<Mode>().unwrap(), Mode::Fast);
        assert_eq!("detailed".parse::<Mode>().unwrap(), Mode::Detailed);
        assert_eq!("tournament".parse::<Mode>().unwrap(), Mode::Tournament);
        assert_eq!("Fast".parse::<Mode>().unwrap_err().kind(), ErrorKind::WrongMode);
    }

    #[test]
    fn test_defaults() {
        let runner = build(settings(None, None, &["AllCooperate", "AllDefect", "Pavlov"])).unwrap();
        assert_eq!(runner.mode(), Mode::Detailed);
        assert_eq!(runner.steps(), DEFAULT_STEPS);
        assert_eq!(runner.matrix(), &PayoffMatrix::default());
        assert!(runner.configs().is_empty());

        let four = ["AllCooperate", "AllDefect", "Pavlov", "Gradual"];
        let runner = build(settings(None, None, &four)).unwrap();
        assert_eq!(runner.mode(), Mode::Tournament);
    }

    #[test]
    fn test_wrong_mode_and_steps() {
        let names = ["AllCooperate", "AllDefect", "Pavlov"];
        assert_eq!(kind(settings(Some("slow"), None, &names)), ErrorKind::WrongMode);
        assert_eq!(kind(settings(Some("fast"), Some("ten"), &names)), ErrorKind::WrongSteps);
        assert_eq!(kind(settings(Some("fast"), Some("-3"), &names)), ErrorKind::WrongSteps);
        assert_eq!(build(settings(Some("fast"), Some("0"), &names)).unwrap().steps(), 0);
    }

    #[test]
    fn test_strategy_counts() {
        let three = ["AllCooperate", "AllDefect", "Pavlov"];
        let four = ["AllCooperate", "AllDefect", "Pavlov", "Gradual"];
        assert_eq!(kind(settings(Some("fast"), None, &three[..2])), ErrorKind::NotEnoughStrats);
        assert_eq!(kind(settings(Some("detailed"), None, &four)), ErrorKind::TooManyStrats);
        assert_eq!(kind(settings(Some("tournament"), None, &three)), ErrorKind::NotEnoughStrats);
        assert!(build(settings(Some("tournament"), None, &four)).is_ok());
    }

    #[test]
    fn test_wrong_strategy_name() {
        let names = ["AllCooperate", "Unknown", "Pavlov"];
        let err = build(settings(Some("fast"), None, &names)).err().unwrap();
        assert!(matches!(err, ArenaError::WrongStrategyName(ref n) if n == "Unknown"));
    }

    #[test]
    fn test_missing_files() {
        let mut s = settings(Some("fast"), None, &["AllCooperate", "AllDefect", "Pavlov"]);
        s.configs = Some("/no/such/configs".into());
        assert_eq!(kind(s), ErrorKind::ConfigsFileNotOpened);

        let mut s = settings(Some("fast"), None, &["AllCooperate", "AllDefect", "Pavlov"]);
        s.matrix = Some("/no/such/matrix".into());
        assert_eq!(kind(s), ErrorKind::MatrixFileNotOpened);
    }

    #[test]
    fn test_malformed_matrix_refuses_to_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.txt");
        std::fs::write(&path, "C C C 1 1 x\n").unwrap();

        let mut s = settings(Some("fast"), Some("5"), &["AllCooperate", "AllDefect", "Pavlov"]);
        s.matrix = Some(path);
        assert_eq!(kind(s), ErrorKind::WrongMatrix);
    }

    #[test]
    fn test_non_utf8_files() {
        let dir = tempfile::tempdir().unwrap();
        let matrix_path = dir.path().join("matrix.txt");
        let configs_path = dir.path().join("configs.txt");
        std::fs::write(&matrix_path, b"\xD1 C C 7 7 7\n").unwrap();
        std::fs::write(&configs_path, b"seed=1 note=\xff").unwrap();

        let mut s = settings(Some("fast"), None, &["AllCooperate", "AllDefect", "Pavlov"]);
        s.configs = Some(configs_path.clone());
        s.matrix = Some(matrix_path);
        assert_eq!(kind(s), ErrorKind::WrongMatrix);

        let mut s = settings(Some("fast"), None, &["AllCooperate", "AllDefect", "Pavlov"]);
        s.configs = Some(configs_path);
        let runner = build(s).unwrap();
        assert_eq!(runner.configs().value("seed"), Some("1"));
    }

    #[test]
    fn test_matrix_and_configs_from_their_own_paths() {
        let dir = tempfile::tempdir().unwrap();
        let matrix_path = dir.path().join("m.txt");
        let configs_path = dir.path().join("c.txt");
        let flat: String = crate::choice::all_combinations()
            .map(|c| format!("{} 2 2 2\n", crate::choice::format_combination(&c)))
            .collect();
        std::fs::write(&matrix_path, flat).unwrap();
        std::fs::write(&configs_path, "seed=5").unwrap();

        let mut s = settings(Some("fast"), Some("4"), &["AllCooperate", "AllDefect", "Pavlov"]);
        s.matrix = Some(matrix_path);
        s.configs = Some(configs_path);
        let runner = build(s).unwrap();
        assert_eq!(runner.configs().value("seed"), Some("5"));

        match runner.run(std::io::empty(), &mut Reporter::silent()).unwrap() {
            RunOutcome::Match(result) => {
                assert_eq!(result.round_count, 4);
                assert!(result.tally.entries().iter().all(|e| e.score == 8));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_run_dispatch() {
        let pool = ["AllCooperate", "AllDefect", "Pavlov", "Gradual", "Prediction"];
        let runner = build(settings(Some("tournament"), Some("2"), &pool)).unwrap();
        match runner.run(std::io::empty(), &mut Reporter::silent()).unwrap() {
            RunOutcome::Tournament(result) => assert_eq!(result.matches.len(), 10),
            other => panic!("unexpected {other:?}"),
        }

        let three = ["AllCooperate", "AllDefect", "Pavlov"];
        let runner = build(settings(Some("detailed"), None, &three)).unwrap();
        match runner.run("next\n\nnext\nquit\n".as_bytes(), &mut Reporter::silent()).unwrap() {
            RunOutcome::Match(result) => assert_eq!(result.round_count, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
