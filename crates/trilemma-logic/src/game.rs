//! Match execution engine

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::choice::{Choice, Combination, PLAYERS};
use crate::config::Configs;
use crate::error::{ArenaError, Result};
use crate::matrix::{PayoffMatrix, Scores};
use crate::report::Reporter;
use crate::strategy::{Registry, Strategy};
use crate::tally::Tally;

/// Operator command that ends a detailed match
pub const QUIT_COMMAND: &str = "quit";

/// Result of a single round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round number
    pub round: u32,
    pub combination: Combination,
    pub scores: Scores,
    pub cumulative: [u64; PLAYERS],
}

/// Result of a complete match
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub names: Vec<String>,
    pub rounds: Vec<RoundResult>,
    pub tally: Tally,
    pub round_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    Running,
    /// Detailed mode only: waiting for the operator
    AwaitingCommand,
    /// Stopped by `quit`; further commands are ignored
    Finished,
}

/// One match between three strategies.
///
/// Strategies are asked in slot order against the same history, so none of
/// them sees another's choice for the current round.
pub struct Match<'m> {
    names: Vec<String>,
    strategies: Vec<Box<dyn Strategy>>,
    matrix: &'m PayoffMatrix,
    history: Vec<Combination>,
    rounds: Vec<RoundResult>,
    tally: Tally,
    state: MatchState,
}

impl<'m> Match<'m> {
    /// Build fresh strategies for `names`; slot `i` gets order `i`
    pub fn new<S: AsRef<str>>(
        names: &[S],
        registry: &Registry,
        matrix: &'m PayoffMatrix,
        configs: &Configs,
    ) -> Result<Self> {
        if names.len() < PLAYERS {
            return Err(ArenaError::NotEnoughStrats {
                mode: "match",
                needed: "exactly 3",
                got: names.len(),
            });
        }
        if names.len() > PLAYERS {
            return Err(ArenaError::TooManyStrats { mode: "match", got: names.len() });
        }

        let strategies = names
            .iter()
            .enumerate()
            .map(|(order, name)| registry.create(name.as_ref(), order, configs))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            names: names.iter().map(|n| n.as_ref().to_owned()).collect(),
            strategies,
            matrix,
            history: Vec::new(),
            rounds: Vec::new(),
            tally: Tally::new(names),
            state: MatchState::Running,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn history(&self) -> &[Combination] {
        &self.history
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Play one round and record it
    pub fn play_round(&mut self) -> &RoundResult {
        let mut combination = [Choice::Cooperate; PLAYERS];
        for (slot, strategy) in self.strategies.iter().enumerate() {
            combination[slot] = strategy.choose(&self.history, self.matrix);
        }
        self.history.push(combination);

        let scores = self.matrix.scores(&combination);
        let mut cumulative = [0u64; PLAYERS];
        for slot in 0..PLAYERS {
            self.tally.add(slot, scores[slot] as u64);
            cumulative[slot] = self.tally.score(slot);
        }

        let round = self.history.len() as u32;
        log::trace!("round {}: {:?} -> {:?}", round, combination, scores);
        self.rounds.push(RoundResult { round, combination, scores, cumulative });
        &self.rounds[self.rounds.len() - 1]
    }

    /// Play exactly `steps` rounds
    pub fn run_rounds(&mut self, steps: u32) {
        for _ in 0..steps {
            self.play_round();
        }
    }

    /// Fast mode: play `steps` rounds silently, then report once
    pub fn run_fast<W: Write>(
        mut self,
        steps: u32,
        reporter: &mut Reporter<W>,
    ) -> Result<MatchResult> {
        self.run_rounds(steps);
        let result = self.finish();
        reporter.game(&result)?;
        Ok(result)
    }

    /// Apply one operator command.
    ///
    /// `quit` finishes the match; any other command plays a round and
    /// reports it. Once finished, further commands are ignored.
    pub fn command<W: Write>(
        &mut self,
        command: &str,
        reporter: &mut Reporter<W>,
    ) -> Result<MatchState> {
        if self.state == MatchState::Finished {
            return Ok(self.state);
        }
        if command == QUIT_COMMAND {
            self.state = MatchState::Finished;
            return Ok(self.state);
        }

        self.state = MatchState::Running;
        let round = self.play_round().clone();
        reporter.round(&self.names, &round)?;
        self.state = MatchState::AwaitingCommand;
        Ok(self.state)
    }

    /// Detailed mode: read whitespace-separated commands from `input`.
    ///
    /// Each command other than `quit` plays one round, so blank lines do
    /// nothing and `quit now` quits. `quit` or the end of input finishes
    /// the match.
    pub fn run_detailed<R: BufRead, W: Write>(
        mut self,
        input: R,
        reporter: &mut Reporter<W>,
    ) -> Result<MatchResult> {
        self.state = MatchState::AwaitingCommand;
        'input: for line in input.lines() {
            let line = line?;
            for command in line.split_whitespace() {
                if self.command(command, reporter)? == MatchState::Finished {
                    break 'input;
                }
            }
        }
        Ok(self.finish())
    }

    /// End the match and hand back its result
    pub fn finish(self) -> MatchResult {
        log::debug!(
            "match {:?} finished after {} rounds: {:?}",
            self.names,
            self.history.len(),
            self.tally.entries().iter().map(|e| e.score).collect::<Vec<_>>()
        );
        MatchResult {
            names: self.names,
            round_count: self.history.len() as u32,
            rounds: self.rounds,
            tally: self.tally,
        }
    }
}

/// Build and run a silent match of `steps` rounds
pub fn run_match<S: AsRef<str>>(
    names: &[S],
    registry: &Registry,
    matrix: &PayoffMatrix,
    configs: &Configs,
    steps: u32,
) -> Result<MatchResult> {
    let mut game = Match::new(names, registry, matrix, configs)?;
    game.run_rounds(steps);
    Ok(game.finish())
}
