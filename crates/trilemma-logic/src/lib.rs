//! Game logic for the three-player Prisoner's Dilemma arena
//!
//! Three strategies play an iterated game against a payoff matrix that
//! scores every combination of choices. A match runs in detailed mode
//! (one round per operator command), fast mode (a fixed number of rounds)
//! or as part of a tournament over every 3-subset of a strategy pool.
//!
//! This crate is compiled to:
//! - Native (for the `trilemma` command-line runner)
//! - WASM (for browser replay, with the `wasm` feature)

mod choice;
mod combination;
mod config;
mod error;
mod game;
mod matrix;
mod prediction;
mod random;
mod report;
mod runner;
mod strategy;
mod tally;
mod tournament;

#[cfg(feature = "wasm")]
mod wasm;

pub use choice::{
    all_combinations, co_players, combination_from_index, combination_index, format_combination,
    Choice, Combination, COMBINATIONS, PLAYERS,
};
pub use combination::{calculate_match_count, generate_all_triples, get_triple_for_match};
pub use config::Configs;
pub use error::{ArenaError, ErrorKind, Result};
pub use game::{run_match, Match, MatchResult, MatchState, RoundResult, QUIT_COMMAND};
pub use matrix::{PayoffMatrix, Scores};
pub use prediction::{expectation, joint_frequencies, predict, Expectation};
pub use random::SeededRng;
pub use report::{Format, Reporter};
pub use runner::{Mode, RunOutcome, Runner, Settings, DEFAULT_STEPS};
pub use strategy::{
    describe_strategy, execute_strategy, Builtin, Constructor, Registry, Strategy, StrategyBase,
    StrategyParams,
};
pub use tally::{Tally, TallyEntry};
pub use tournament::{run_tournament, TournamentMatch, TournamentResult, MIN_TOURNAMENT_STRATEGIES};
