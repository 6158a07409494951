//! Round-robin tournament over every 3-subset of a strategy pool

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::choice::PLAYERS;
use crate::combination::{calculate_match_count, generate_all_triples};
use crate::config::Configs;
use crate::error::{ArenaError, Result};
use crate::game::{Match, MatchResult};
use crate::matrix::PayoffMatrix;
use crate::report::Reporter;
use crate::strategy::Registry;
use crate::tally::Tally;

/// Smallest pool a tournament accepts
pub const MIN_TOURNAMENT_STRATEGIES: usize = PLAYERS + 1;

/// One played triple
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentMatch {
    /// Pool indices of the players in slots 0, 1, 2
    pub participants: [usize; PLAYERS],
    pub result: MatchResult,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub matches: Vec<TournamentMatch>,
    /// One entry per pool entry, in pool order
    pub totals: Tally,
    /// Pool indices holding the maximum total
    pub winners: Vec<usize>,
}

/// Play every triple `i < j < k` of `names` for `steps` rounds each.
///
/// Each match starts with fresh strategies, an empty history and a zeroed
/// tally; match scores are then added to the pool-wide totals.
pub fn run_tournament<S: AsRef<str>, W: Write>(
    names: &[S],
    registry: &Registry,
    matrix: &PayoffMatrix,
    configs: &Configs,
    steps: u32,
    reporter: &mut Reporter<W>,
) -> Result<TournamentResult> {
    if names.len() < MIN_TOURNAMENT_STRATEGIES {
        return Err(ArenaError::NotEnoughStrats {
            mode: "tournament",
            needed: "at least 4",
            got: names.len(),
        });
    }
    registry.check_names(names)?;

    let match_count = calculate_match_count(names.len() as u32);
    log::info!(
        "tournament: {} strategies, {} matches of {} rounds",
        names.len(),
        match_count,
        steps
    );

    let mut totals = Tally::new(names);
    let mut matches = Vec::with_capacity(match_count as usize);

    for (i, j, k) in generate_all_triples(names.len() as u32) {
        let participants = [i as usize, j as usize, k as usize];
        let triple = participants.map(|p| names[p].as_ref());

        let mut game = Match::new(&triple, registry, matrix, configs)?;
        game.run_rounds(steps);
        let result = game.finish();
        reporter.game(&result)?;

        for (slot, pool_index) in participants.iter().enumerate() {
            totals.add(*pool_index, result.tally.score(slot));
        }
        matches.push(TournamentMatch { participants, result });
    }

    let winners = totals.winners();
    log::info!(
        "tournament finished, winners: {:?}",
        winners.iter().map(|w| names[*w].as_ref()).collect::<Vec<_>>()
    );

    let result = TournamentResult { matches, totals, winners };
    reporter.total(&result)?;
    Ok(result)
}
