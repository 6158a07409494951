//! Expected-value prediction against the co-players' observed habits
//!
//! The co-players' joint choices are counted over the whole history. For
//! each of the four joint outcomes, the payoff of cooperating and of
//! defecting is weighted by how often that outcome occurred. The larger
//! expectation wins; a tie defects.

use serde::{Deserialize, Serialize};

use crate::choice::{co_players, Choice, Combination, PLAYERS};
use crate::matrix::PayoffMatrix;

/// Frequency-weighted payoffs for one slot.
///
/// `cooperate` and `defect` are sums of `count(pair) * payoff`, i.e. the
/// expected values scaled by `rounds`. Comparing the scaled sums decides
/// exactly what comparing the expected values would.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    pub cooperate: u64,
    pub defect: u64,
    pub rounds: u64,
}

impl Expectation {
    /// Expected payoff of cooperating (0 before any round is played)
    pub fn cooperate_value(&self) -> f64 {
        self.scaled(self.cooperate)
    }

    /// Expected payoff of defecting (0 before any round is played)
    pub fn defect_value(&self) -> f64 {
        self.scaled(self.defect)
    }

    fn scaled(&self, sum: u64) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            sum as f64 / self.rounds as f64
        }
    }

    /// Cooperate only on a strict advantage
    pub fn decision(&self) -> Choice {
        if self.cooperate > self.defect {
            Choice::Cooperate
        } else {
            Choice::Defect
        }
    }
}

/// Occurrences of each co-player joint choice, indexed
/// `[choice of lower slot][choice of higher slot]`
pub fn joint_frequencies(history: &[Combination], order: usize) -> [[u64; 2]; 2] {
    let [a, b] = co_players(order);
    let mut counts = [[0u64; 2]; 2];
    for combination in history {
        counts[combination[a] as usize][combination[b] as usize] += 1;
    }
    counts
}

/// Frequency-weighted payoffs of both choices for `order`
pub fn expectation(history: &[Combination], matrix: &PayoffMatrix, order: usize) -> Expectation {
    let [a, b] = co_players(order);
    let counts = joint_frequencies(history, order);
    let mut result = Expectation { rounds: history.len() as u64, ..Default::default() };

    for choice_a in Choice::ALL {
        for choice_b in Choice::ALL {
            let count = counts[choice_a as usize][choice_b as usize];
            if count == 0 {
                continue;
            }
            let mut combination = [Choice::Cooperate; PLAYERS];
            combination[a] = choice_a;
            combination[b] = choice_b;

            combination[order] = Choice::Cooperate;
            result.cooperate += count * matrix.score(&combination, order) as u64;
            combination[order] = Choice::Defect;
            result.defect += count * matrix.score(&combination, order) as u64;
        }
    }
    result
}

/// Choice of the prediction strategy in slot `order`.
///
/// Cooperates on the first round, before there is anything to predict from.
pub fn predict(history: &[Combination], matrix: &PayoffMatrix, order: usize) -> Choice {
    if history.is_empty() {
        return Choice::Cooperate;
    }
    let expected = expectation(history, matrix, order);
    log::trace!(
        "prediction slot {}: E[C]={:.3} E[D]={:.3} over {} rounds",
        order,
        expected.cooperate_value(),
        expected.defect_value(),
        expected.rounds
    );
    expected.decision()
}
