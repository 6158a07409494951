//! Choices and per-round choice combinations

use serde::{Deserialize, Serialize};

/// Number of player slots in every match
pub const PLAYERS: usize = 3;

/// Number of distinct combinations for `PLAYERS` slots
pub const COMBINATIONS: usize = 1 << PLAYERS;

/// A single player's decision in the Prisoner's Dilemma
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    Cooperate,
    Defect,
}

impl Choice {
    /// Both choices, cooperate first
    pub const ALL: [Choice; 2] = [Choice::Cooperate, Choice::Defect];

    /// The other choice
    pub fn flip(self) -> Self {
        match self {
            Choice::Cooperate => Choice::Defect,
            Choice::Defect => Choice::Cooperate,
        }
    }

    /// Single-letter symbol used by the matrix file and the reports
    pub fn symbol(self) -> char {
        match self {
            Choice::Cooperate => 'C',
            Choice::Defect => 'D',
        }
    }

    /// Parse a matrix-file token. The Cyrillic `С` counts as `C`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "C" | "c" | "\u{0421}" | "\u{0441}" => Some(Choice::Cooperate),
            "D" | "d" => Some(Choice::Defect),
            _ => None,
        }
    }
}

impl core::fmt::Display for Choice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The choices of all slots in one round, indexed by slot
pub type Combination = [Choice; PLAYERS];

/// Dense index of a combination in `0..COMBINATIONS`.
///
/// Bit `i` is set when slot `i` defected.
pub fn combination_index(combination: &Combination) -> usize {
    combination
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == Choice::Defect)
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

/// Inverse of [`combination_index`]
pub fn combination_from_index(index: usize) -> Combination {
    let mut combination = [Choice::Cooperate; PLAYERS];
    for (slot, choice) in combination.iter_mut().enumerate() {
        if (index >> slot) & 1 == 1 {
            *choice = Choice::Defect;
        }
    }
    combination
}

/// Every combination, in index order
pub fn all_combinations() -> impl Iterator<Item = Combination> {
    (0..COMBINATIONS).map(combination_from_index)
}

/// The two slots other than `order`, ascending
pub fn co_players(order: usize) -> [usize; PLAYERS - 1] {
    let mut others = [0usize; PLAYERS - 1];
    let mut n = 0;
    for slot in 0..PLAYERS {
        if slot != order {
            others[n] = slot;
            n += 1;
        }
    }
    others
}

/// Render a combination as e.g. `C D C`
pub fn format_combination(combination: &Combination) -> String {
    combination
        .iter()
        .map(|c| c.symbol().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
