//! Cumulative scores per participant

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub name: String,
    pub score: u64,
}

/// Ordered scores, one entry per slot (in a match) or per pool entry (in a
/// tournament). Entries are positional, so repeated names stay separate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    entries: Vec<TallyEntry>,
}

impl Tally {
    /// Zeroed tally for these names
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            entries: names
                .iter()
                .map(|n| TallyEntry { name: n.as_ref().to_owned(), score: 0 })
                .collect(),
        }
    }

    pub fn add(&mut self, index: usize, points: u64) {
        self.entries[index].score += points;
    }

    pub fn score(&self, index: usize) -> u64 {
        self.entries[index].score
    }

    pub fn entries(&self) -> &[TallyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_score(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// Indices of every entry holding the maximum score
    pub fn winners(&self) -> Vec<usize> {
        let Some(max) = self.max_score() else {
            return Vec::new();
        };
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.score == max)
            .map(|(i, _)| i)
            .collect()
    }
}
