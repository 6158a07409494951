//! Payoff matrix: combination -> per-slot scores

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::choice::{
    combination_from_index, combination_index, format_combination, Choice, Combination,
    COMBINATIONS, PLAYERS,
};
use crate::error::{ArenaError, Result};

/// Scores awarded to each slot for one round
pub type Scores = [u32; PLAYERS];

/// Default matrix in index order, used when no matrix file is given.
///
/// Symmetric: a lone defector gains the most, mutual defection is the worst
/// shared outcome.
const DEFAULT_TABLE: [Scores; COMBINATIONS] = [
    [7, 7, 7], // C C C
    [9, 3, 3], // D C C
    [3, 9, 3], // C D C
    [5, 5, 0], // D D C
    [3, 3, 9], // C C D
    [5, 0, 5], // D C D
    [0, 5, 5], // C D D
    [1, 1, 1], // D D D
];

/// Lookup table from every combination to per-slot scores.
///
/// Only constructible with all `COMBINATIONS` entries present, so
/// [`PayoffMatrix::scores`] is total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffMatrix {
    table: [Scores; COMBINATIONS],
}

impl PayoffMatrix {
    /// Build from (combination, scores) entries covering each combination exactly once
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Combination, Scores)>,
    {
        let mut table: [Option<Scores>; COMBINATIONS] = [None; COMBINATIONS];
        for (combination, scores) in entries {
            let slot = &mut table[combination_index(&combination)];
            if slot.is_some() {
                return Err(ArenaError::WrongMatrix(format!(
                    "combination {} listed twice",
                    format_combination(&combination)
                )));
            }
            *slot = Some(scores);
        }

        let mut complete = [[0u32; PLAYERS]; COMBINATIONS];
        for (index, entry) in table.iter().enumerate() {
            complete[index] = entry.ok_or_else(|| {
                ArenaError::WrongMatrix(format!(
                    "combination {} is missing",
                    format_combination(&combination_from_index(index))
                ))
            })?;
        }
        Ok(Self { table: complete })
    }

    /// Parse the whitespace-separated matrix format:
    /// 8 records of three choice tokens followed by three scores.
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split_whitespace();
        let mut entries = Vec::with_capacity(COMBINATIONS);

        for record in 1..=COMBINATIONS {
            let mut combination = [Choice::Cooperate; PLAYERS];
            for choice in combination.iter_mut() {
                let token = tokens.next().ok_or_else(|| {
                    ArenaError::WrongMatrix(format!("record {} is truncated", record))
                })?;
                *choice = Choice::from_token(token).ok_or_else(|| {
                    ArenaError::WrongMatrix(format!(
                        "record {}: {:?} is not a choice (C or D)",
                        record, token
                    ))
                })?;
            }

            let mut scores = [0u32; PLAYERS];
            for score in scores.iter_mut() {
                let token = tokens.next().ok_or_else(|| {
                    ArenaError::WrongMatrix(format!("record {} is truncated", record))
                })?;
                *score = token.parse().map_err(|_| {
                    ArenaError::WrongMatrix(format!(
                        "record {}: {:?} is not a non-negative integer",
                        record, token
                    ))
                })?;
            }
            entries.push((combination, scores));
        }

        if let Some(extra) = tokens.next() {
            return Err(ArenaError::WrongMatrix(format!(
                "unexpected token {:?} after {} records",
                extra, COMBINATIONS
            )));
        }

        Self::from_entries(entries)
    }

    /// Read and parse a matrix file. Contents that are not UTF-8 are a
    /// malformed matrix, not an unreadable file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| {
            ArenaError::MatrixFileNotOpened { path: path.to_path_buf(), source }
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            ArenaError::WrongMatrix(format!(
                "{} is not valid UTF-8 (invalid byte at offset {})",
                path.display(),
                e.utf8_error().valid_up_to()
            ))
        })?;
        Self::parse(&text)
    }

    /// Scores of every slot for this combination
    pub fn scores(&self, combination: &Combination) -> Scores {
        self.table[combination_index(combination)]
    }

    /// Score of a single slot for this combination
    pub fn score(&self, combination: &Combination, slot: usize) -> u32 {
        self.scores(combination)[slot]
    }

    /// Render back into the file format, in index order
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (index, scores) in self.table.iter().enumerate() {
            let combination = combination_from_index(index);
            out.push_str(&format!(
                "{} {} {} {}\n",
                format_combination(&combination),
                scores[0],
                scores[1],
                scores[2]
            ));
        }
        out
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        Self { table: DEFAULT_TABLE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choice::all_combinations;
    use crate::error::ErrorKind;
    use Choice::{Cooperate as C, Defect as D};

    const DEFAULT_MATRIX: &str = "\
C C C 7 7 7
C C D 3 3 9
C D C 3 9 3
D C C 9 3 3
C D D 0 5 5
D C D 5 0 5
D D C 5 5 0
D D D 1 1 1
";

    #[test]
    fn test_default_matrix_parses() {
        let matrix = PayoffMatrix::parse(DEFAULT_MATRIX).unwrap();
        assert_eq!(matrix.scores(&[C, C, C]), [7, 7, 7]);
        assert_eq!(matrix.scores(&[D, C, C]), [9, 3, 3]);
        assert_eq!(matrix.scores(&[C, D, D]), [0, 5, 5]);
        assert_eq!(matrix.scores(&[D, D, D]), [1, 1, 1]);
        assert_eq!(matrix, PayoffMatrix::default());
    }

    #[test]
    fn test_default_matrix_symmetric() {
        let matrix = PayoffMatrix::default();
        for combination in all_combinations() {
            let scores = matrix.scores(&combination);
            for a in 0..PLAYERS {
                for b in 0..PLAYERS {
                    if combination[a] == combination[b] {
                        assert_eq!(scores[a], scores[b], "{:?}", combination);
                    }
                }
            }
        }
    }

    #[test]
    fn test_record_order_irrelevant() {
        let reversed: String = DEFAULT_MATRIX.lines().rev().map(|l| format!("{l}\n")).collect();
        assert_eq!(PayoffMatrix::parse(&reversed).unwrap(), PayoffMatrix::default());
    }

    #[test]
    fn test_non_numeric_score() {
        let text = DEFAULT_MATRIX.replace("C C C 7 7 7", "C C C 7 seven 7");
        let err = PayoffMatrix::parse(&text).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongMatrix);
    }

    #[test]
    fn test_negative_score() {
        let text = DEFAULT_MATRIX.replace("D D D 1 1 1", "D D D 1 -1 1");
        assert_eq!(PayoffMatrix::parse(&text).unwrap_err().kind(), ErrorKind::WrongMatrix);
    }

    #[test]
    fn test_bad_choice_token() {
        let text = DEFAULT_MATRIX.replace("D D D 1 1 1", "D X D 1 1 1");
        assert_eq!(PayoffMatrix::parse(&text).unwrap_err().kind(), ErrorKind::WrongMatrix);
    }

    #[test]
    fn test_duplicate_combination() {
        let text = DEFAULT_MATRIX.replace("D D D 1 1 1", "C C C 1 1 1");
        let err = PayoffMatrix::parse(&text).unwrap_err();
        assert!(err.to_string().contains("listed twice"), "{err}");
    }

    #[test]
    fn test_truncated_and_trailing() {
        let truncated: String = DEFAULT_MATRIX.lines().take(7).map(|l| format!("{l}\n")).collect();
        assert_eq!(PayoffMatrix::parse(&truncated).unwrap_err().kind(), ErrorKind::WrongMatrix);

        let trailing = format!("{DEFAULT_MATRIX}extra");
        assert_eq!(PayoffMatrix::parse(&trailing).unwrap_err().kind(), ErrorKind::WrongMatrix);
    }

    #[test]
    fn test_cyrillic_c_accepted() {
        let text = DEFAULT_MATRIX.replace("C C C 7 7 7", "\u{0421} C \u{0441} 7 7 7");
        assert_eq!(PayoffMatrix::parse(&text).unwrap(), PayoffMatrix::default());
    }

    #[test]
    fn test_from_entries_missing() {
        let entries = all_combinations().take(7).map(|c| (c, [1, 1, 1]));
        let err = PayoffMatrix::from_entries(entries).unwrap_err();
        assert!(err.to_string().contains("D D D is missing"), "{err}");
    }

    #[test]
    fn test_to_text_reparses() {
        let matrix = PayoffMatrix::default();
        assert_eq!(PayoffMatrix::parse(&matrix.to_text()).unwrap(), matrix);
    }

    #[test]
    fn test_load_missing_file() {
        let err = PayoffMatrix::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MatrixFileNotOpened);
    }

    #[test]
    fn test_load_non_utf8_is_wrong_matrix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cp1251.txt");
        // 0xD1 is the cp1251 Cyrillic capital Es
        let mut bytes = vec![0xD1];
        bytes.extend_from_slice(&DEFAULT_MATRIX.as_bytes()[1..]);
        std::fs::write(&path, bytes).unwrap();

        let err = PayoffMatrix::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WrongMatrix);
        assert!(err.to_string().contains("offset 0"), "{err}");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.txt");
        std::fs::write(&path, DEFAULT_MATRIX).unwrap();
        assert_eq!(PayoffMatrix::load(&path).unwrap(), PayoffMatrix::default());
    }
}
