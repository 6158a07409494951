//! Error kinds for game construction and execution

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Wrong mode name: {0:?} (expected detailed, fast or tournament)")]
    WrongMode(String),

    #[error("Wrong steps count: {0:?} (expected a non-negative integer)")]
    WrongSteps(String),

    #[error("Wrong strategy name: {0:?}")]
    WrongStrategyName(String),

    #[error("Wrong payoff matrix: {0}")]
    WrongMatrix(String),

    #[error("Could not open matrix file {}: {source}", .path.display())]
    MatrixFileNotOpened {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open configs file {}: {source}", .path.display())]
    ConfigsFileNotOpened {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not enough strategies: {mode} mode needs {needed}, got {got}")]
    NotEnoughStrats {
        mode: &'static str,
        needed: &'static str,
        got: usize,
    },

    #[error("Too many strategies: {mode} mode needs exactly 3, got {got}")]
    TooManyStrats { mode: &'static str, got: usize },

    #[error("I/O error while running: {0}")]
    Io(#[from] std::io::Error),
}

/// Fieldless status value of an [`ArenaError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    WrongMode,
    WrongSteps,
    WrongStrategyName,
    WrongMatrix,
    MatrixFileNotOpened,
    ConfigsFileNotOpened,
    NotEnoughStrats,
    TooManyStrats,
    Io,
}

impl ArenaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ArenaError::WrongMode(_) => ErrorKind::WrongMode,
            ArenaError::WrongSteps(_) => ErrorKind::WrongSteps,
            ArenaError::WrongStrategyName(_) => ErrorKind::WrongStrategyName,
            ArenaError::WrongMatrix(_) => ErrorKind::WrongMatrix,
            ArenaError::MatrixFileNotOpened { .. } => ErrorKind::MatrixFileNotOpened,
            ArenaError::ConfigsFileNotOpened { .. } => ErrorKind::ConfigsFileNotOpened,
            ArenaError::NotEnoughStrats { .. } => ErrorKind::NotEnoughStrats,
            ArenaError::TooManyStrats { .. } => ErrorKind::TooManyStrats,
            ArenaError::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArenaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(ArenaError::WrongMode("x".into()).kind(), ErrorKind::WrongMode);
        assert_eq!(
            ArenaError::TooManyStrats { mode: "fast", got: 4 }.kind(),
            ErrorKind::TooManyStrats
        );
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(ArenaError::from(io).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_messages() {
        let e = ArenaError::WrongStrategyName("Nope".into());
        assert_eq!(e.to_string(), "Wrong strategy name: \"Nope\"");

        let e = ArenaError::NotEnoughStrats { mode: "tournament", needed: "at least 4", got: 3 };
        assert_eq!(
            e.to_string(),
            "Not enough strategies: tournament mode needs at least 4, got 3"
        );
    }
}
