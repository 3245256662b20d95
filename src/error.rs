//! Error types for configuration, the rules adapter, decisions, and UCI handling.

use crate::register::MAX_HORIZON;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The horizon does not fit the register's move slots.
    #[error("horizon {requested} out of range, expected 1..={max}", max = MAX_HORIZON)]
    HorizonOutOfRange {
        /// The rejected ply count.
        requested: u8,
    },
}

/// Errors from the `shakmaty`-backed game adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The FEN could not be parsed or describes an illegal position.
    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen {
        /// The rejected FEN string.
        fen: String,
        /// What the rules library reported.
        reason: String,
    },

    /// The UCI move is malformed or not legal in the current position.
    #[error("illegal move: {uci_move}")]
    IllegalMove {
        /// The rejected move text.
        uci_move: String,
    },
}

/// A decision could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The root position is already checkmate or stalemate.
    #[error("no legal move available at the root")]
    NoLegalMoves,
}

/// UCI protocol errors. Logged and skipped by the command loop.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen`.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    /// The position could not be set up.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The depth value in `go depth` or `setoption` could not be used.
    #[error("invalid depth: {value}")]
    InvalidDepth {
        /// The offending value.
        value: String,
    },

    /// A `setoption` value could not be parsed.
    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue {
        /// Option name as sent.
        name: String,
        /// Value as sent.
        value: String,
    },

    /// `setoption` named an option the engine does not expose.
    #[error("unknown option: {name}")]
    UnknownOption {
        /// Option name as sent.
        name: String,
    },

    /// Reading stdin failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GameError, SearchError, UciError};

    #[test]
    fn horizon_error_display() {
        let err = ConfigError::HorizonOutOfRange { requested: 9 };
        assert_eq!(format!("{err}"), "horizon 9 out of range, expected 1..=6");
    }

    #[test]
    fn search_error_display() {
        assert_eq!(
            SearchError::NoLegalMoves.to_string(),
            "no legal move available at the root"
        );
    }

    #[test]
    fn uci_error_wraps_game_error() {
        let err: UciError = GameError::IllegalMove {
            uci_move: "e2e5".to_string(),
        }
        .into();
        assert!(matches!(err, UciError::Game(GameError::IllegalMove { .. })));
        assert_eq!(err.to_string(), "illegal move: e2e5");
    }
}
