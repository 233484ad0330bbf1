//! Error types for the tictactoe-q crate

use thiserror::Error;

/// Everything that can go wrong while playing, learning or storing a table
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("cell {position} is already taken")]
    InvalidMove { position: usize },

    #[error("cell {position} is off the board (expected 0-8)")]
    InvalidPosition { position: usize },

    #[error("the game is over; reset to play again")]
    GameOver,

    #[error("it is not the human player's turn")]
    NotHumanTurn,

    #[error("it is not the agent's turn")]
    NotAgentTurn,

    #[error("no empty cell to move into")]
    NoValidMoves,

    #[error("expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("unknown cell symbol '{character}' at cell {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid state literal '{literal}': {reason}")]
    InvalidStateLiteral { literal: String, reason: String },

    #[error("malformed record on line {line}: bad {field} ({message})")]
    MalformedRecord {
        line: u64,
        field: String,
        message: String,
    },

    #[error("missing or unexpected header: expected '{expected}', found '{found}'")]
    MissingHeader { expected: String, found: String },

    #[error("Q-table snapshot version {found} is not supported (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "perform I/O".to_string(),
            source,
        }
    }
}
