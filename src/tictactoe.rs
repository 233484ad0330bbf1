//! Tic-Tac-Toe environment: board, legal moves, terminal detection

pub mod board;
pub mod game;
pub mod lines;

pub use board::{BOARD_CELLS, BoardState, Cell, Player};
pub use game::{GameOutcome, Move};
pub use lines::{LineAnalyzer, WINNING_LINES};
