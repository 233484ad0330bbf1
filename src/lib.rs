//! Tabular Q-learning Tic-Tac-Toe agent
//!
//! This crate provides:
//! - Tic-Tac-Toe board, win detection and game outcomes
//! - Q-table with epsilon-greedy move selection and end-of-episode updates
//! - CSV and MessagePack persistence of the learned table
//! - A turn-based session that plays a human against the agent and learns
//!   from every finished game

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod ports;
pub mod q_learning;
pub mod session;
pub mod tictactoe;

pub use app::{AgentConfig, App, StoreFormat};
pub use error::{Error, Result};
pub use q_learning::{Bootstrap, EpisodeTrace, EpsilonGreedy, QLearner, QTable};
pub use session::{AgentMove, Phase, Session};
pub use tictactoe::{BoardState, Cell, GameOutcome, Player};
