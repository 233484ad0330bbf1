//! Tabular Q-learning for the agent side of the game
//!
//! The learning core is split into three pieces that share one owned
//! [`QTable`]:
//!
//! - [`EpsilonGreedy`] reads the table to pick moves during a game
//! - [`QLearner`] writes the table once the game is over
//! - [`serialization`] moves the table to and from durable storage
//!
//! ## Usage Example
//!
//! ```
//! use tictactoe_q::q_learning::{EpisodeTrace, EpsilonGreedy, QLearner, QTable};
//! use tictactoe_q::tictactoe::{BoardState, GameOutcome, Player};
//!
//! let mut table = QTable::new();
//! let mut policy = EpsilonGreedy::new(0.0);
//! let learner = QLearner::default();
//!
//! let state = BoardState::new().apply(0, Player::X)?;
//! let action = policy.select_action(&table, &state, &state.legal_actions())?;
//! assert_eq!(action, 1);
//!
//! let mut trace = EpisodeTrace::new();
//! trace.record(state, action);
//! let final_state = state.apply(action, Player::O)?;
//! learner.update(&mut table, &trace, GameOutcome::Win(Player::O), &final_state);
//! assert!((table.get(&state, action) - 0.1).abs() < 1e-12);
//! # Ok::<(), tictactoe_q::Error>(())
//! ```

pub mod learner;
pub mod policy;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use learner::{
    Bootstrap, DEFAULT_DISCOUNT_FACTOR, DEFAULT_LEARNING_RATE, EpisodeTrace, QLearner,
    UpdateSummary,
};
pub use policy::{DEFAULT_EXPLORATION_RATE, EpsilonGreedy, Selection};
pub use q_table::{QTable, StateAction};
pub use serialization::{SavedEntry, SavedQTable};
