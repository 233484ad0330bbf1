//! End-of-episode Q-learning update
//!
//! The agent collects an [`EpisodeTrace`] while a game is played and hands it
//! to [`QLearner::update`] once the board is terminal. The whole trace is
//! replayed in play order against the Q-table:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! What `s'` and `r` are for each step depends on [`Bootstrap`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    q_learning::q_table::QTable,
    tictactoe::{BoardState, GameOutcome, Player},
};

/// Default step size α
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;
/// Default discount factor γ
pub const DEFAULT_DISCOUNT_FACTOR: f64 = 0.9;

/// Successor state used as `s'` when replaying a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bootstrap {
    /// Every step bootstraps from the final board and receives the terminal
    /// reward.
    #[default]
    FinalBoard,
    /// Each step bootstraps from the board the agent faced on its next turn.
    /// Only the last step receives the terminal reward.
    TrueSuccessor,
}

/// The (state before move, action) pairs played by the agent in one game
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeTrace {
    steps: Vec<(BoardState, usize)>,
}

impl EpisodeTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that the agent played `action` on `state`
    pub fn record(&mut self, state: BoardState, action: usize) {
        self.steps.push((state, action));
    }

    pub fn iter(&self) -> impl Iterator<Item = &(BoardState, usize)> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }
}

impl FromIterator<(BoardState, usize)> for EpisodeTrace {
    fn from_iter<I: IntoIterator<Item = (BoardState, usize)>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// What a single call to [`QLearner::update`] changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdateSummary {
    pub steps: usize,
    pub reward: f64,
    pub mean_abs_delta: f64,
}

/// Q-learner (off-policy TD control, applied once per episode)
#[derive(Debug, Clone, Copy)]
pub struct QLearner {
    learning_rate: f64,
    discount_factor: f64,
    bootstrap: Bootstrap,
    agent: Player,
}

impl QLearner {
    /// Create a learner for the side playing `agent`
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `agent` - Mark placed by the learning side
    pub fn new(learning_rate: f64, discount_factor: f64, agent: Player) -> Self {
        Self {
            learning_rate,
            discount_factor,
            bootstrap: Bootstrap::default(),
            agent,
        }
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn bootstrap(&self) -> Bootstrap {
        self.bootstrap
    }

    /// Q-learning update for one state-action pair
    fn td_update(
        &self,
        table: &mut QTable,
        state: BoardState,
        action: usize,
        reward: f64,
        next_state: &BoardState,
    ) -> f64 {
        let current_q = table.get(&state, action);
        let max_next_q = table.best_value(next_state, &next_state.legal_actions());
        let td_target = reward + self.discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + self.learning_rate * td_error;
        table.set(state, action, new_q);
        new_q - current_q
    }

    /// Replay a finished episode into `table`
    pub fn update(
        &self,
        table: &mut QTable,
        trace: &EpisodeTrace,
        outcome: GameOutcome,
        final_state: &BoardState,
    ) -> UpdateSummary {
        let reward = outcome.reward_for(self.agent);
        let mut total_abs_delta = 0.0;

        for (i, &(state, action)) in trace.steps.iter().enumerate() {
            let (next_state, step_reward) = match self.bootstrap {
                Bootstrap::FinalBoard => (*final_state, reward),
                Bootstrap::TrueSuccessor => match trace.steps.get(i + 1) {
                    Some((next, _)) => (*next, 0.0),
                    None => (*final_state, reward),
                },
            };

            let delta = self.td_update(table, state, action, step_reward, &next_state);
            total_abs_delta += delta.abs();
        }

        let steps = trace.len();
        let mean_abs_delta = if steps == 0 {
            0.0
        } else {
            total_abs_delta / steps as f64
        };

        debug!(
            steps,
            reward,
            mean_abs_delta,
            bootstrap = ?self.bootstrap,
            "applied end-of-episode update"
        );

        UpdateSummary {
            steps,
            reward,
            mean_abs_delta,
        }
    }
}

impl Default for QLearner {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_DISCOUNT_FACTOR, Player::O)
    }
}
