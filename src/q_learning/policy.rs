//! ε-greedy action selection
//!
//! The policy only reads the Q-table. All learning happens in
//! [`QLearner`](super::learner::QLearner).

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::{Error, Result},
    q_learning::q_table::QTable,
    tictactoe::BoardState,
};

/// Default probability of playing a uniformly random legal move
pub const DEFAULT_EXPLORATION_RATE: f64 = 0.2;

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Which branch of the ε-greedy rule produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Explore,
    Exploit,
}

#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    epsilon_decay: f64,
    min_epsilon: f64,
    rng: StdRng,
}

impl EpsilonGreedy {
    /// Create a policy with a constant exploration rate
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            rng: build_rng(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Multiply ε by `decay` after every episode, never going below `min_epsilon`
    pub fn with_decay(mut self, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Pick a move for `state` among `legal_actions`
    pub fn select_action(
        &mut self,
        table: &QTable,
        state: &BoardState,
        legal_actions: &[usize],
    ) -> Result<usize> {
        self.select_with_branch(table, state, legal_actions)
            .map(|(action, _)| action)
    }

    /// Same as [`select_action`](Self::select_action), also reporting the branch taken
    pub fn select_with_branch(
        &mut self,
        table: &QTable,
        state: &BoardState,
        legal_actions: &[usize],
    ) -> Result<(usize, Selection)> {
        if legal_actions.is_empty() {
            return Err(Error::NoValidMoves);
        }

        // A zero rate never draws from the RNG
        if self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon {
            let action = *legal_actions.choose(&mut self.rng).ok_or(Error::NoValidMoves)?;
            return Ok((action, Selection::Explore));
        }

        let action = table
            .greedy_action(state, legal_actions)
            .ok_or(Error::NoValidMoves)?;
        Ok((action, Selection::Exploit))
    }

    /// Decay epsilon after episode
    pub fn end_episode(&mut self) {
        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.min_epsilon);
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORATION_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> BoardState {
        s.parse().unwrap()
    }

    #[test]
    fn greedy_picks_first_legal_cell_on_empty_table() {
        let table = QTable::new();
        let state = board("XX.OO....");
        let legal = state.legal_actions();

        let mut policy = EpsilonGreedy::new(0.0).with_seed(1);
        for _ in 0..10 {
            assert_eq!(
                policy.select_with_branch(&table, &state, &legal).unwrap(),
                (2, Selection::Exploit)
            );
        }
    }

    #[test]
    fn greedy_follows_highest_value() {
        let mut table = QTable::new();
        let state = board("XX.OO....");
        table.set(state, 5, 0.4);
        table.set(state, 7, 0.9);

        let mut policy = EpsilonGreedy::new(0.0);
        assert_eq!(
            policy
                .select_action(&table, &state, &state.legal_actions())
                .unwrap(),
            7
        );
    }

    #[test]
    fn full_exploration_stays_legal() {
        let table = QTable::new();
        let state = board("XX.OO....");
        let legal = state.legal_actions();

        let mut policy = EpsilonGreedy::new(1.0).with_seed(42);
        for _ in 0..50 {
            let (action, branch) = policy.select_with_branch(&table, &state, &legal).unwrap();
            assert!(legal.contains(&action));
            assert_eq!(branch, Selection::Explore);
        }
    }

    #[test]
    fn exploration_reaches_more_than_one_cell() {
        let table = QTable::new();
        let state = BoardState::new();
        let legal = state.legal_actions();

        let mut policy = EpsilonGreedy::new(1.0).with_seed(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(policy.select_action(&table, &state, &legal).unwrap());
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn same_seed_same_moves() {
        let table = QTable::new();
        let state = BoardState::new();
        let legal = state.legal_actions();

        let mut a = EpsilonGreedy::new(0.5).with_seed(9);
        let mut b = EpsilonGreedy::new(0.5).with_seed(9);
        for _ in 0..20 {
            assert_eq!(
                a.select_action(&table, &state, &legal).unwrap(),
                b.select_action(&table, &state, &legal).unwrap()
            );
        }
    }

    #[test]
    fn no_legal_moves_is_an_error() {
        let table = QTable::new();
        let state = board("XOXXOOOXX");
        let mut policy = EpsilonGreedy::default();
        assert!(matches!(
            policy.select_action(&table, &state, &[]),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn epsilon_decays_to_floor() {
        let mut policy = EpsilonGreedy::new(0.2).with_decay(0.5, 0.05);
        policy.end_episode();
        assert!((policy.epsilon() - 0.1).abs() < 1e-12);
        policy.end_episode();
        policy.end_episode();
        assert!((policy.epsilon() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn constant_rate_by_default() {
        let mut policy = EpsilonGreedy::default();
        policy.end_episode();
        assert!((policy.epsilon() - DEFAULT_EXPLORATION_RATE).abs() < 1e-12);
    }
}
