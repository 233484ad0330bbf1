//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tictactoe::BoardState;

/// Composite key of the Q-table: a board and the cell played on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateAction {
    pub state: BoardState,
    pub action: usize,
}

impl StateAction {
    pub fn new(state: BoardState, action: usize) -> Self {
        Self { state, action }
    }
}

/// Q-table mapping (state, action) pairs to Q-values
///
/// Only written by the learner. Pairs that were never written read as 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QTable {
    q_values: HashMap<StateAction, f64>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &BoardState, action: usize) -> f64 {
        self.q_values
            .get(&StateAction::new(*state, action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: BoardState, action: usize, value: f64) {
        self.q_values.insert(StateAction::new(state, action), value);
    }

    /// Maximum Q-value over `legal_actions`, or 0.0 when there are none
    pub fn best_value(&self, state: &BoardState, legal_actions: &[usize]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Select greedy action (highest Q-value) from legal actions
    ///
    /// Ties go to the action listed first in `legal_actions`.
    pub fn greedy_action(&self, state: &BoardState, legal_actions: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &action in legal_actions {
            let value = self.get(state, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Iterate over stored entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&StateAction, &f64)> {
        self.q_values.iter()
    }

    /// Entries ordered by key, for stable files and listings
    pub fn sorted_entries(&self) -> Vec<(StateAction, f64)> {
        let mut entries: Vec<(StateAction, f64)> =
            self.q_values.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.q_values.clear();
    }

    /// Get total number of Q-values stored
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }
}

impl FromIterator<(StateAction, f64)> for QTable {
    fn from_iter<I: IntoIterator<Item = (StateAction, f64)>>(iter: I) -> Self {
        Self {
            q_values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> BoardState {
        s.parse().unwrap()
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new();
        assert_eq!(qtable.get(&BoardState::new(), 0), 0.0);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        let state = board("X........");
        qtable.set(state, 4, 1.5);
        assert_eq!(qtable.get(&state, 4), 1.5);
        assert_eq!(qtable.get(&state, 4), 1.5);
        assert_eq!(qtable.get(&state, 5), 0.0);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let mut qtable = QTable::new();
        let state = board("X........");
        qtable.set(state, 4, 1.5);
        qtable.set(state, 4, -0.25);
        assert_eq!(qtable.get(&state, 4), -0.25);
        assert_eq!(qtable.len(), 1);
    }

    #[test]
    fn test_best_value() {
        let mut qtable = QTable::new();
        let state = board("X........");
        qtable.set(state, 1, -0.5);
        qtable.set(state, 2, -0.8);

        // Unwritten action 3 reads as 0.0 and wins over the negatives
        assert_eq!(qtable.best_value(&state, &[1, 2, 3]), 0.0);
        assert_eq!(qtable.best_value(&state, &[1, 2]), -0.5);
    }

    #[test]
    fn test_best_value_without_actions_is_zero() {
        let mut qtable = QTable::new();
        let full = board("XOXXOOOXX");
        qtable.set(full, 0, 3.0);
        assert_eq!(qtable.best_value(&full, &[]), 0.0);
    }

    #[test]
    fn test_greedy_action() {
        let mut qtable = QTable::new();
        let state = board("X........");
        qtable.set(state, 1, 0.5);
        qtable.set(state, 2, 1.5);
        qtable.set(state, 3, 0.8);

        assert_eq!(qtable.greedy_action(&state, &[1, 2, 3]), Some(2));
        assert_eq!(qtable.greedy_action(&state, &[]), None);
    }

    #[test]
    fn test_greedy_ties_keep_first() {
        let mut qtable = QTable::new();
        let state = board("X........");
        qtable.set(state, 5, 0.7);
        qtable.set(state, 7, 0.7);

        assert_eq!(qtable.greedy_action(&state, &[1, 2, 3]), Some(1));
        assert_eq!(qtable.greedy_action(&state, &[4, 5, 6, 7]), Some(5));
    }

    #[test]
    fn test_sorted_entries_are_ordered_by_key() {
        let mut qtable = QTable::new();
        qtable.set(board("X........"), 8, 0.1);
        qtable.set(BoardState::new(), 4, 0.2);
        qtable.set(BoardState::new(), 0, 0.3);

        let actions: Vec<usize> = qtable.sorted_entries().iter().map(|(k, _)| k.action).collect();
        assert_eq!(actions, vec![0, 4, 8]);
    }
}
