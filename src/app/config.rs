//! Configuration types for session creation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::{
        Bootstrap, DEFAULT_DISCOUNT_FACTOR, DEFAULT_EXPLORATION_RATE, DEFAULT_LEARNING_RATE,
    },
    tictactoe::Player,
};

/// Storage format of the Q-table file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFormat {
    /// `State,Action,Q-Value` records
    #[default]
    Csv,
    /// Versioned MessagePack snapshot
    MsgPack,
}

/// Configuration for creating a learning session.
///
/// # Examples
///
/// ```
/// use tictactoe_q::app::AgentConfig;
/// use tictactoe_q::q_learning::Bootstrap;
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_exploration_rate(0.1)
///     .with_bootstrap(Bootstrap::TrueSuccessor)
///     .with_table_path("runs/q_table.csv");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Step size α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    /// Probability of a uniformly random move
    pub exploration_rate: f64,
    /// Multiplier applied to the exploration rate after each game
    pub exploration_decay: f64,
    /// Floor for the decayed exploration rate
    pub min_exploration_rate: f64,
    /// Successor used when bootstrapping a step
    pub bootstrap: Bootstrap,
    /// Mark placed by the agent; the human plays the other one and moves first
    pub agent: Player,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Where the Q-table is loaded from and saved to
    pub table_path: PathBuf,
    pub format: StoreFormat,
}

impl AgentConfig {
    /// Set the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the exploration rate.
    pub fn with_exploration_rate(mut self, exploration_rate: f64) -> Self {
        self.exploration_rate = exploration_rate;
        self
    }

    /// Decay the exploration rate by `decay` per game, down to `min_rate`.
    pub fn with_exploration_decay(mut self, decay: f64, min_rate: f64) -> Self {
        self.exploration_decay = decay;
        self.min_exploration_rate = min_rate;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_agent(mut self, agent: Player) -> Self {
        self.agent = agent;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = path.into();
        self
    }

    pub fn with_format(mut self, format: StoreFormat) -> Self {
        self.format = format;
        self
    }

    /// Check that every rate lies in its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn check(name: &str, value: f64, valid: bool) -> Result<()> {
            if value.is_finite() && valid {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} = {value} is out of range"),
                })
            }
        }

        let lr = self.learning_rate;
        check("learning_rate", lr, lr > 0.0 && lr <= 1.0)?;
        let gamma = self.discount_factor;
        check("discount_factor", gamma, (0.0..=1.0).contains(&gamma))?;
        let eps = self.exploration_rate;
        check("exploration_rate", eps, (0.0..=1.0).contains(&eps))?;
        let decay = self.exploration_decay;
        check("exploration_decay", decay, (0.0..=1.0).contains(&decay))?;
        let floor = self.min_exploration_rate;
        check(
            "min_exploration_rate",
            floor,
            (0.0..=1.0).contains(&floor) && floor <= eps,
        )?;

        if self.table_path.as_os_str().is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "table_path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    /// α = 0.1, γ = 0.9, ε = 0.2 constant, agent plays O, table in `q_table.csv`
    fn default() -> Self {
        Self {
            learning_rate: DEFAULT_LEARNING_RATE,
            discount_factor: DEFAULT_DISCOUNT_FACTOR,
            exploration_rate: DEFAULT_EXPLORATION_RATE,
            exploration_decay: 1.0,
            min_exploration_rate: 0.0,
            bootstrap: Bootstrap::default(),
            agent: Player::O,
            seed: None,
            table_path: PathBuf::from(crate::adapters::csv_repository::DEFAULT_CSV_PATH),
            format: StoreFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AgentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.discount_factor, 0.9);
        assert_eq!(config.exploration_rate, 0.2);
        assert_eq!(config.agent, Player::O);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad = [
            AgentConfig::default().with_learning_rate(0.0),
            AgentConfig::default().with_learning_rate(1.5),
            AgentConfig::default().with_discount_factor(-0.1),
            AgentConfig::default().with_exploration_rate(f64::NAN),
            AgentConfig::default().with_exploration_decay(1.2, 0.0),
            AgentConfig::default().with_exploration_decay(0.9, 0.5),
            AgentConfig::default().with_table_path(""),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(Error::InvalidConfiguration { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn config_serializes_to_json() {
        let config = AgentConfig::default().with_format(StoreFormat::MsgPack);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"format\":\"msg_pack\""));
        let back: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
