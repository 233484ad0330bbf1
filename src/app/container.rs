//! Dependency injection container for the tictactoe-q application.
//!
//! The container owns the storage adapter and wires it, together with an
//! [`AgentConfig`], into a ready-to-play [`Session`].

use std::{path::Path, sync::Arc};

use tracing::debug;

use super::config::{AgentConfig, StoreFormat};
use crate::{
    Result,
    adapters::{CsvRepository, MsgPackRepository},
    ports::QTableRepository,
    q_learning::{EpsilonGreedy, QLearner, QTable},
    session::Session,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```no_run
/// use tictactoe_q::app::{App, AgentConfig};
///
/// let app = App::new();
/// let mut session = app.open_session(&AgentConfig::default())?;
/// session.play_human(4)?;
/// session.play_agent()?;
/// # Ok::<(), tictactoe_q::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tictactoe_q::app::{App, AgentConfig};
/// use tictactoe_q::adapters::InMemoryRepository;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// let session = app.open_session(&AgentConfig::default())?;
/// assert!(session.table().is_empty());
/// # Ok::<(), tictactoe_q::Error>(())
/// ```
pub struct App {
    /// Repository for Q-table persistence
    repository: Arc<dyn QTableRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app storing Q-tables as CSV.
    pub fn new() -> Self {
        Self::for_format(StoreFormat::Csv)
    }

    /// Create a new app for the given storage format.
    pub fn for_format(format: StoreFormat) -> Self {
        let repository: Arc<dyn QTableRepository + Send + Sync> = match format {
            StoreFormat::Csv => Arc::new(CsvRepository::new()),
            StoreFormat::MsgPack => Arc::new(MsgPackRepository::new()),
        };
        Self {
            repository,
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the Q-table repository.
    pub fn repository(&self) -> Arc<dyn QTableRepository + Send + Sync> {
        Arc::clone(&self.repository)
    }

    /// Load a Q-table; a missing file gives an empty table.
    pub fn load_table(&self, path: &Path) -> Result<QTable> {
        self.repository.load(path)
    }

    /// Validate `config`, load its table and build a session around it.
    ///
    /// The seed comes from the config, falling back to the container default.
    pub fn open_session(&self, config: &AgentConfig) -> Result<Session> {
        config.validate()?;

        let table = self.repository.load(&config.table_path)?;

        let mut policy = EpsilonGreedy::new(config.exploration_rate)
            .with_decay(config.exploration_decay, config.min_exploration_rate);
        if let Some(seed) = config.seed.or(self.default_seed) {
            policy = policy.with_seed(seed);
        }

        let learner = QLearner::new(config.learning_rate, config.discount_factor, config.agent)
            .with_bootstrap(config.bootstrap);

        debug!(
            path = %config.table_path.display(),
            entries = table.len(),
            agent = %config.agent,
            "opening session"
        );

        Ok(Session::new(
            table,
            policy,
            learner,
            self.repository(),
            config.table_path.clone(),
        ))
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    repository: Option<Arc<dyn QTableRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            repository: None,
            default_seed: None,
        }
    }

    /// Set a custom Q-table repository.
    pub fn with_repository<R: QTableRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all sessions opened by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `CsvRepository` by default.
    pub fn build(self) -> App {
        App {
            repository: self
                .repository
                .unwrap_or_else(|| Arc::new(CsvRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, adapters::InMemoryRepository, tictactoe::BoardState};

    #[test]
    fn test_open_session_loads_existing_table() {
        let repo = InMemoryRepository::new();
        let mut table = QTable::new();
        table.set(BoardState::new(), 4, 0.5);
        repo.save(&table, Path::new("q_table.csv")).unwrap();

        let app = App::for_testing().with_repository(repo).build();
        let session = app.open_session(&AgentConfig::default()).unwrap();
        assert_eq!(session.table().get(&BoardState::new(), 4), 0.5);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let app = App::for_testing()
            .with_repository(InMemoryRepository::new())
            .build();
        let config = AgentConfig::default().with_learning_rate(2.0);
        assert!(matches!(
            app.open_session(&config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_default_seed_makes_exploration_repeatable() {
        let play = || {
            let app = App::for_testing()
                .with_repository(InMemoryRepository::new())
                .with_default_seed(7)
                .build();
            let config = AgentConfig::default().with_exploration_rate(1.0);
            let mut session = app.open_session(&config).unwrap();
            session.play_human(4).unwrap();
            session.play_agent().unwrap().position
        };
        assert_eq!(play(), play());
    }
}
