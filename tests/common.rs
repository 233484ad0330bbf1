//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::Path;

use tictactoe_q::{
    AgentConfig, App, Session,
    adapters::{CsvRepository, InMemoryRepository},
    tictactoe::BoardState,
};

pub fn board(s: &str) -> BoardState {
    s.parse().unwrap()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

/// Greedy session backed by a CSV file at `path`
pub fn csv_session(path: &Path, config: AgentConfig) -> Session {
    let app = App::for_testing()
        .with_repository(CsvRepository::new())
        .build();
    app.open_session(&config.with_exploration_rate(0.0).with_table_path(path))
        .unwrap()
}

/// Greedy session backed by `repo`
pub fn memory_session(repo: &InMemoryRepository, config: AgentConfig) -> Session {
    let app = App::for_testing().with_repository(repo.clone()).build();
    app.open_session(&config.with_exploration_rate(0.0)).unwrap()
}
