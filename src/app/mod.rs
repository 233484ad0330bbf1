//! Application layer: configuration and the dependency injection container.
//!
//! ```text
//! AgentConfig ──▶ App::open_session ──▶ Session
//!                      │                   │
//!                      │ holds             │ saves through
//!                      ▼                   ▼
//!          Arc<dyn QTableRepository>  (Csv | MsgPack | InMemory)
//! ```
//!
//! The CLI picks a storage format and builds an [`App`]; tests swap in an
//! in-memory repository through [`AppBuilder`].

pub mod config;
pub mod container;

pub use config::{AgentConfig, StoreFormat};
pub use container::{App, AppBuilder};
