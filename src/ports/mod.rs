//! Ports (trait boundaries) for external dependencies.
//!
//! The learning core owns these traits; storage formats implement them in
//! the adapters module.

pub mod repository;

pub use repository::QTableRepository;
