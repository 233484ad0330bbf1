//! Adapters implementing domain ports.
//!
//! Each adapter is one storage format for the `QTableRepository` port.

pub mod csv_repository;
pub mod in_memory_repository;
pub mod msgpack_repository;

pub use csv_repository::CsvRepository;
pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
