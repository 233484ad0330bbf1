//! In-memory Q-table repository for testing.
//!
//! Stores CSV-encoded tables in a shared map so tests exercise the same
//! encoding as the file store without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    Result,
    ports::QTableRepository,
    q_learning::{QTable, serialization},
};

fn key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[derive(Default)]
struct Storage {
    tables: HashMap<String, Vec<u8>>,
    saves: usize,
}

/// In-memory repository for testing.
///
/// All clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use tictactoe_q::adapters::InMemoryRepository;
/// use tictactoe_q::ports::QTableRepository;
/// use tictactoe_q::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&QTable::new(), Path::new("q_table.csv"))?;
/// assert!(repo.contains(Path::new("q_table.csv")));
/// assert_eq!(repo.save_count(), 1);
/// # Ok::<(), tictactoe_q::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<Storage>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of `save` calls made so far, across all paths.
    pub fn save_count(&self) -> usize {
        self.storage().saves
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage()
            .tables
            .contains_key(&key(path))
    }

    /// Raw stored text, if any.
    pub fn raw(&self, path: &Path) -> Option<String> {
        self.storage()
            .tables
            .get(&key(path))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl QTableRepository for InMemoryRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let mut bytes = Vec::new();
        serialization::write_csv(table, &mut bytes)?;

        let mut storage = self.storage();
        storage.tables.insert(key(path), bytes);
        storage.saves += 1;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<QTable> {
        let storage = self.storage();
        match storage.tables.get(&key(path)) {
            Some(bytes) => serialization::read_csv(bytes.as_slice()),
            None => Ok(QTable::new()),
        }
    }
}
