//! CSV implementation of the Q-table repository.
//!
//! This is the default store: a header record followed by one
//! `State,Action,Q-Value` record per entry.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    Result,
    error::Error,
    ports::QTableRepository,
    q_learning::{QTable, serialization},
};

/// Default file name of the CSV store
pub const DEFAULT_CSV_PATH: &str = "q_table.csv";

/// CSV-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_q::adapters::CsvRepository;
/// use tictactoe_q::ports::QTableRepository;
/// use std::path::Path;
///
/// let repo = CsvRepository::new();
/// let table = repo.load(Path::new("q_table.csv"))?;
/// repo.save(&table, Path::new("q_table.csv"))?;
/// # Ok::<(), tictactoe_q::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRepository;

impl CsvRepository {
    /// Create a new CSV repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for CsvRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        serialization::write_csv(table, BufWriter::new(file))?;
        debug!(path = %path.display(), entries = table.len(), "saved Q-table as CSV");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<QTable> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no Q-table found, starting empty");
                return Ok(QTable::new());
            }
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        let table = serialization::read_csv(BufReader::new(file))?;
        info!(path = %path.display(), entries = table.len(), "loaded Q-table");
        Ok(table)
    }
}
