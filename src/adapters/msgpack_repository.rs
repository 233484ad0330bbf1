//! MessagePack implementation of the Q-table repository.
//!
//! This adapter stores a versioned [`SavedQTable`] snapshot using rmp_serde
//! for compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    Result,
    error::Error,
    ports::QTableRepository,
    q_learning::{QTable, SavedQTable},
};

/// MessagePack-based Q-table repository.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_q::adapters::MsgPackRepository;
/// use tictactoe_q::ports::QTableRepository;
/// use tictactoe_q::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// repo.save(&QTable::new(), Path::new("q_table.msgpack"))?;
/// let loaded = repo.load(Path::new("q_table.msgpack"))?;
/// # Ok::<(), tictactoe_q::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl QTableRepository for MsgPackRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, &SavedQTable::from_table(table)).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize Q-table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("write file {path:?}"),
            source,
        })?;

        debug!(path = %path.display(), entries = table.len(), "saved Q-table as MessagePack");
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

        let saved: SavedQTable = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::SerializationContext {
                operation: "deserialize Q-table from MessagePack".to_string(),
                message: e.to_string(),
            },
        )?;

        let table = saved.to_table()?;
        info!(path = %path.display(), entries = table.len(), "loaded Q-table");
        Ok(table)
    }
}
