//! Repository port for Q-table persistence.

use std::path::Path;

use crate::{Result, q_learning::QTable};

/// Port for persisting and loading Q-tables.
///
/// # Examples
///
/// ```no_run
/// use tictactoe_q::ports::QTableRepository;
/// use tictactoe_q::q_learning::QTable;
/// use std::path::Path;
///
/// fn checkpoint<R: QTableRepository>(
///     repo: &R,
///     table: &QTable,
///     path: &Path,
/// ) -> tictactoe_q::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait QTableRepository {
    /// Write every entry of `table` to `path`, replacing what was there.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or encoding fails.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Read the table stored at `path`.
    ///
    /// Nothing stored at `path` is not an error: implementations return an
    /// empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored data exists but cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<QTable>;
}
