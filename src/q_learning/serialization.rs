//! Serialization support for Q-tables.
//!
//! Two formats are supported:
//!
//! - A flat CSV record set: a `State,Action,Q-Value` header followed by one
//!   record per entry. The state column holds the tuple literal of the nine
//!   cell symbols, e.g. `('X', 'X', ' ', 'O', 'O', ' ', ' ', ' ', ' ')`.
//! - A versioned [`SavedQTable`] snapshot for binary (MessagePack) storage.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    q_learning::q_table::QTable,
    tictactoe::{BOARD_CELLS, BoardState, Cell},
};

/// Header record of the CSV store
pub const CSV_HEADER: [&str; 3] = ["State", "Action", "Q-Value"];

/// Render a board as a tuple literal of cell symbols
pub fn format_state_literal(state: &BoardState) -> String {
    let cells: Vec<String> = state
        .cells
        .iter()
        .map(|cell| format!("'{}'", cell.symbol()))
        .collect();
    format!("({})", cells.join(", "))
}

/// Parse the tuple literal written by [`format_state_literal`].
///
/// Each element must be a single quoted cell symbol (`' '`, `'X'` or `'O'`);
/// single or double quotes are accepted. A trailing comma is allowed.
pub fn parse_state_literal(literal: &str) -> Result<BoardState> {
    let invalid = |reason: &str| Error::InvalidStateLiteral {
        literal: literal.to_string(),
        reason: reason.to_string(),
    };

    let inner = literal
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| invalid("expected a parenthesised tuple"))?;

    let mut tokens: Vec<&str> = inner.split(',').collect();
    if tokens.len() > 1 && tokens.last().is_some_and(|t| t.trim().is_empty()) {
        tokens.pop();
    }

    if tokens.len() != BOARD_CELLS {
        return Err(Error::InvalidBoardLength {
            expected: BOARD_CELLS,
            got: tokens.len(),
            context: literal.to_string(),
        });
    }

    let mut cells = [Cell::Empty; BOARD_CELLS];
    for (position, token) in tokens.iter().enumerate() {
        let chars: Vec<char> = token.trim().chars().collect();
        let symbol = match chars.as_slice() {
            [open, symbol, close] if open == close && (*open == '\'' || *open == '"') => *symbol,
            _ => return Err(invalid(&format!("element {position} is not a quoted cell symbol"))),
        };
        cells[position] = match symbol {
            ' ' => Cell::Empty,
            'X' => Cell::X,
            'O' => Cell::O,
            character => {
                return Err(Error::InvalidCellCharacter {
                    character,
                    position,
                    context: literal.to_string(),
                });
            }
        };
    }

    Ok(BoardState::from_cells(cells))
}

/// Write every entry of `table` as CSV, in key order
pub fn write_csv<W: Write>(table: &QTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for (key, value) in table.sorted_entries() {
        csv_writer.write_record([
            format_state_literal(&key.state),
            key.action.to_string(),
            value.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Read a CSV record set into a fresh table.
///
/// An empty input yields an empty table. Any record that does not parse
/// aborts the load with [`Error::MalformedRecord`].
pub fn read_csv<R: Read>(reader: R) -> Result<QTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(QTable::new());
    }
    if headers.iter().map(str::trim).ne(CSV_HEADER) {
        return Err(Error::MissingHeader {
            expected: CSV_HEADER.join(","),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut table = QTable::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let malformed = |field: &str, message: String| Error::MalformedRecord {
            line,
            field: field.to_string(),
            message,
        };

        if record.len() != CSV_HEADER.len() {
            return Err(malformed(
                "record",
                format!("expected {} fields, got {}", CSV_HEADER.len(), record.len()),
            ));
        }

        let state = parse_state_literal(&record[0]).map_err(|e| malformed("State", e.to_string()))?;

        let action: usize = record[1]
            .trim()
            .parse()
            .map_err(|e| malformed("Action", format!("'{}': {e}", &record[1])))?;
        if action >= BOARD_CELLS {
            return Err(malformed("Action", format!("{action} is not a cell index")));
        }

        let value: f64 = record[2]
            .trim()
            .parse()
            .map_err(|e| malformed("Q-Value", format!("'{}': {e}", &record[2])))?;
        if !value.is_finite() {
            return Err(malformed("Q-Value", format!("{value} is not finite")));
        }

        table.set(state, action, value);
    }

    Ok(table)
}

/// One persisted Q-table entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedEntry {
    pub state: BoardState,
    pub action: usize,
    pub value: f64,
}

/// Versioned snapshot of a Q-table for binary formats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedQTable {
    pub version: u32,
    pub entries: Vec<SavedEntry>,
}

impl SavedQTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &QTable) -> Self {
        Self {
            version: Self::VERSION,
            entries: table
                .sorted_entries()
                .into_iter()
                .map(|(key, value)| SavedEntry {
                    state: key.state,
                    action: key.action,
                    value,
                })
                .collect(),
        }
    }

    /// Rebuild the table, rejecting the same entries CSV loading rejects.
    ///
    /// `MalformedRecord::line` is the 1-based entry number.
    pub fn to_table(&self) -> Result<QTable> {
        if self.version != Self::VERSION {
            return Err(Error::UnsupportedVersion {
                found: self.version,
                expected: Self::VERSION,
            });
        }

        let mut table = QTable::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let malformed = |field: &str, message: String| Error::MalformedRecord {
                line: index as u64 + 1,
                field: field.to_string(),
                message,
            };
            if entry.action >= BOARD_CELLS {
                return Err(malformed(
                    "Action",
                    format!("{} is not a cell index", entry.action),
                ));
            }
            if !entry.value.is_finite() {
                return Err(malformed("Q-Value", format!("{} is not finite", entry.value)));
            }
            table.set(entry.state, entry.action, entry.value);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> BoardState {
        s.parse().unwrap()
    }

    fn sample_table() -> QTable {
        let mut table = QTable::new();
        table.set(board("XX.OO...."), 2, 0.1);
        table.set(board("X........"), 4, -0.271);
        table.set(BoardState::new(), 0, 1.0 / 3.0);
        table
    }

    #[test]
    fn state_literal_matches_tuple_form() {
        assert_eq!(
            format_state_literal(&board("XX.OO....")),
            "('X', 'X', ' ', 'O', 'O', ' ', ' ', ' ', ' ')"
        );
    }

    #[test]
    fn state_literal_parses_back() {
        let state = board("OX.XO..XO");
        assert_eq!(parse_state_literal(&format_state_literal(&state)).unwrap(), state);
        assert_eq!(
            parse_state_literal(r#"("X", " ", " ", " ", "O", " ", " ", " ", " ",)"#).unwrap(),
            board("X...O....")
        );
    }

    #[test]
    fn state_literal_rejects_garbage() {
        assert!(matches!(
            parse_state_literal("__import__('os')"),
            Err(Error::InvalidStateLiteral { .. })
        ));
        assert!(matches!(
            parse_state_literal("('X', 'O')"),
            Err(Error::InvalidBoardLength { got: 2, .. })
        ));
        assert!(matches!(
            parse_state_literal("('X', 'O', ' ', ' ', ' ', ' ', ' ', ' ', 'Q')"),
            Err(Error::InvalidCellCharacter {
                character: 'Q',
                position: 8,
                ..
            })
        ));
        assert!(matches!(
            parse_state_literal("(X, 'O', ' ', ' ', ' ', ' ', ' ', ' ', ' ')"),
            Err(Error::InvalidStateLiteral { .. })
        ));
    }

    #[test]
    fn csv_round_trip() {
        let table = sample_table();
        let mut bytes = Vec::new();
        write_csv(&table, &mut bytes).unwrap();

        let loaded = read_csv(bytes.as_slice()).unwrap();
        assert_eq!(loaded.len(), table.len());
        for (key, value) in table.iter() {
            assert!((loaded.get(&key.state, key.action) - value).abs() < 1e-12);
        }
    }

    #[test]
    fn csv_layout() {
        let mut table = QTable::new();
        table.set(board("XX.OO...."), 2, 0.1);
        let mut bytes = Vec::new();
        write_csv(&table, &mut bytes).unwrap();

        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "State,Action,Q-Value",
                "\"('X', 'X', ' ', 'O', 'O', ' ', ' ', ' ', ' ')\",2,0.1",
            ]
        );
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        assert!(read_csv("".as_bytes()).unwrap().is_empty());
        assert!(read_csv("State,Action,Q-Value\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_records_fail_fast() {
        let bad_action = "State,Action,Q-Value\n\"(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')\",four,0.5\n";
        assert!(matches!(
            read_csv(bad_action.as_bytes()),
            Err(Error::MalformedRecord { line: 2, ref field, .. }) if field == "Action"
        ));

        let bad_value = "State,Action,Q-Value\n\"(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')\",4,x\n";
        assert!(matches!(
            read_csv(bad_value.as_bytes()),
            Err(Error::MalformedRecord { ref field, .. }) if field == "Q-Value"
        ));

        let bad_state = "State,Action,Q-Value\n\"('X')\",4,0.5\n";
        assert!(matches!(
            read_csv(bad_state.as_bytes()),
            Err(Error::MalformedRecord { ref field, .. }) if field == "State"
        ));

        let short = "State,Action,Q-Value\n\"(' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ', ' ')\",4\n";
        assert!(matches!(
            read_csv(short.as_bytes()),
            Err(Error::MalformedRecord { ref field, .. }) if field == "record"
        ));
    }

    #[test]
    fn wrong_header_is_rejected() {
        let text = "board,move,value\n";
        assert!(matches!(
            read_csv(text.as_bytes()),
            Err(Error::MissingHeader { .. })
        ));
    }

    #[test]
    fn snapshot_round_trip() {
        let table = sample_table();
        let saved = SavedQTable::from_table(&table);
        let bytes = rmp_serde::to_vec(&saved).unwrap();
        let loaded: SavedQTable = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(loaded.to_table().unwrap(), table);
    }

    #[test]
    fn snapshot_version_is_checked() {
        let mut saved = SavedQTable::from_table(&sample_table());
        saved.version = 99;
        assert!(matches!(
            saved.to_table(),
            Err(Error::UnsupportedVersion {
                found: 99,
                expected: 1
            })
        ));
    }

    #[test]
    fn snapshot_rejects_what_csv_rejects() {
        let mut off_board = SavedQTable::from_table(&sample_table());
        off_board.entries[0].action = 9;
        assert!(matches!(
            off_board.to_table(),
            Err(Error::MalformedRecord { line: 1, ref field, .. }) if field == "Action"
        ));

        let mut not_finite = SavedQTable::from_table(&sample_table());
        let last = not_finite.entries.len() - 1;
        not_finite.entries[last].value = f64::NAN;
        match not_finite.to_table() {
            Err(Error::MalformedRecord { line, field, .. }) => {
                assert_eq!(line as usize, last + 1);
                assert_eq!(field, "Q-Value");
            }
            other => panic!("expected a malformed entry, got {other:?}"),
        }
    }
}
