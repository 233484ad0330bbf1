//! Output formatting for the CLI

use std::io::{self, Write};

use crate::tictactoe::{BoardState, Cell};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Render the board as a grid, numbering empty cells 1-9 for input
pub fn format_board_with_hints(board: &BoardState) -> String {
    let cell = |pos: usize| match board.get(pos) {
        Cell::Empty => char::from(b'1' + pos as u8),
        other => other.to_char(),
    };

    (0..3)
        .map(|row| {
            let base = row * 3;
            format!(" {} | {} | {}", cell(base), cell(base + 1), cell(base + 2))
        })
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}

/// Write a prompt without a trailing newline and flush it
pub fn prompt<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "{text}")?;
    out.flush()
}
