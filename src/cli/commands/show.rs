//! Show command - list the learned Q-values

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use super::FormatArg;
use crate::{
    app::App,
    cli::output::{format_number, print_kv, print_section},
    q_learning::{QTable, StateAction, serialization::format_state_literal},
    tictactoe::BoardState,
};

#[derive(Parser, Debug)]
#[command(about = "Print the stored Q-table")]
pub struct ShowArgs {
    /// Q-table file
    #[arg(long, short = 't', default_value = "q_table.csv")]
    pub table: PathBuf,

    /// Storage format of the Q-table file
    #[arg(long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Only list entries for this board (9 characters, `.` for empty)
    #[arg(long)]
    pub state: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub state: String,
    pub action: usize,
    pub value: f64,
}

/// Entries of `table`, in key order, optionally restricted to one board
pub fn collect_entries(table: &QTable, state: Option<&BoardState>) -> Vec<(StateAction, f64)> {
    table
        .sorted_entries()
        .into_iter()
        .filter(|(key, _)| state.is_none_or(|s| &key.state == s))
        .collect()
}

pub fn execute(args: ShowArgs) -> Result<()> {
    let app = App::for_format(args.format.into());
    let table = app
        .load_table(&args.table)
        .with_context(|| format!("Failed to load Q-table {}", args.table.display()))?;

    let filter = args
        .state
        .as_deref()
        .map(str::parse::<BoardState>)
        .transpose()
        .context("Invalid --state")?;

    let entries = collect_entries(&table, filter.as_ref());

    if args.json {
        let views: Vec<EntryView> = entries
            .iter()
            .map(|(key, value)| EntryView {
                state: key.state.compact(),
                action: key.action,
                value: *value,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    print_section("Q-Table");
    print_kv("File", &args.table.display().to_string());
    print_kv("Entries", &format_number(table.len()));
    if let Some(state) = &filter {
        print_kv("Filtered to", &state.compact());
    }
    println!();

    for (key, value) in &entries {
        println!(
            "State: {} | Action: {} | Q-Value: {value}",
            format_state_literal(&key.state),
            key.action,
        );
    }

    Ok(())
}
