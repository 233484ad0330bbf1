//! tictactoe-q CLI - play Tic-Tac-Toe against a Q-learning agent
//!
//! The agent learns from every finished game and keeps its Q-table on disk
//! between runs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "tictactoe-q")]
#[command(version, about = "Play Tic-Tac-Toe against a learning agent", long_about = None)]
struct Cli {
    /// Log learner updates and storage activity
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively; the agent learns after each game
    Play(tictactoe_q::cli::commands::play::PlayArgs),

    /// Print the stored Q-table
    Show(tictactoe_q::cli::commands::show::ShowArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tictactoe_q=debug"
    } else {
        "tictactoe_q=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => tictactoe_q::cli::commands::play::execute(args),
        Commands::Show(args) => tictactoe_q::cli::commands::show::execute(args),
    }
}
