//! Play command - play against the agent in the terminal

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;

use super::{BootstrapArg, FormatArg};
use crate::{
    Error,
    app::{AgentConfig, App},
    cli::output::{format_board_with_hints, prompt},
    q_learning::{DEFAULT_DISCOUNT_FACTOR, DEFAULT_EXPLORATION_RATE, DEFAULT_LEARNING_RATE, Selection},
    session::{Phase, Session},
    tictactoe::GameOutcome,
};

#[derive(Parser, Debug)]
#[command(about = "Play against the learning agent")]
pub struct PlayArgs {
    /// Q-table file, created on first save
    #[arg(long, short = 't', default_value = "q_table.csv")]
    pub table: PathBuf,

    /// Storage format of the Q-table file
    #[arg(long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability of a random agent move
    #[arg(long, default_value_t = DEFAULT_EXPLORATION_RATE)]
    pub exploration_rate: f64,

    /// Step size α
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE)]
    pub learning_rate: f64,

    /// Discount factor γ
    #[arg(long, default_value_t = DEFAULT_DISCOUNT_FACTOR)]
    pub discount_factor: f64,

    /// Successor state used for bootstrapping
    #[arg(long, value_enum, default_value = "final-board")]
    pub bootstrap: BootstrapArg,
}

impl PlayArgs {
    pub fn to_config(&self) -> AgentConfig {
        let mut config = AgentConfig::default()
            .with_table_path(&self.table)
            .with_format(self.format.into())
            .with_exploration_rate(self.exploration_rate)
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount_factor)
            .with_bootstrap(self.bootstrap.into());
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// Tally of the games played in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub games: usize,
    pub human_wins: usize,
    pub agent_wins: usize,
    pub draws: usize,
    pub entries: usize,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = args.to_config();
    let app = App::for_format(config.format);
    let session = app
        .open_session(&config)
        .with_context(|| format!("Failed to open Q-table {}", config.table_path.display()))?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let summary = run(session, stdin.lock(), stdout.lock())?;

    println!(
        "Saved {} Q-values to {} after {} game(s)",
        summary.entries,
        config.table_path.display(),
        summary.games
    );
    Ok(())
}

/// Drive `session` from line-based `input` until the player quits or input ends.
///
/// The table is saved after every finished game and once more on exit.
pub fn run<R: BufRead, W: Write>(
    mut session: Session,
    mut input: R,
    mut out: W,
) -> Result<PlaySummary> {
    let human = session.human();
    let agent = session.agent();
    let mut summary = PlaySummary::default();

    writeln!(out, "You are {human}, the agent is {agent}. Enter a cell 1-9, or q to quit.")?;

    loop {
        match session.phase() {
            Phase::AwaitingAgentMove => {
                let reply = session.play_agent()?;
                let how = match reply.selection {
                    Selection::Explore => "exploring",
                    Selection::Exploit => "best known move",
                };
                writeln!(out, "Agent plays {} ({how})", reply.position + 1)?;
            }
            Phase::Terminal(outcome) => {
                summary.games += 1;
                let message = match outcome {
                    GameOutcome::Win(winner) if winner == human => {
                        summary.human_wins += 1;
                        "You win!"
                    }
                    GameOutcome::Win(_) => {
                        summary.agent_wins += 1;
                        "Agent wins!"
                    }
                    GameOutcome::Draw => {
                        summary.draws += 1;
                        "It's a draw!"
                    }
                };
                writeln!(out, "{}\n{message}", format_board_with_hints(session.board()))?;

                prompt(&mut out, "Play again? [y/N] ")?;
                match read_line(&mut input)? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => session.reset(),
                    _ => break,
                }
            }
            Phase::AwaitingPlayerMove => {
                writeln!(out, "{}", format_board_with_hints(session.board()))?;
                prompt(&mut out, "Your move: ")?;

                let Some(line) = read_line(&mut input)? else {
                    break;
                };
                if line.eq_ignore_ascii_case("q") {
                    break;
                }

                let Some(position) = line
                    .parse::<usize>()
                    .ok()
                    .and_then(|cell| cell.checked_sub(1))
                else {
                    writeln!(out, "'{line}' is not a cell number")?;
                    continue;
                };

                match session.play_human(position) {
                    Ok(_) => {}
                    Err(Error::InvalidMove { .. }) => {
                        writeln!(out, "Cell {} is already taken", position + 1)?;
                    }
                    Err(Error::InvalidPosition { .. }) => {
                        writeln!(out, "Choose a cell from 1 to 9")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    let table = session.shutdown().context("Failed to save Q-table")?;
    summary.entries = table.len();
    Ok(summary)
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
