//! CLI subcommands

pub mod play;
pub mod show;

use clap::ValueEnum;

use crate::{app::StoreFormat, q_learning::Bootstrap};

/// `--format` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Msgpack,
}

impl From<FormatArg> for StoreFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => StoreFormat::Csv,
            FormatArg::Msgpack => StoreFormat::MsgPack,
        }
    }
}

/// `--bootstrap` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BootstrapArg {
    /// Every step bootstraps from the final board
    FinalBoard,
    /// Each step bootstraps from the agent's next position
    TrueSuccessor,
}

impl From<BootstrapArg> for Bootstrap {
    fn from(value: BootstrapArg) -> Self {
        match value {
            BootstrapArg::FinalBoard => Bootstrap::FinalBoard,
            BootstrapArg::TrueSuccessor => Bootstrap::TrueSuccessor,
        }
    }
}
