//! Terminal front-end for playing against the agent

pub mod commands;
pub mod output;
