//! CLI module for the claim adjudicator
//!
//! - `serve`: HTTP API server
//! - `ask`: adjudicate one query and print the result

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

/// Claim Adjudicator - retrieval-grounded insurance claim decisions
#[derive(Parser)]
#[command(name = "claim-adjudicator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Adjudicate a single query and print the decision as JSON
    Ask(ask::AskArgs),
}
