//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod parse;
pub mod tokenize;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Tokenize(cmd) => tokenize::run(ctx, &cmd),
        Commands::Check(cmd) => check::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
