//! ods: inspect OData `$search` expressions from the command line.
//!
//! Parses queries with `ods-search` and prints the resulting expression tree, the token
//! stream, or a diagnostic pointing at the offending character.

#![warn(missing_docs)]

mod cli;

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use crate::cli::{
    args::{Cli, Commands},
    commands,
    context::CommandContext,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let ctx = match &cli.command {
        // init must work even when an existing config file is broken
        Commands::Init(_) => CommandContext::load_cwd_only(cli.no_color, config_path),
        _ => CommandContext::load(cli.no_color, config_path),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx)
}

/// Installs the logger. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
