//! Implementation of `ods check`.

use std::process::ExitCode;

use ods_search::parse_query;

use crate::cli::{args::CheckCommand, context::CommandContext};

/// Key reported for queries rejected by `max_query_length`.
const QUERY_TOO_LONG: &str = "QUERY_TOO_LONG";

/// Validates each query, printing `ok` or the error key followed by the query.
pub fn run(ctx: &CommandContext, cmd: &CheckCommand) -> ExitCode {
    let style = ctx.style;
    let mut failed = false;

    for query in &cmd.queries {
        let status = if ctx.config.parse.exceeds_limit(query) {
            Err(QUERY_TOO_LONG)
        } else {
            parse_query(query).map(|_| ()).map_err(|err| err.key())
        };

        match status {
            Ok(()) => println!("{} {query}", style.success("ok")),
            Err(key) => {
                failed = true;
                println!("{} {query}", style.error(key));
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
