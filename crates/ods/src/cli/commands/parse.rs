//! Implementation of `ods parse`.

use std::process::ExitCode;

use log::debug;
use ods_config::OutputFormat;
use ods_search::SearchOption;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{print_json, print_query_error, render_expression},
};

/// Parses each query and prints its expression tree.
///
/// Every query is attempted; the exit code is a failure if any of them failed.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let format = cmd.format.selected().unwrap_or(ctx.config.output.format);
    debug!("parsing {} queries as {format}", cmd.queries.len());

    let mut parsed = Vec::new();
    let mut failed = false;

    for query in &cmd.queries {
        if !ctx.check_length(query) {
            failed = true;
            continue;
        }
        match SearchOption::parse(query.as_str()) {
            Ok(option) => parsed.push(option),
            Err(err) => {
                print_query_error(&err, ctx.style);
                failed = true;
            }
        }
    }

    if format == OutputFormat::Json {
        if !print_json(&parsed) {
            return ExitCode::FAILURE;
        }
    } else {
        let show_headers = cmd.queries.len() > 1;
        for option in &parsed {
            if show_headers {
                println!("{}", ctx.style.header(option.text()));
            }
            if let Some(rendered) = render_expression(option.expression(), format) {
                println!("{rendered}");
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
