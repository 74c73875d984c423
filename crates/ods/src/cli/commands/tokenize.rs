//! Implementation of `ods tokenize`.

use std::process::ExitCode;

use ods_search::{QueryError, tokenize};

use crate::cli::{
    args::TokenizeCommand,
    context::CommandContext,
    output::{JsonTokens, print_json, print_query_error, token_table},
};

/// Prints the token stream of a query.
pub fn run(ctx: &CommandContext, cmd: &TokenizeCommand) -> ExitCode {
    let query = cmd.query.as_str();
    if !ctx.check_length(query) {
        return ExitCode::FAILURE;
    }

    let tokens = match tokenize(query) {
        Ok(tokens) => tokens,
        Err(err) => {
            print_query_error(&QueryError::new(err.into(), query), ctx.style);
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        let output = JsonTokens {
            query,
            tokens: &tokens,
        };
        if !print_json(&output) {
            return ExitCode::FAILURE;
        }
    } else if tokens.is_empty() {
        println!("{}", ctx.style.dim("(no tokens)"));
    } else {
        println!("{}", token_table(&tokens));
    }

    ExitCode::SUCCESS
}
