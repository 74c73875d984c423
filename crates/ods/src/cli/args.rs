//! Clap argument definitions for the `ods` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use ods_config::OutputFormat;

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "ods")]
#[command(about = "Parse and check OData $search expressions")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Read settings from this file only, skipping discovery (also ODS_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format flags for `ods parse`. Without a flag the configured format is used.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct FormatArgs {
    /// Print the tree on one line, e.g. {'a' AND 'b'}
    #[arg(long)]
    pub compact: bool,

    /// Print the tree as fully parenthesized $search text
    #[arg(long)]
    pub query: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Print the tree as an indented outline
    #[arg(long)]
    pub tree: bool,
}

impl FormatArgs {
    /// Returns the format selected on the command line, if any.
    pub fn selected(&self) -> Option<OutputFormat> {
        if self.compact {
            Some(OutputFormat::Compact)
        } else if self.query {
            Some(OutputFormat::Query)
        } else if self.json {
            Some(OutputFormat::Json)
        } else if self.tree {
            Some(OutputFormat::Tree)
        } else {
            None
        }
    }
}

/// Arguments for `ods parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// $search values to parse
    #[arg(required = true)]
    pub queries: Vec<String>,

    #[command(flatten)]
    /// Output format selection.
    pub format: FormatArgs,
}

/// Arguments for `ods tokenize`.
#[derive(Args, Debug, Clone)]
pub struct TokenizeCommand {
    /// $search value to tokenize
    pub query: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `ods check`.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// $search values to validate
    #[arg(required = true)]
    pub queries: Vec<String>,
}

/// Arguments for `ods init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.ods.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `ods` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse queries and print their expression trees
    #[command(after_help = "\
QUERY SYNTAX:
  word              Letters only; digits need a phrase
  \"a phrase\"        Quoted text, may contain digits and - . _ ~ : @ / $ ' =
  a b               Both (implicit AND)
  a AND b           Both
  a OR b            Either; OR takes everything after it
  NOT word          Negates a single word or phrase
  (expr)            Grouping

Operators are upper-case; 'and', 'Andrew' and 'ORACLE' are words.

EXAMPLES:
  ods parse 'coffee AND NOT decaf'
  ods parse --compact 'a AND b OR c'
  ods parse --json '(coffee OR tea) \"oat milk\"'")]
    Parse(ParseCommand),

    /// Print the token stream of a query
    Tokenize(TokenizeCommand),

    /// Validate queries, printing ok or the error key for each
    Check(CheckCommand),

    /// Initialize ods configuration in current directory
    Init(InitCommand),

    /// Show configuration files and effective settings
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn format_flags_are_exclusive() {
        let result = Cli::try_parse_from(["ods", "parse", "--json", "--compact", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn format_selection() {
        let cli = Cli::try_parse_from(["ods", "parse", "--query", "a"]).unwrap();
        let Commands::Parse(cmd) = cli.command else {
            panic!("expected parse command");
        };
        assert_eq!(cmd.format.selected(), Some(OutputFormat::Query));
        assert_eq!(FormatArgs::default().selected(), None);
    }

    #[test]
    fn config_path_is_global() {
        let cli = Cli::try_parse_from(["ods", "check", "--config", "a.toml", "x"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));

        let cli = Cli::try_parse_from(["ods", "config"]).unwrap();
        assert_eq!(cli.config, None);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["ods", "-vv", "check", "a"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
