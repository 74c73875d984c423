//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process::ExitCode,
};

use log::info;
use ods_config::{Config, ConfigSource};

use crate::cli::output::Style;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Where configuration was read from.
    pub source: ConfigSource,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Styling for terminal output.
    pub style: Style,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// `config_path` names a file to use instead of discovery.
    pub fn load(no_color: bool, config_path: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let source = ConfigSource::resolve(&cwd, config_path);
        let config = load_config_or_failure(&source)?;
        let style = Style::new(use_color(&config, no_color));
        Ok(Self {
            cwd,
            source,
            config,
            style,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only(no_color: bool, config_path: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let source = ConfigSource::resolve(&cwd, config_path);
        let config = Config::default();
        let style = Style::new(use_color(&config, no_color));
        Ok(Self {
            cwd,
            source,
            config,
            style,
        })
    }

    /// Returns false, after reporting an error, if `query` exceeds the configured length limit.
    pub fn check_length(&self, query: &str) -> bool {
        let limit = &self.config.parse;
        if limit.exceeds_limit(query) {
            eprintln!(
                "{} query is {} bytes, longer than max_query_length ({})",
                self.style.error("error:"),
                query.len(),
                limit.max_query_length
            );
            return false;
        }
        true
    }
}

/// Colors are used only on a terminal, and only if neither config nor flag disables them.
fn use_color(config: &Config, no_color: bool) -> bool {
    config.output.color && !no_color && io::stdout().is_terminal()
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from `source` or exits with an error.
fn load_config_or_failure(source: &ConfigSource) -> Result<Config, ExitCode> {
    let config = Config::load_from(source).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })?;
    match &config.config_root {
        Some(root) => info!("using configuration from {}", root.display()),
        None => info!("no configuration files found, using defaults"),
    }
    Ok(config)
}
