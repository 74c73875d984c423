//! Configuration system for ods.
//!
//! ods uses TOML configuration files named `.ods.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.ods.toml` files
//! found, then loading `~/.ods.toml` as the global config with lowest precedence.
//!
//! A single file can be named instead, on the command line or through `ODS_CONFIG`; see
//! [`ConfigSource`].

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;

use std::{
    fmt,
    path::{Path, PathBuf},
};

pub use discovery::{
    CONFIG_ENV, CONFIG_FILENAME, ConfigSource, discover_config_files, global_config_path,
    is_global_config, require_global_config_path,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawOutputSettings, RawParseSettings, is_root_config, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};

/// Top-level merged configuration for ods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Parser settings.
    pub parse: ParseSettings,
    /// Output settings.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.ods.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from(&ConfigSource::Discover(cwd.to_path_buf()))
    }

    /// Loads configuration from the files `source` names.
    pub fn load_from(source: &ConfigSource) -> Result<Self, ConfigError> {
        Self::load_from_files(&source.files()?)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output has the same layout as a `.ods.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            parse: &self.parse,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Parser settings.
    parse: &'a ParseSettings,
    /// Output settings.
    output: &'a OutputSettings,
}

/// Settings that govern query parsing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Longest accepted query in bytes; `0` disables the limit.
    pub max_query_length: usize,
}

impl ParseSettings {
    /// Returns true if `query` is longer than the configured limit.
    pub fn exceeds_limit(&self, query: &str) -> bool {
        self.max_query_length != 0 && query.len() > self.max_query_length
    }
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            max_query_length: 2048,
        }
    }
}

/// Settings for printing results.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// How parsed expressions are printed.
    pub format: OutputFormat,
    /// Whether to colorize output.
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Tree,
            color: true,
        }
    }
}

/// Rendering of a parsed expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented tree, one node per line.
    #[default]
    Tree,
    /// Single-line bracketed form.
    Compact,
    /// Fully parenthesized `$search` text.
    Query,
    /// JSON document.
    Json,
}

impl OutputFormat {
    /// The name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Compact => "compact",
            Self::Query => "query",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
