//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`. Scalar settings
//! take the first defined value, so files closer to the working directory win.

use std::path::{Path, PathBuf};

use crate::{
    Config, OutputSettings, ParseSettings,
    parse::{RawConfig, RawOutputSettings, RawParseSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut parse = ParseSettings::default();
    let mut output = OutputSettings::default();

    // Lowest precedence first so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.parse {
            apply_raw_parse(&mut parse, raw);
        }
        if let Some(ref raw) = parsed.config.output {
            apply_raw_output(&mut output, raw);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Config {
        parse,
        output,
        config_root,
    }
}

/// Applies raw parser settings to result, overwriting any present values.
fn apply_raw_parse(result: &mut ParseSettings, raw: &RawParseSettings) {
    if let Some(v) = raw.max_query_length {
        result.max_query_length = v;
    }
}

/// Applies raw output settings to result, overwriting any present values.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.format {
        result.format = v;
    }
    if let Some(v) = raw.color {
        result.color = v;
    }
}
