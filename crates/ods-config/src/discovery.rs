//! Locating configuration files.
//!
//! A file named on the command line or in [`CONFIG_ENV`] is used on its own. Otherwise the
//! `.ods.toml` files between the working directory and the nearest `root = true` file are
//! used, nearest first, followed by `~/.ods.toml` if no root file was reached.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use log::debug;

use crate::{error::ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".ods.toml";

/// Environment variable naming a config file that replaces discovery.
pub const CONFIG_ENV: &str = "ODS_CONFIG";

/// Where configuration is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Collect `.ods.toml` files from this directory upwards.
    Discover(PathBuf),
    /// Read exactly this file.
    Explicit(PathBuf),
}

impl ConfigSource {
    /// Chooses the source for a run in `cwd`.
    ///
    /// An `explicit` path wins over [`CONFIG_ENV`]; an empty variable is ignored. Relative
    /// paths are taken from `cwd`. With neither, configuration is discovered from `cwd`.
    pub fn resolve(cwd: &Path, explicit: Option<&Path>) -> Self {
        Self::choose(cwd, explicit, env::var_os(CONFIG_ENV))
    }

    /// [`ConfigSource::resolve`] with the environment value passed in.
    fn choose(cwd: &Path, explicit: Option<&Path>, from_env: Option<OsString>) -> Self {
        let named = explicit.map(Path::to_path_buf).or_else(|| {
            from_env
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        });
        match named {
            Some(path) => Self::Explicit(cwd.join(path)),
            None => Self::Discover(cwd.to_path_buf()),
        }
    }

    /// Lists the files to load, highest precedence first.
    ///
    /// A missing explicit file is an error. Discovery may find nothing.
    pub fn files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        match self {
            Self::Explicit(path) if path.is_file() => Ok(vec![path.clone()]),
            Self::Explicit(path) => Err(ConfigError::MissingFile { path: path.clone() }),
            Self::Discover(cwd) => Ok(discover_config_files(cwd)),
        }
    }

    /// Returns true if the files come from a single named file.
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit(_))
    }
}

/// Collects the `.ods.toml` files that apply to `cwd`, highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let root = is_root_config(&candidate);
        configs.push(candidate);
        if root {
            debug!("config discovery stopped at root file in {}", dir.display());
            return configs;
        }
    }

    if let Some(global) = global_config_path().filter(|path| path.is_file())
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    configs
}

/// Path of the global configuration file, `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Like [`global_config_path`], but reports a missing home directory as an error.
pub fn require_global_config_path() -> Result<PathBuf, ConfigError> {
    global_config_path().ok_or(ConfigError::NoHomeDirectory)
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
