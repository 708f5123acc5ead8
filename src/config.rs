//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. [`Config::default()`]
//! 2. A TOML file (the platform config path, or `--config`)
//! 3. Environment variables prefixed `DUPFIND_` (e.g. `DUPFIND_SKIP_HIDDEN=true`)
//! 4. Command-line flags, applied by the caller with [`Config::apply_cli`]
//!
//! # Example file
//!
//! ```toml
//! buffer_schedule = [64, 255, 4096, 65535, 16777216, 268435456]
//! min_size = 1
//! skip_hidden = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::duplicates::{BufferSchedule, ScheduleError};
use crate::scanner::WalkerConfig;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "DUPFIND_";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The buffer schedule is empty or contains a zero.
    #[error("Invalid buffer schedule: {0}")]
    InvalidSchedule(#[from] ScheduleError),

    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A provider failed to parse or the merged values did not fit.
    #[error("Failed to load configuration: {0}")]
    Load(#[source] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pass sizes used by the byte comparator.
    pub buffer_schedule: BufferSchedule,

    /// Ignore files smaller than this many bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,

    /// Ignore files larger than this many bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,

    /// Skip files and directories whose names start with `.`.
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_schedule: BufferSchedule::default(),
            min_size: None,
            max_size: None,
            skip_hidden: false,
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With `path` set, that file must exist. Without it, the platform
    /// config file is read when present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or any layer
    /// fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(ref file) = file {
            log::debug!("Reading configuration from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        let config: Self = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;

        log::trace!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Default platform-specific configuration path.
    ///
    /// Returns `None` when no home directory can be determined.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupfind", "dupfind")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay the flags given on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchedule`] if `--buffer-schedule` is
    /// empty or contains a zero.
    pub fn apply_cli(mut self, cli: &Cli) -> Result<Self, ConfigError> {
        if let Some(ref sizes) = cli.buffer_schedule {
            self.buffer_schedule = BufferSchedule::new(sizes.clone())?;
        }
        if cli.min_size.is_some() {
            self.min_size = cli.min_size;
        }
        if cli.max_size.is_some() {
            self.max_size = cli.max_size;
        }
        self.skip_hidden |= cli.skip_hidden;
        Ok(self)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.skip_hidden, self.min_size, self.max_size)
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
