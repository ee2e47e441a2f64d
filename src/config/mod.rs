use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<PathBuf>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Which record collection the server exposes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
  /// Pet records on `/pet`
  #[default]
  Pets,
  /// CI gating flags on `/integrationTest`
  CiGating,
}

impl CollectionKind {
  fn default_data_file(self) -> &'static str {
    match self {
      CollectionKind::Pets => "pets.json",
      CollectionKind::CiGating => "ciGatingServerSettings.json",
    }
  }
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// HTTP listening address
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Collection served by this instance
  #[serde(default)]
  pub collection: CollectionKind,

  /// JSON file the collection is loaded from and stored to
  #[serde(default)]
  pub data_file: Option<PathBuf>,

  /// How long `/close` waits for open connections before forcing the listener shut
  #[serde(default = "default_shutdown_grace_ms")]
  pub shutdown_grace_ms: u64,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:8080".to_string()
}

fn default_shutdown_grace_ms() -> u64 {
  5000
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      collection: CollectionKind::default(),
      data_file: None,
      shutdown_grace_ms: default_shutdown_grace_ms(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|e| {
      Error::Config(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
      Error::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
    })?;

    config.validate()?;

    Ok(config)
  }

  /// Reject settings the server cannot start with
  pub fn validate(&self) -> Result<()> {
    if self.server_addr.is_empty() {
      return Err(Error::InvalidArgument("server_addr may not be empty".to_string()));
    }
    if self.data_file().as_os_str().is_empty() {
      return Err(Error::InvalidArgument("data_file may not be empty".to_string()));
    }
    Ok(())
  }

  /// Data file, falling back to the collection's default name
  pub fn data_file(&self) -> PathBuf {
    self
      .data_file
      .clone()
      .unwrap_or_else(|| PathBuf::from(self.collection.default_data_file()))
  }

  pub fn shutdown_grace(&self) -> Duration {
    Duration::from_millis(self.shutdown_grace_ms)
  }
}
