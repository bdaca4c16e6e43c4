//! Runtime server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML file passed
//! with `--config`, then `ROSTER_*` environment variables.

use std::{path::{Path, PathBuf}, time::Duration};

use config::{Config, ConfigError, Environment, File};
use roster_enrich::EnrichConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub agify_url:           String,
  pub genderize_url:       String,
  pub nationalize_url:     String,
  pub lookup_timeout_secs: u64,
}

impl ServerConfig {
  /// Load from `path` (optional) and the environment on top of defaults.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::builder(path)?
      .add_source(Environment::with_prefix("ROSTER"))
      .build()?
      .try_deserialize()
  }

  fn builder(path: &Path) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let defaults = EnrichConfig::default();
    Ok(
      Config::builder()
        .set_default("host", "127.0.0.1")?
        .set_default("port", 8080)?
        .set_default("store_path", "roster.db")?
        .set_default("agify_url", defaults.agify_url)?
        .set_default("genderize_url", defaults.genderize_url)?
        .set_default("nationalize_url", defaults.nationalize_url)?
        .set_default("lookup_timeout_secs", defaults.timeout.as_secs())?
        .add_source(File::from(path).required(false)),
    )
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn enrich_config(&self) -> EnrichConfig {
    EnrichConfig {
      agify_url:       self.agify_url.clone(),
      genderize_url:   self.genderize_url.clone(),
      nationalize_url: self.nationalize_url.clone(),
      timeout:         Duration::from_secs(self.lookup_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
