//! Configuration management for eventscout
//!
//! Settings are read from a JSON file. Every field has a default, so an empty object
//! (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::detail::DetailOptions;
use crate::error::{Error, Result};
use crate::recommender::RecommenderSettings;
use crate::retrieval::DEFAULT_DISPLAY_LIMIT;

/// Environment variable pointing at a configuration file
pub const CONFIG_ENV: &str = "EVENTSCOUT_CONFIG";

const LOCAL_CONFIG_PATHS: &[&str] = &[".eventscout.json", "eventscout.json"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
  /// CSV file holding the event catalog
  #[serde(default = "default_dataset")]
  pub dataset: PathBuf,
  /// Fitted vectorizer artifact; fitted in memory when absent or missing on disk
  #[serde(default = "default_model")]
  pub model: Option<PathBuf>,
  /// Recommendations shown right after a search
  #[serde(default = "default_display_limit")]
  pub display_limit: usize,
  #[serde(default)]
  pub recommender: RecommenderSettings,
  #[serde(default)]
  pub map: MapSettings,
  /// Marker placed before prices
  #[serde(default = "default_currency")]
  pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
  /// Degrees of padding around the event on the embedded map
  #[serde(default = "default_map_margin")]
  pub margin: f64,
}

// Default value functions
fn default_dataset() -> PathBuf {
  PathBuf::from("aa_data.csv")
}
fn default_model() -> Option<PathBuf> {
  Some(PathBuf::from("eventscout-model.json"))
}
fn default_display_limit() -> usize {
  DEFAULT_DISPLAY_LIMIT
}
fn default_currency() -> String {
  "R".to_string()
}
fn default_map_margin() -> f64 {
  0.01
}

impl Default for MapSettings {
  fn default() -> Self {
    Self { margin: default_map_margin() }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      dataset: default_dataset(),
      model: default_model(),
      display_limit: default_display_limit(),
      recommender: RecommenderSettings::default(),
      map: MapSettings::default(),
      currency: default_currency(),
    }
  }
}

impl Config {
  /// Load configuration from a file; relative paths inside it resolve against its directory
  pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
      .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    let mut config: Config = serde_json::from_str(&content)?;

    if let Some(base) = path.parent() {
      config.resolve_paths(base);
    }

    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
  }

  /// Load configuration from the first place one is found, falling back to defaults.
  ///
  /// Lookup order: explicit path, `EVENTSCOUT_CONFIG`, `.eventscout.json` and
  /// `eventscout.json` in the working directory, then the user config directory.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      return Self::load_from_file(path);
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
      if !path.is_empty() {
        return Self::load_from_file(path);
      }
    }

    for path in LOCAL_CONFIG_PATHS {
      if Path::new(path).exists() {
        return Self::load_from_file(path);
      }
    }

    if let Some(path) = user_config_path() {
      if path.exists() {
        return Self::load_from_file(path);
      }
    }

    tracing::debug!("no configuration file found, using defaults");
    Ok(Config::default())
  }

  pub fn detail_options(&self) -> DetailOptions {
    DetailOptions { currency: self.currency.clone(), map_margin: self.map.margin }
  }

  pub fn validate(&self) -> Result<()> {
    if self.display_limit == 0 {
      return Err(Error::Config("display_limit must be at least 1".to_string()));
    }
    if self.recommender.top_k == 0 {
      return Err(Error::Config("recommender.top_k must be at least 1".to_string()));
    }
    if !self.map.margin.is_finite() || self.map.margin <= 0.0 {
      return Err(Error::Config(format!("map.margin must be positive, got {}", self.map.margin)));
    }
    Ok(())
  }

  fn resolve_paths(&mut self, base: &Path) {
    if self.dataset.is_relative() {
      self.dataset = base.join(&self.dataset);
    }
    if let Some(model) = self.model.as_mut() {
      if model.is_relative() {
        *model = base.join(&*model);
      }
    }
  }
}

/// `<config dir>/eventscout/config.json`
pub fn user_config_path() -> Option<PathBuf> {
  dirs::config_dir().map(|dir| dir.join("eventscout").join("config.json"))
}
