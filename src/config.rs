use std::env;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::dates;

/// Where the current cycle day is counted from once a predicted start has
/// passed without a new period being logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LapsePolicy {
    /// Keep counting from the latest logged start, wrapped by cycle length.
    #[default]
    LatestEntry,
    /// Treat the predicted start as an implicit new cycle.
    PredictedStart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entries kept for the trend charts.
    pub trend_window: usize,
    pub label_format: String,
    pub recent_symptom_limit: usize,
    /// Cycle deltas used for the variation verdict.
    pub variation_window: usize,
    pub regular_min_days: i64,
    pub regular_max_days: i64,
    pub max_std_dev: f64,
    pub show_fertility: bool,
    pub lapse_policy: LapsePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_window: 6,
            label_format: dates::SHORT_LABEL.to_string(),
            recent_symptom_limit: 5,
            variation_window: 6,
            regular_min_days: 21,
            regular_max_days: 35,
            max_std_dev: 9.0,
            show_fertility: false,
            lapse_policy: LapsePolicy::LatestEntry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_level: String,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    /// Layer an optional TOML file and `CYKEL__*` environment variables over
    /// the defaults. A missing file is not an error.
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_path.or_else(|| env::var("CYKEL_CONFIG").ok()) {
            if Path::new(&path).exists() {
                builder = builder.add_source(File::with_name(&path));
            } else {
                tracing::debug!(path = %path, "config file not found, using defaults");
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("CYKEL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate().map_err(ConfigError::Message)?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), String> {
        let engine = &self.engine;
        if engine.trend_window == 0 {
            return Err("engine.trend_window must be at least 1".into());
        }
        if StrftimeItems::new(&engine.label_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!("engine.label_format {:?} is not a valid date format", engine.label_format));
        }
        if engine.variation_window == 0 {
            return Err("engine.variation_window must be at least 1".into());
        }
        if engine.regular_min_days > engine.regular_max_days {
            return Err("engine.regular_min_days exceeds engine.regular_max_days".into());
        }
        if !engine.max_std_dev.is_finite() || engine.max_std_dev <= 0.0 {
            return Err("engine.max_std_dev must be a positive number".into());
        }
        Ok(())
    }
}
