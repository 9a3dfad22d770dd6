//! Persistent configuration.
//!
//! Stores the defaults of the `report` command in a JSON file inside the
//! application data directory (see [`DataStorage`]). Every value can be
//! overridden on the command line; a missing file simply means defaults.
//!
//! ## Example file
//!
//! ```json
//! {
//!   "report": {
//!     "default_days": 7,
//!     "output_dir": "/home/me/Reports",
//!     "file_name": "Calendar_Summary_Report.xlsx",
//!     "decimal_places": 3,
//!     "negative_durations": "skip",
//!     "access_timeout_secs": 10,
//!     "source": "/home/me/calendars.json"
//!   }
//! }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use calsum::libs::config::Config;
//!
//! let config = Config::read()?;
//! let output = config.report.output_path(None);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::{home_dir, DataStorage};
use crate::libs::messages::Message;
use crate::libs::summary::{NegativeDurations, DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
use crate::{msg_bail_anyhow, msg_print};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_FILE_NAME: &str = "Calendar_Summary_Report.xlsx";
pub const DEFAULT_DAYS: i64 = 1;
pub const DEFAULT_ACCESS_TIMEOUT_SECS: u64 = 10;

const NEGATIVE_DURATION_CHOICES: [NegativeDurations; 3] = [NegativeDurations::Skip, NegativeDurations::Clamp, NegativeDurations::Keep];

/// Settings of the `report` command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Days covered when none are given on the command line; 0 means today.
    pub default_days: i64,

    /// Directory for generated reports. `None` means the Desktop when it
    /// exists, otherwise the current directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    pub file_name: String,
    /// Places hour values are rounded to, `0..=MAX_DECIMAL_PLACES`.
    pub decimal_places: u32,
    pub negative_durations: NegativeDurations,
    pub access_timeout_secs: u64,

    /// Calendar source used when `--source` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            default_days: DEFAULT_DAYS,
            output_dir: None,
            file_name: DEFAULT_FILE_NAME.to_string(),
            decimal_places: DEFAULT_DECIMAL_PLACES,
            negative_durations: NegativeDurations::default(),
            access_timeout_secs: DEFAULT_ACCESS_TIMEOUT_SECS,
            source: None,
        }
    }
}

impl ReportConfig {
    /// Where the report is written: `explicit` when given, else the configured
    /// directory joined with the configured file name.
    pub fn output_path(&self, explicit: Option<PathBuf>) -> PathBuf {
        if let Some(path) = explicit {
            return path;
        }
        let dir = self.output_dir.clone().unwrap_or_else(default_output_dir);
        dir.join(&self.file_name)
    }
}

/// `~/Desktop` when it exists, otherwise the current directory.
pub fn default_output_dir() -> PathBuf {
    let desktop = home_dir().join("Desktop");
    if desktop.is_dir() {
        desktop
    } else {
        PathBuf::from(".")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Loads the configuration file, or defaults when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// when it asks for more than [`MAX_DECIMAL_PLACES`] decimal places.
    pub fn read() -> Result<Config> {
        let config_file_path = Self::path()?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        if config.report.decimal_places > MAX_DECIMAL_PLACES {
            msg_bail_anyhow!(Message::DecimalPlacesOutOfRange(config.report.decimal_places, MAX_DECIMAL_PLACES));
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file = File::create(Self::path()?)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns `false` when there was none.
    pub fn delete() -> Result<bool> {
        let config_file_path = Self::path()?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    pub fn path() -> Result<PathBuf> {
        Ok(DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    /// Interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let default = config.report.clone();
        let theme = ColorfulTheme::default();

        msg_print!(Message::ConfigModuleReport);

        let default_days: i64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptDefaultDays.to_string())
            .default(default.default_days)
            .validate_with(|days: &i64| if *days < 0 { Err(Message::InvalidDays(*days).to_string()) } else { Ok(()) })
            .interact_text()?;

        let output_dir: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptOutputDir.to_string())
            .default(default.output_dir.clone().unwrap_or_else(default_output_dir).display().to_string())
            .interact_text()?;

        let file_name: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptFileName.to_string())
            .default(default.file_name.clone())
            .interact_text()?;

        let decimal_places: u32 = Input::with_theme(&theme)
            .with_prompt(Message::PromptDecimalPlaces.to_string())
            .default(default.decimal_places.min(MAX_DECIMAL_PLACES))
            .validate_with(|places: &u32| {
                if *places > MAX_DECIMAL_PLACES {
                    Err(Message::DecimalPlacesOutOfRange(*places, MAX_DECIMAL_PLACES).to_string())
                } else {
                    Ok(())
                }
            })
            .interact_text()?;

        let negative_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptNegativeDurations.to_string())
            .items(&["skip", "clamp", "keep"])
            .default(NEGATIVE_DURATION_CHOICES.iter().position(|choice| *choice == default.negative_durations).unwrap_or(0))
            .interact()?;

        let access_timeout_secs: u64 = Input::with_theme(&theme)
            .with_prompt(Message::PromptAccessTimeout.to_string())
            .default(default.access_timeout_secs)
            .interact_text()?;

        let source: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptSource.to_string())
            .default(default.source.as_deref().map(|path| path.display().to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        config.report = ReportConfig {
            default_days,
            output_dir: non_empty_path(&output_dir),
            file_name,
            decimal_places,
            negative_durations: NEGATIVE_DURATION_CHOICES[negative_index],
            access_timeout_secs,
            source: non_empty_path(&source),
        };

        Ok(config)
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(Path::new(value).to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{"report":{"default_days":7}}"#).unwrap();
        assert_eq!(config.report.default_days, 7);
        assert_eq!(config.report.file_name, DEFAULT_FILE_NAME);
        assert_eq!(config.report.decimal_places, 3);
        assert_eq!(config.report.negative_durations, NegativeDurations::Skip);

        let empty: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_explicit_output_path_wins() {
        let report = ReportConfig {
            output_dir: Some(PathBuf::from("/tmp/reports")),
            ..ReportConfig::default()
        };
        assert_eq!(report.output_path(None), PathBuf::from("/tmp/reports").join(DEFAULT_FILE_NAME));
        assert_eq!(report.output_path(Some(PathBuf::from("x.xlsx"))), PathBuf::from("x.xlsx"));
    }

    #[test]
    fn test_negative_durations_serialize_lowercase() {
        let report = ReportConfig {
            negative_durations: NegativeDurations::Clamp,
            ..ReportConfig::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""negative_durations":"clamp""#));
        assert!(!json.contains("output_dir"));
    }
}
