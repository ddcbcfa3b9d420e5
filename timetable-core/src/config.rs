//! Global timetable configuration.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveTime};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DAY_END, DEFAULT_DAY_START, DEFAULT_INCREMENT_MINUTES};
use crate::error::{TimetableError, TimetableResult};
use crate::model::parse_time;
use crate::store::Store;
use crate::view::ViewOptions;

static DEFAULT_DATA_DIR: &str = "~/timetables";
static DEFAULT_LISTEN: &str = "127.0.0.1:4096";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_day_start() -> String {
    DEFAULT_DAY_START.to_string()
}

fn default_day_end() -> String {
    DEFAULT_DAY_END.to_string()
}

fn default_increment_minutes() -> i64 {
    DEFAULT_INCREMENT_MINUTES
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

/// Configuration at ~/.config/timetables/config.toml
///
/// Every key can be overridden with a `TIMETABLE_` environment variable,
/// e.g. `TIMETABLE_TERM_START=2013-07-29`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimetableConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_day_start")]
    pub day_start: String,

    #[serde(default = "default_day_end")]
    pub day_end: String,

    #[serde(default = "default_increment_minutes")]
    pub increment_minutes: i64,

    /// Monday of term week 1, `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_start: Option<String>,

    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        TimetableConfig {
            data_dir: default_data_dir(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            increment_minutes: default_increment_minutes(),
            term_start: None,
            listen: default_listen(),
        }
    }
}

impl TimetableConfig {
    pub fn config_path() -> TimetableResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetableError::Config("Could not determine config directory".into()))?
            .join("timetables");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, writing a commented default file first
    /// if there is none.
    pub fn load() -> TimetableResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus environment overrides.
    pub fn load_from(path: &Path) -> TimetableResult<Self> {
        let config: TimetableConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TIMETABLE").try_parsing(true))
            .build()
            .map_err(|e| TimetableError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TimetableError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TimetableResult<()> {
        let contents = format!(
            "\
# timetables configuration

# Where imported departments are stored:
# data_dir = \"{}\"

# Teaching day shown in grids:
# day_start = \"{}\"
# day_end = \"{}\"

# Grid resolution in minutes (halved automatically for short lectures):
# increment_minutes = {}

# Monday of term week 1, needed for calendar export:
# term_start = \"2013-07-29\"

# Address the server listens on:
# listen = \"{}\"
",
            DEFAULT_DATA_DIR, DEFAULT_DAY_START, DEFAULT_DAY_END, DEFAULT_INCREMENT_MINUTES, DEFAULT_LISTEN
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn store(&self) -> TimetableResult<Store> {
        Store::open(self.data_path())
    }

    pub fn day_start_time(&self) -> TimetableResult<NaiveTime> {
        parse_time(&self.day_start)
    }

    pub fn day_end_time(&self) -> TimetableResult<NaiveTime> {
        parse_time(&self.day_end)
    }

    pub fn increment(&self) -> Duration {
        Duration::minutes(self.increment_minutes)
    }

    /// The anchor date for calendar export.
    pub fn term_start_date(&self) -> TimetableResult<NaiveDate> {
        let raw = self.term_start.as_deref().ok_or(TimetableError::MissingTermStart)?;
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            TimetableError::Config(format!("Invalid term_start '{}'. Expected YYYY-MM-DD", raw))
        })
    }

    pub fn listen_addr(&self) -> TimetableResult<SocketAddr> {
        self.listen
            .parse()
            .map_err(|_| TimetableError::Config(format!("Invalid listen address '{}'", self.listen)))
    }

    pub fn view_options(&self) -> TimetableResult<ViewOptions> {
        Ok(ViewOptions {
            day_start: self.day_start_time()?,
            day_end: self.day_end_time()?,
            increment: self.increment(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TimetableConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.day_start, "09:15");
        assert_eq!(config.increment_minutes, 30);
        assert!(config.term_start.is_none());
        assert!(matches!(config.term_start_date(), Err(TimetableError::MissingTermStart)));
    }

    #[test]
    fn test_default_file_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        TimetableConfig::create_default_config(&path).unwrap();

        let config = TimetableConfig::load_from(&path).unwrap();
        assert_eq!(config.listen, "127.0.0.1:4096");
        assert_eq!(config.data_dir, PathBuf::from("~/timetables"));
    }

    #[test]
    fn test_file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "data_dir = \"/srv/timetables\"\nday_start = \"09:00\"\nincrement_minutes = 15\nterm_start = \"2013-07-29\"\n",
        )
        .unwrap();

        let config = TimetableConfig::load_from(&path).unwrap();
        assert_eq!(config.data_path(), PathBuf::from("/srv/timetables"));
        assert_eq!(config.increment(), Duration::minutes(15));
        assert_eq!(
            config.term_start_date().unwrap(),
            NaiveDate::from_ymd_opt(2013, 7, 29).unwrap()
        );

        let options = config.view_options().unwrap();
        assert_eq!(options.day_start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        let config = TimetableConfig {
            term_start: Some("29/07/2013".to_string()),
            listen: "nowhere".to_string(),
            ..TimetableConfig::default()
        };
        assert!(matches!(config.term_start_date(), Err(TimetableError::Config(_))));
        assert!(matches!(config.listen_addr(), Err(TimetableError::Config(_))));
    }
}
