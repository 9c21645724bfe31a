use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys written by `Config::init_all`, used by `config --check`.
pub const KNOWN_KEYS: &[&str] = &[
    "database",
    "currency_symbol",
    "opening_time",
    "closing_time",
    "slot_minutes",
    "phone_min_digits",
    "phone_max_digits",
    "min_service_minutes",
    "max_service_minutes",
    "cancelled_blocks_slot",
    "watch_interval_ms",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_opening_time")]
    pub opening_time: String,
    #[serde(default = "default_closing_time")]
    pub closing_time: String,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: i64,
    #[serde(default = "default_phone_min")]
    pub phone_min_digits: usize,
    #[serde(default = "default_phone_max")]
    pub phone_max_digits: usize,
    #[serde(default = "default_min_service")]
    pub min_service_minutes: i64,
    #[serde(default = "default_max_service")]
    pub max_service_minutes: i64,
    /// When false, CANCELLED appointments no longer block their time slot.
    #[serde(default = "default_cancelled_blocks_slot")]
    pub cancelled_blocks_slot: bool,
    #[serde(default = "default_watch_interval")]
    pub watch_interval_ms: u64,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_opening_time() -> String {
    "10:00".to_string()
}
fn default_closing_time() -> String {
    "18:00".to_string()
}
fn default_slot_minutes() -> i64 {
    30
}
fn default_phone_min() -> usize {
    7
}
fn default_phone_max() -> usize {
    12
}
fn default_min_service() -> i64 {
    5
}
fn default_max_service() -> i64 {
    12 * 60
}
fn default_cancelled_blocks_slot() -> bool {
    true
}
fn default_watch_interval() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file().to_string_lossy().to_string())
    }
}

impl Config {
    /// Defaults pointing at an explicit database path.
    pub fn with_database(database: String) -> Self {
        Self {
            database,
            currency_symbol: default_currency_symbol(),
            opening_time: default_opening_time(),
            closing_time: default_closing_time(),
            slot_minutes: default_slot_minutes(),
            phone_min_digits: default_phone_min(),
            phone_max_digits: default_phone_max(),
            min_service_minutes: default_min_service(),
            max_service_minutes: default_max_service(),
            cancelled_blocks_slot: default_cancelled_blocks_slot(),
            watch_interval_ms: default_watch_interval(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("glamstudio")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".glamstudio")
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("glamstudio.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("glamstudio.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Keys that the file at `path` does not set explicitly.
    pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
        let content = fs::read_to_string(path)?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {}", path.display(), e)))?;

        let Some(map) = value.as_mapping() else {
            return Err(AppError::Config("configuration is not a mapping".into()));
        };

        Ok(KNOWN_KEYS
            .iter()
            .copied()
            .filter(|k| !map.contains_key(serde_yaml::Value::from(*k)))
            .collect())
    }

    pub fn opening(&self) -> AppResult<NaiveTime> {
        NaiveTime::parse_from_str(&self.opening_time, "%H:%M")
            .map_err(|_| AppError::Config(format!("invalid opening_time '{}'", self.opening_time)))
    }

    pub fn closing(&self) -> AppResult<NaiveTime> {
        NaiveTime::parse_from_str(&self.closing_time, "%H:%M")
            .map_err(|_| AppError::Config(format!("invalid closing_time '{}'", self.closing_time)))
    }

    /// Minutes the studio is open each day.
    pub fn opening_minutes(&self) -> AppResult<i64> {
        let minutes = (self.closing()? - self.opening()?).num_minutes();
        if minutes <= 0 {
            return Err(AppError::Config(
                "closing_time must be later than opening_time".into(),
            ));
        }
        Ok(minutes)
    }

    /// `--db` value: absolute paths as given, bare names inside the config dir.
    pub fn resolve_db_path(name: &str) -> PathBuf {
        let p = crate::utils::path::expand_tilde(name);
        if p.is_absolute() {
            p
        } else {
            Self::config_dir().join(p)
        }
    }

    /// Initialize configuration and database files, returning the database path.
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_name {
            Some(name) => Self::resolve_db_path(&name),
            None => Self::database_file(),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config = Self::with_database(db_path.to_string_lossy().to_string());

        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| AppError::Config(format!("cannot serialize config: {e}")))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        Ok(db_path)
    }
}
