//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Pomodoro focus and break lengths
//! - How durations are displayed (clock or leagues)
//! - The remote document store endpoint
//! - The default log level
//!
//! Configuration is stored at `~/.config/leagues/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::pomodoro::PomodoroDurations;

/// Pomodoro configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Pause a running session while on break.
    #[serde(default)]
    pub pause_session_on_break: bool,
}

/// How log durations are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DurationStyle {
    /// `HH:MM:SS`
    #[default]
    Clock,
    /// One-decimal leagues
    Leagues,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub duration_style: DurationStyle,
}

/// Remote document store configuration.
///
/// An empty endpoint keeps signed-in documents as JSON files in the data
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/leagues/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pomodoro: PomodoroConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_focus_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_collection() -> String {
    "users".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
            pause_session_on_break: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            collection: default_collection(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, or write and return the default when the file does
    /// not exist. Any other read error is reported, never overwritten.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Unknown keys and values
    /// that don't fit the field are rejected.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn pomodoro_durations(&self) -> PomodoroDurations {
        PomodoroDurations::from_minutes(self.pomodoro.focus_minutes, self.pomodoro.break_minutes)
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.pomodoro.focus_minutes, 25);
        assert_eq!(parsed.pomodoro.break_minutes, 5);
        assert_eq!(parsed.display.duration_style, DurationStyle::Clock);
        assert_eq!(parsed.remote.collection, "users");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[pomodoro]\nfocus_minutes = 50\n").unwrap();
        assert_eq!(parsed.pomodoro.focus_minutes, 50);
        assert_eq!(parsed.pomodoro.break_minutes, 5);
        assert_eq!(parsed.logging.level, "warn");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("pomodoro.focus_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("pomodoro.pause_session_on_break").as_deref(), Some("false"));
        assert_eq!(cfg.get("display.duration_style").as_deref(), Some("clock"));
        assert!(cfg.get("pomodoro.missing_key").is_none());
    }

    #[test]
    fn apply_updates_typed_fields() {
        let mut cfg = Config::default();
        cfg.apply("pomodoro.break_minutes", "10").unwrap();
        cfg.apply("pomodoro.pause_session_on_break", "true").unwrap();
        cfg.apply("display.duration_style", "leagues").unwrap();
        cfg.apply("remote.endpoint", "https://docs.example.com").unwrap();

        assert_eq!(cfg.pomodoro.break_minutes, 10);
        assert!(cfg.pomodoro.pause_session_on_break);
        assert_eq!(cfg.display.duration_style, DurationStyle::Leagues);
        assert_eq!(cfg.remote.endpoint, "https://docs.example.com");
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.apply("pomodoro.nonexistent", "1").is_err());
        assert!(cfg.apply("", "1").is_err());
    }

    #[test]
    fn apply_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("pomodoro.pause_session_on_break", "maybe").is_err());
        assert!(cfg.apply("pomodoro.focus_minutes", "-3").is_err());
        assert!(cfg.apply("display.duration_style", "furlongs").is_err());
        assert_eq!(cfg.display.duration_style, DurationStyle::Clock);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.pomodoro.focus_minutes, 25);
        assert!(path.exists());
    }

    #[test]
    fn unreadable_file_is_an_error_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut bytes = b"[pomodoro]\nfocus_minutes = 50\n# ".to_vec();
        bytes.push(0xff);
        std::fs::write(&path, &bytes).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::LoadFailed { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn directory_in_place_of_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }

    #[test]
    fn durations_come_from_minutes() {
        let mut cfg = Config::default();
        cfg.apply("pomodoro.focus_minutes", "50").unwrap();
        let d = cfg.pomodoro_durations();
        assert_eq!(d.focus_secs, 3000);
        assert_eq!(d.break_secs, 300);
    }
}
