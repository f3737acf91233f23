//! Host-side persistence: TOML configuration and the JSON task file.
//!
//! Both live in the data directory:
//! - `$TASKCAL_DATA_DIR` if set
//! - otherwise `~/.config/taskcal/`, or `~/.config/taskcal-dev/` with
//!   `TASKCAL_ENV=dev`

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

use taskcal_core::{SchedulerConfig, SchedulingEngine, Task, TaskBook, DEFAULT_UPCOMING_LIMIT};

/// Resolve (and create) the data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match std::env::var_os("TASKCAL_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKCAL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskcal-dev")
            } else {
                base_dir.join("taskcal")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,
}

fn default_upcoming_limit() -> usize {
    DEFAULT_UPCOMING_LIMIT
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: default_upcoming_limit(),
        }
    }
}

/// Application configuration, stored as `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduling: SchedulerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
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
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                if !existing.is_number() {
                    return Err(format!("'{key}' is a section, not a value").into());
                }
                let n = value
                    .parse::<u64>()
                    .map_err(|_| format!("cannot parse '{value}' as a non-negative integer"))?;
                let new_value = serde_json::Value::Number(n.into());

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing defaults if no file exists yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
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

    /// Set a config value by key and save.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed or
    /// is rejected by the scheduler, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.scheduling.validate()?;
        *self = updated;
        self.save()?;
        Ok(())
    }

    /// Scheduling engine built from the `[scheduling]` section.
    ///
    /// # Errors
    /// Returns an error if a scheduling value is out of range.
    pub fn engine(&self) -> Result<SchedulingEngine, Box<dyn std::error::Error>> {
        Ok(SchedulingEngine::with_config(self.scheduling.clone())?)
    }
}

/// The task collection on disk, `tasks.json`.
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            path: data_dir()?.join("tasks.json"),
        })
    }

    /// Load the collection; a missing file is an empty collection.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it holds
    /// duplicate ids or zero estimates.
    pub fn load(&self) -> Result<TaskBook, Box<dyn std::error::Error>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(TaskBook::new()),
            Err(e) => return Err(e.into()),
        };
        let tasks: Vec<Task> = serde_json::from_str(&content)
            .map_err(|e| format!("failed to parse {}: {e}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(TaskBook::from_tasks(tasks)?)
    }

    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, book: &TaskBook) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(book.tasks())?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.scheduling, SchedulerConfig::default());
        assert_eq!(parsed.notifications.upcoming_limit, 5);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = toml::from_str("[scheduling]\nslot_granularity_minutes = 30\n").unwrap();
        assert_eq!(parsed.scheduling.slot_granularity_minutes, 30);
        assert_eq!(parsed.scheduling.search_horizon_days, 14);
        assert_eq!(parsed.scheduling.due_soon_hours, 24);
        assert_eq!(parsed.notifications.upcoming_limit, 5);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("scheduling.search_horizon_days").as_deref(), Some("14"));
        assert_eq!(cfg.get("notifications.upcoming_limit").as_deref(), Some("5"));
        assert!(cfg.get("scheduling.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "scheduling.due_soon_hours", "48").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "scheduling.due_soon_hours").unwrap(),
            &serde_json::Value::Number(48.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        assert!(Config::set_json_value_by_path(&mut json, "scheduling.nope", "1").is_err());
        assert!(Config::set_json_value_by_path(&mut json, "scheduling", "1").is_err());
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "notifications.upcoming_limit", "-1");
        assert!(result.is_err());
    }
}
