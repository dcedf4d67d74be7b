//! Process-wide settings.
//!
//! Settings are flat string pairs. Nested JSON documents are flattened into
//! dotted keys, so `{"app": {"debug": true}}` is read back as `app.debug`.

use crate::error::{DarkMatterError, Result};
use dashmap::DashMap;
use serde_json::Value;
use std::env;
use std::path::Path;
use std::sync::Arc;

/// Key toggling debug rendering of error pages.
pub const DEBUG_KEY: &str = "app.debug";

/// Key holding the application name shown on error pages.
pub const NAME_KEY: &str = "app.name";

const DEFAULT_APP_NAME: &str = "DarkMatter";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    /// Create a service preloaded with the process environment
    pub fn new() -> Self {
        let service = Self::empty();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    /// Create a service with no settings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load settings from a JSON document whose root is an object.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        let Value::Object(map) = value else {
            return Err(DarkMatterError::invalid_config(
                "root of a config document must be an object",
            ));
        };

        let service = Self::empty();
        for (key, value) in map {
            service.insert_flattened(key, value);
        }
        Ok(service)
    }

    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| DarkMatterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading config from {}", path.display());
        Self::from_json_str(&input)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    /// Read a boolean flag. `true`, `1`, `yes` and `on` count as set.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.config.get(key).map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on"
            )
        })
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    fn insert_flattened(&self, key: String, value: Value) {
        match value {
            Value::Object(map) => {
                for (child, value) in map {
                    self.insert_flattened(format!("{key}.{child}"), value);
                }
            }
            Value::String(s) => {
                self.config.insert(key, s);
            }
            Value::Null => {}
            other => {
                self.config.insert(key, other.to_string());
            }
        }
    }
}

/// The settings the exception handler reads, captured once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionSettings {
    /// Render source locations and cause chains for runtime errors.
    pub debug: bool,
    pub app_name: String,
}

impl Default for ExceptionSettings {
    fn default() -> Self {
        Self {
            debug: false,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl ExceptionSettings {
    pub fn from_config(config: &ConfigService) -> Self {
        Self {
            debug: config.get_bool(DEBUG_KEY).unwrap_or(false),
            app_name: config
                .get(NAME_KEY)
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
