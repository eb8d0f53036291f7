//! # PCS Configuration Module
//!
//! This module provides configuration management for the PCS Publink client:
//! - Loading configuration from a YAML file
//! - Merging with the embedded default configuration
//! - Environment variable overrides
//! - Path-based getters and in-memory setters
//! - Thread-safe singleton access pattern
//!
//! The configuration is read-only with respect to the filesystem: nothing is
//! ever written back to disk.
//!
//! ## Usage
//!
//! ```no_run
//! use pcsconfig::get_config;
//!
//! let config = get_config();
//! let timeout = config.get_http_timeout_secs()?;
//! let level = config.get_log_min_level()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pcs.yaml");

lazy_static! {
    static ref CONFIG: std::result::Result<Arc<Config>, String> =
        Config::load_config("").map(Arc::new).map_err(|e| format!("{:#}", e));
}

const ENV_CONFIG_DIR: &str = "PCS_CONFIG";
const ENV_PREFIX: &str = "PCS_CONFIG__";
const CONFIG_DIR_NAME: &str = ".pcs";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";

/// Macro to generate getter/setter for u64 values with default
macro_rules! impl_u64_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<u64> {
            match self.get_value($path) {
                Ok(Value::Number(n)) if n.is_u64() => Ok(n.as_u64().unwrap_or($default)),
                Ok(Value::String(s)) => Ok(s.trim().parse::<u64>().unwrap_or($default)),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: u64) -> Result<()> {
            self.set_value($path, Value::Number(Number::from(value)))
        }
    };
}

/// Configuration manager for the PCS client
///
/// Holds the merged YAML tree (defaults, file, environment). Keys are
/// lower-cased on load, and every lookup lower-cases the requested path, so
/// access is case-insensitive.
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

// Implémentation manuelle de Clone
impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(CONFIG_DIR_NAME).exists() {
            return CONFIG_DIR_NAME.to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(CONFIG_DIR_NAME);
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        CONFIG_DIR_NAME.to_string()
    }

    /// Loads the configuration from the specified directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `PCS_CONFIG` environment variable
    /// 3. `.pcs` in the current directory
    /// 4. `.pcs` in the user's home directory
    ///
    /// The embedded defaults are merged with `config.yaml` from that
    /// directory when the file exists, then `PCS_CONFIG__*` environment
    /// variables are applied on top.
    pub fn load_config(directory: &str) -> Result<Self> {
        let config_dir = Self::find_config_dir(directory);
        info!(config_dir=%config_dir, "Using config directory");

        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        let mut config_value = match fs::read(&path) {
            Ok(data) => {
                info!(config_file=%path, "Loaded config file");
                let external: Value = serde_yaml::from_slice(&data)?;
                Self::merged_with_defaults(&external)?
            }
            Err(_) => {
                info!(config_file=%path, "Config file not found, using default embedded config");
                Self::merged_with_defaults(&Value::Null)?
            }
        };

        Self::apply_env_overrides(&mut config_value, env::vars());

        Ok(Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        })
    }

    /// Builds a configuration from a YAML document merged over the defaults
    ///
    /// Environment overrides are not applied.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let external: Value = serde_yaml::from_str(yaml)?;
        Ok(Config {
            config_dir: String::new(),
            path: String::new(),
            data: Mutex::new(Self::merged_with_defaults(&external)?),
        })
    }

    fn merged_with_defaults(external: &Value) -> Result<Value> {
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;
        if !external.is_null() {
            merge_yaml(&mut default_value, &Self::lower_keys_value(external.clone()));
        }
        Ok(Self::lower_keys_value(default_value))
    }

    /// Directory the configuration was resolved from
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Path of the `config.yaml` file (it may not exist)
    pub fn config_file(&self) -> &str {
        &self.path
    }

    /// Sets a configuration value at the specified path
    ///
    /// The change lives in memory only.
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["http", "timeout_secs"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        Self::set_value_internal(&mut data, path, value)
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key_value = Value::String(path[0].to_lowercase());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Returns
    ///
    /// The YAML value, or an error if the path doesn't exist
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    /// Gets a string value, rendering YAML numbers and booleans as text
    pub fn get_string(&self, path: &[&str]) -> Result<String> {
        match self.get_value(path)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Err(anyhow!("Path {} is empty", path.join("."))),
            _ => Err(anyhow!("Path {} is not a scalar", path.join("."))),
        }
    }

    fn apply_env_overrides<I>(config: &mut Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                let key_path = stripped.split("__").collect::<Vec<_>>();
                // Keys holding text keep the raw value (a password `1e3` is not a number)
                let yaml_value = match Self::get_value_internal(config, &key_path) {
                    Ok(Value::String(_)) => Value::String(value),
                    _ => Self::convert_env_value(&value),
                };
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            if !parsed.is_null() {
                return parsed;
            }
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        new_map.insert(Value::String(s.to_lowercase()), Self::lower_keys_value(v));
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    impl_u64_config!(
        get_http_timeout_secs,
        set_http_timeout_secs,
        &["http", "timeout_secs"],
        DEFAULT_HTTP_TIMEOUT_SECS
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["logger", "min_level"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["logger", "min_level"], Value::String(level))
    }
}

/// Returns the global configuration instance
///
/// The instance is lazily loaded on first access.
///
/// # Panics
///
/// Panics if the configuration file cannot be parsed. Use
/// [`try_get_config`] to get the error instead.
///
/// # Examples
///
/// ```no_run
/// use pcsconfig::get_config;
///
/// let config = get_config();
/// let url = config.get_string(&["publink", "v1", "url"])?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_config() -> Arc<Config> {
    match try_get_config() {
        Ok(config) => config,
        Err(e) => panic!("{:#}", e),
    }
}

/// Returns the global configuration instance, or the load error
///
/// The load is attempted once; later calls return the same outcome.
pub fn try_get_config() -> Result<Arc<Config>> {
    CONFIG
        .clone()
        .map_err(|e| anyhow!("Failed to load PCS configuration: {}", e))
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from external are merged recursively into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_loaded() {
        let config = Config::from_yaml_str("{}").unwrap();
        assert_eq!(config.get_http_timeout_secs().unwrap(), 30);
        assert_eq!(config.get_log_min_level().unwrap(), "INFO");
        assert_eq!(
            config.get_string(&["publink", "v1", "url"]).unwrap(),
            "https://subscribe.pcspublink.com/WSStatus_v1_1_7/WSStatus_v1_1_7.asmx"
        );
    }

    #[test]
    fn test_file_values_override_defaults() {
        let config = Config::from_yaml_str(
            "Publink:\n  PubCode: ABC\n  password: secret\nhttp:\n  timeout_secs: 5\n",
        )
        .unwrap();

        assert_eq!(config.get_string(&["publink", "pubcode"]).unwrap(), "ABC");
        assert_eq!(config.get_string(&["PUBLINK", "Password"]).unwrap(), "secret");
        assert_eq!(config.get_http_timeout_secs().unwrap(), 5);
        // Untouched defaults survive the merge
        assert!(config.get_string(&["publink", "v2", "url"]).unwrap().contains("v1_1_6"));
    }

    #[test]
    fn test_env_overrides() {
        let mut value = Config::merged_with_defaults(&Value::Null).unwrap();
        Config::apply_env_overrides(
            &mut value,
            vec![
                ("PCS_CONFIG__PUBLINK__PUBCODE".to_string(), "XYZ".to_string()),
                ("PCS_CONFIG__HTTP__TIMEOUT_SECS".to_string(), "12".to_string()),
                ("UNRELATED".to_string(), "ignored".to_string()),
            ],
        );

        let pubcode = Config::get_value_internal(&value, &["publink", "pubcode"]).unwrap();
        assert_eq!(pubcode, Value::String("XYZ".to_string()));

        let timeout = Config::get_value_internal(&value, &["http", "timeout_secs"]).unwrap();
        assert_eq!(timeout, Value::Number(Number::from(12u64)));
    }

    #[test]
    fn test_env_overrides_keep_text_keys_verbatim() {
        let mut value = Config::merged_with_defaults(&Value::Null).unwrap();
        Config::apply_env_overrides(
            &mut value,
            vec![
                ("PCS_CONFIG__PUBLINK__PASSWORD".to_string(), "1e3".to_string()),
                ("PCS_CONFIG__PUBLINK__PUBCODE".to_string(), "007".to_string()),
                ("PCS_CONFIG__LOGGER__MIN_LEVEL".to_string(), "true".to_string()),
            ],
        );

        let password = Config::get_value_internal(&value, &["publink", "password"]).unwrap();
        assert_eq!(password, Value::String("1e3".to_string()));

        let pubcode = Config::get_value_internal(&value, &["publink", "pubcode"]).unwrap();
        assert_eq!(pubcode, Value::String("007".to_string()));

        let level = Config::get_value_internal(&value, &["logger", "min_level"]).unwrap();
        assert_eq!(level, Value::String("true".to_string()));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let config = Config::from_yaml_str("{}").unwrap();
        let err = config.get_value(&["publink", "nope"]).unwrap_err();
        assert!(err.to_string().contains("publink.nope"));
    }

    #[test]
    fn test_set_value_in_memory() {
        let config = Config::from_yaml_str("{}").unwrap();
        config.set_http_timeout_secs(90).unwrap();
        assert_eq!(config.get_http_timeout_secs().unwrap(), 90);

        config.set_log_min_level("DEBUG".to_string()).unwrap();
        assert_eq!(config.get_log_min_level().unwrap(), "DEBUG");
    }

    #[test]
    fn test_load_config_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "publink:\n  pubcode: FILE\nhttp:\n  timeout_secs: 7\n",
        )
        .unwrap();

        let config = Config::load_config(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(config.config_dir(), dir.path().to_string_lossy());
        assert_eq!(config.get_string(&["publink", "pubcode"]).unwrap(), "FILE");
        assert!(config.config_file().ends_with("config.yaml"));
    }

    #[test]
    fn test_malformed_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.yaml"), "publink: [unclosed\n").unwrap();

        assert!(Config::load_config(&dir.path().to_string_lossy()).is_err());
    }

    #[test]
    fn test_string_timeout_is_parsed() {
        let config = Config::from_yaml_str("http:\n  timeout_secs: \"45\"\n").unwrap();
        assert_eq!(config.get_http_timeout_secs().unwrap(), 45);
    }
}
