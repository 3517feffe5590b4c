//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/quotebook/config.toml)
//! 3. Environment variables (QUOTEBOOK_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable prefix
const ENV_PREFIX: &str = "QUOTEBOOK";

/// Demo endpoint returning an array of posts
pub const DEFAULT_REMOTE_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for persistent storage (quotes, selected filter)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory for session-scoped storage (last viewed quote)
    #[serde(default = "default_session_dir")]
    pub session_dir: PathBuf,

    /// Remote quote source URL (empty disables sync)
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Whether sync is enabled
    #[serde(default = "default_true")]
    pub sync_enabled: bool,

    /// Seconds between periodic syncs in watch mode
    #[serde(default = "default_sync_interval")]
    pub sync_interval_secs: u64,

    /// Request timeout for the remote source
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of remote items taken per sync (0 = no limit)
    #[serde(default = "default_sync_max_items")]
    pub sync_max_items: usize,

    /// Log file path (stderr when unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_dir: default_session_dir(),
            remote_url: default_remote_url(),
            sync_enabled: true,
            sync_interval_secs: default_sync_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
            sync_max_items: default_sync_max_items(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (QUOTEBOOK_DATA_DIR, QUOTEBOOK_REMOTE_URL, ...)
    /// 2. Config file (~/.config/quotebook/config.toml or QUOTEBOOK_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var(format!("{}_SESSION_DIR", ENV_PREFIX)) {
            self.session_dir = PathBuf::from(val);
        }

        // Empty string disables the remote source
        if let Ok(val) = std::env::var(format!("{}_REMOTE_URL", ENV_PREFIX)) {
            self.remote_url = val.trim().to_string();
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_ENABLED", ENV_PREFIX)) {
            self.sync_enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }

        if let Ok(val) = std::env::var(format!("{}_SYNC_INTERVAL", ENV_PREFIX)) {
            if let Ok(secs) = val.parse::<u64>() {
                if secs > 0 {
                    self.sync_interval_secs = secs;
                }
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with QUOTEBOOK_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quotebook")
            .join("config.toml")
    }

    /// Remote URL, if sync is enabled and a URL is configured
    pub fn active_remote_url(&self) -> Option<&str> {
        if self.sync_enabled && !self.remote_url.is_empty() {
            Some(&self.remote_url)
        } else {
            None
        }
    }

    /// Interval between periodic syncs
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.max(1))
    }

    /// Timeout for a single remote fetch
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotebook")
}

fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join("quotebook-session")
}

fn default_remote_url() -> String {
    DEFAULT_REMOTE_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_sync_interval() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_sync_max_items() -> usize {
    10
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "QUOTEBOOK_DATA_DIR",
        "QUOTEBOOK_SESSION_DIR",
        "QUOTEBOOK_REMOTE_URL",
        "QUOTEBOOK_SYNC_ENABLED",
        "QUOTEBOOK_SYNC_INTERVAL",
    ];

    /// Config rooted in a temp directory, remote disabled
    pub(crate) fn test_config(temp_dir: &tempfile::TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().join("data"),
            session_dir: temp_dir.path().join("session"),
            remote_url: String::new(),
            sync_enabled: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.sync_enabled);
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
        assert_eq!(config.sync_interval(), Duration::from_secs(30));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.sync_max_items, 10);
        assert!(config.data_dir.ends_with("quotebook"));
        assert!(config.session_dir.ends_with("quotebook-session"));
    }

    #[test]
    fn test_active_remote_url() {
        let mut config = Config::default();
        assert_eq!(config.active_remote_url(), Some(DEFAULT_REMOTE_URL));

        config.sync_enabled = false;
        assert!(config.active_remote_url().is_none());

        config.sync_enabled = true;
        config.remote_url = String::new();
        assert!(config.active_remote_url().is_none());
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_DATA_DIR", "/tmp/quotebook-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/quotebook-test"));
    }

    #[test]
    fn test_env_override_sync_enabled() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_SYNC_ENABLED", "false");
        config.apply_env_overrides();
        assert!(!config.sync_enabled);

        env::set_var("QUOTEBOOK_SYNC_ENABLED", "1");
        config.apply_env_overrides();
        assert!(config.sync_enabled);

        env::set_var("QUOTEBOOK_SYNC_ENABLED", "TRUE");
        config.sync_enabled = false;
        config.apply_env_overrides();
        assert!(config.sync_enabled);
    }

    #[test]
    fn test_env_override_remote_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_REMOTE_URL", "http://localhost:8080/quotes");
        config.apply_env_overrides();
        assert_eq!(config.remote_url, "http://localhost:8080/quotes");

        // Empty string disables the remote source
        env::set_var("QUOTEBOOK_REMOTE_URL", "");
        config.apply_env_overrides();
        assert!(config.remote_url.is_empty());
        assert!(config.active_remote_url().is_none());
    }

    #[test]
    fn test_env_override_sync_interval() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "5");
        config.apply_env_overrides();
        assert_eq!(config.sync_interval_secs, 5);

        // Garbage and zero are ignored
        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "soon");
        config.apply_env_overrides();
        env::set_var("QUOTEBOOK_SYNC_INTERVAL", "0");
        config.apply_env_overrides();
        assert_eq!(config.sync_interval_secs, 5);
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/quotebook"),
            remote_url: "http://quotes.example.com".to_string(),
            sync_interval_secs: 60,
            ..Config::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("remote_url"));
        assert!(toml_str.contains("sync_interval_secs"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.remote_url, config.remote_url);
        assert_eq!(parsed.sync_interval_secs, 60);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            remote_url = "http://example.com/quotes"
            sync_enabled = false
            fetch_timeout_secs = 3
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.remote_url, "http://example.com/quotes");
        assert!(!config.sync_enabled);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        // Unspecified fields keep their defaults
        assert_eq!(config.sync_interval_secs, 30);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var(
            "QUOTEBOOK_DATA_DIR",
            temp_dir.path().join("data").to_str().unwrap(),
        );

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(config.sync_enabled);
        assert!(config.data_dir.exists());
    }

    #[test]
    fn test_save_to_path_round_trip() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = test_config(&temp_dir);
        config.sync_interval_secs = 45;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.sync_interval_secs, 45);
        assert_eq!(loaded.data_dir, config.data_dir);
        assert!(loaded.remote_url.is_empty());
    }
}
