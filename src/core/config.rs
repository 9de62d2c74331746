use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_wal_path")]
    pub wal_path: PathBuf,
    /// Rewrite the WAL as a snapshot after replay
    #[serde(default = "default_compact_on_startup")]
    pub compact_on_startup: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Account created when the store holds no administrators
    #[serde(default = "default_bootstrap_username")]
    pub bootstrap_username: String,
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Idle seconds before a session is dropped
    #[serde(default = "default_session_timeout")]
    pub session_timeout: i64,
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_console")]
    pub console: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            wal_path: default_wal_path(),
            compact_on_startup: default_compact_on_startup(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bootstrap_username: default_bootstrap_username(),
            bootstrap_password: default_bootstrap_password(),
            session_cookie: default_session_cookie(),
            session_timeout: default_session_timeout(),
            cleanup_interval: default_cleanup_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            console: default_console(),
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_wal_path() -> PathBuf {
    PathBuf::from("reservations.wal")
}

fn default_compact_on_startup() -> bool {
    true
}

fn default_bootstrap_username() -> String {
    "admin".to_string()
}

fn default_bootstrap_password() -> String {
    "admin123".to_string()
}

fn default_session_cookie() -> String {
    "admin_session".to_string()
}

fn default_session_timeout() -> i64 {
    3600 // 1 hour
}

fn default_cleanup_interval() -> u64 {
    300 // 5 minutes
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_console() -> bool {
    false
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() && self.server.unix_socket.is_none() {
            bail!("Either port or unix_socket must be specified in server config");
        }

        if let Some(port) = self.server.port {
            if port == 0 {
                bail!("Server port must be greater than 0");
            }
        }

        if self.server.num_threads == 0 {
            bail!("num_threads must be greater than 0");
        }

        if self.storage.wal_path.as_os_str().is_empty() {
            bail!("wal_path must not be empty");
        }

        if self.admin.bootstrap_username.is_empty() {
            bail!("bootstrap_username must not be empty");
        }

        if self.admin.bootstrap_password.is_empty() {
            bail!("bootstrap_password must not be empty");
        }

        let cookie_ok = !self.admin.session_cookie.is_empty()
            && self
                .admin
                .session_cookie
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !cookie_ok {
            bail!(
                "Invalid session_cookie '{}'. Use letters, digits, '_' or '-'",
                self.admin.session_cookie
            );
        }

        if self.admin.cleanup_interval == 0 {
            bail!("cleanup_interval must be greater than 0");
        }

        if self.admin.session_timeout <= self.admin.cleanup_interval as i64 {
            bail!(
                "session_timeout ({}) must be greater than cleanup_interval ({})",
                self.admin.session_timeout,
                self.admin.cleanup_interval
            );
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            );
        }

        let valid_formats = ["json", "console"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: json, console",
                self.logging.format
            );
        }

        Ok(())
    }
}
