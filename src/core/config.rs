use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub device: DeviceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub unix_socket: Option<PathBuf>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
}

/// Where the parking controller lives
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub base_url: String,
    #[serde(default = "default_device_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: i64,
    #[serde(default)]
    pub secure_cookie: bool,
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

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_secs: default_session_ttl(),
            secure_cookie: false,
        }
    }
}

// Default value functions
fn default_num_threads() -> usize {
    num_cpus::get()
}

fn default_device_timeout() -> u64 {
    10
}

fn default_database_path() -> PathBuf {
    PathBuf::from("usuarios.db")
}

fn default_cookie_name() -> String {
    "parking_session".to_string()
}

/// Longest session a login may open
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

fn default_session_ttl() -> i64 {
    604_800 // 7 days
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
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .context("Failed to parse config file")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate server config
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

        // Validate device config
        if self.device.base_url.is_empty() {
            bail!("device base_url must not be empty");
        }

        if !self.device.base_url.starts_with("http://")
            && !self.device.base_url.starts_with("https://")
        {
            bail!(
                "device base_url '{}' must start with http:// or https://",
                self.device.base_url
            );
        }

        if self.device.timeout_secs == 0 {
            bail!("device timeout_secs must be greater than 0");
        }

        if self.database.path.as_os_str().is_empty() {
            bail!("database path must not be empty");
        }

        // Validate session config
        if self.session.cookie_name.is_empty() {
            bail!("session cookie_name must not be empty");
        }

        if self.session.ttl_secs <= 0 {
            bail!("session ttl_secs must be greater than 0");
        }

        if self.session.ttl_secs > MAX_SESSION_TTL_SECS {
            bail!(
                "session ttl_secs must be at most {} (one year)",
                MAX_SESSION_TTL_SECS
            );
        }

        // Validate logging config
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
