//! Configuration for craftgate
//!
//! Centralized configuration with sensible defaults. Built once at startup and
//! treated as immutable for the lifetime of the process.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{GateError, Result};

/// Main configuration for a craftgate instance
#[derive(Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Remote Console Configuration
    // -------------------------------------------------------------------------
    /// Remote console host name or IP
    pub rcon_host: String,

    /// Remote console TCP port
    pub rcon_port: u16,

    /// Shared secret for the remote console
    pub rcon_password: String,

    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Read timeout per packet (milliseconds)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds)
    pub write_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Server Files Configuration
    // -------------------------------------------------------------------------
    /// Root directory of the game server's data
    /// Internal structure:
    ///   {base_dir}/
    ///     ├── server.properties
    ///     └── mods/
    pub base_dir: PathBuf,

    /// Name of the properties file inside `base_dir`
    pub properties_file: String,

    /// Name of the mods directory inside `base_dir`
    pub mods_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rcon_host: "127.0.0.1".to_string(),
            rcon_port: 25575,
            rcon_password: String::new(),
            connect_timeout_ms: 5000,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
            base_dir: PathBuf::from("/srv/data"),
            properties_file: "server.properties".to_string(),
            mods_dir: "mods".to_string(),
        }
    }
}

// The secret must never end up in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("rcon_host", &self.rcon_host)
            .field("rcon_port", &self.rcon_port)
            .field("rcon_password", &"<redacted>")
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("read_timeout_ms", &self.read_timeout_ms)
            .field("write_timeout_ms", &self.write_timeout_ms)
            .field("base_dir", &self.base_dir)
            .field("properties_file", &self.properties_file)
            .field("mods_dir", &self.mods_dir)
            .finish()
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` of the remote console
    pub fn rcon_addr(&self) -> String {
        format!("{}:{}", self.rcon_host, self.rcon_port)
    }

    /// Full path of the properties file
    pub fn properties_path(&self) -> PathBuf {
        self.base_dir.join(&self.properties_file)
    }

    /// Full path of the mods directory
    pub fn mods_path(&self) -> PathBuf {
        self.base_dir.join(&self.mods_dir)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// `None` (0 ms) disables the read timeout; [`validate`](Self::validate)
    /// rejects that
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// `None` (0 ms) disables the write timeout; [`validate`](Self::validate)
    /// rejects that
    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }

    /// Check the settings that have no usable default
    pub fn validate(&self) -> Result<()> {
        if self.rcon_host.trim().is_empty() {
            return Err(GateError::Config("rcon host must not be empty".to_string()));
        }
        if self.rcon_port == 0 {
            return Err(GateError::Config("rcon port must not be 0".to_string()));
        }
        // Every exchange must be bounded, so no timeout may be switched off
        let timeouts = [
            ("connect", self.connect_timeout_ms),
            ("read", self.read_timeout_ms),
            ("write", self.write_timeout_ms),
        ];
        for (name, ms) in timeouts {
            if ms == 0 {
                return Err(GateError::Config(format!(
                    "{} timeout must be greater than 0",
                    name
                )));
            }
        }
        if self.properties_file.is_empty() || self.mods_dir.is_empty() {
            return Err(GateError::Config(
                "properties file and mods directory names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the remote console host
    pub fn rcon_host(mut self, host: impl Into<String>) -> Self {
        self.config.rcon_host = host.into();
        self
    }

    /// Set the remote console port
    pub fn rcon_port(mut self, port: u16) -> Self {
        self.config.rcon_port = port;
        self
    }

    /// Set the remote console shared secret
    pub fn rcon_password(mut self, password: impl Into<String>) -> Self {
        self.config.rcon_password = password.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds, must be greater than 0)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, must be greater than 0)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set connect, read and write timeouts at once
    pub fn timeout_ms(self, ms: u64) -> Self {
        self.connect_timeout_ms(ms).read_timeout_ms(ms).write_timeout_ms(ms)
    }

    /// Set the server data directory
    pub fn base_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.base_dir = path.into();
        self
    }

    /// Set the properties file name
    pub fn properties_file(mut self, name: impl Into<String>) -> Self {
        self.config.properties_file = name.into();
        self
    }

    /// Set the mods directory name
    pub fn mods_dir(mut self, name: impl Into<String>) -> Self {
        self.config.mods_dir = name.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
