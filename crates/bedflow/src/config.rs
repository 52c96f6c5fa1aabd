//! Process configuration.
//!
//! Built once at startup from named settings, validated eagerly and then
//! passed by reference to each stage. Every setting is required.

use crate::error::ConfigError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// SSH gateway host.
pub const SSH_HOST: &str = "SSH_HOST";
/// SSH gateway port.
pub const SSH_PORT: &str = "SSH_PORT";
/// SSH user.
pub const SSH_USER: &str = "SSH_USER";
/// SSH private key path.
pub const SSH_PRIVATE_KEY: &str = "SSH_PRIVATE_KEY";
/// Database user.
pub const DB_USER: &str = "DB_USER";
/// Database password.
pub const DB_PASS: &str = "DB_PASS";
/// Database name.
pub const DB_NAME: &str = "DB_NAME";
/// Database host as seen from the SSH gateway.
pub const REMOTE_DB_HOST: &str = "REMOTE_DB_HOST";
/// Database port as seen from the SSH gateway.
pub const REMOTE_DB_PORT: &str = "REMOTE_DB_PORT";
/// Local end of the forwarded port.
pub const LOCAL_BIND_PORT: &str = "LOCAL_BIND_PORT";
/// Raw table path.
pub const INPUT_FILEPATH: &str = "INPUT_FILEPATH";
/// Cleaned table path.
pub const OUTPUT_FILEPATH_PREPROCESS: &str = "OUTPUT_FILEPATH_PREPROCESS";
/// Feature table path.
pub const OUTPUT_FILEPATH_FEATURE_ENGINEERING: &str = "OUTPUT_FILEPATH_FEATURE_ENGINEERING";

/// Every setting name, in the order they are validated.
pub const SETTING_NAMES: [&str; 13] = [
    SSH_HOST,
    SSH_PORT,
    SSH_USER,
    SSH_PRIVATE_KEY,
    DB_USER,
    DB_PASS,
    DB_NAME,
    REMOTE_DB_HOST,
    REMOTE_DB_PORT,
    LOCAL_BIND_PORT,
    INPUT_FILEPATH,
    OUTPUT_FILEPATH_PREPROCESS,
    OUTPUT_FILEPATH_FEATURE_ENGINEERING,
];

/// SSH gateway in front of the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshConfig {
    /// Gateway host
    pub host: String,
    /// Gateway port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Private key used to authenticate
    pub private_key: String,
}

/// Database reached through the gateway.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Database name
    pub name: String,
    /// Database host behind the gateway
    pub remote_host: String,
    /// Database port behind the gateway
    pub remote_port: u16,
    /// Local port the tunnel binds to
    pub local_bind_port: u16,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("remote_host", &self.remote_host)
            .field("remote_port", &self.remote_port)
            .field("local_bind_port", &self.local_bind_port)
            .finish()
    }
}

/// Table file locations at each stage boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConfig {
    /// Raw table: extractor output, preprocessor input
    pub input: PathBuf,
    /// Cleaned table: preprocessor output, feature engineer input
    pub preprocessed: PathBuf,
    /// Feature table: feature engineer output
    pub features: PathBuf,
}

/// Validated process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SSH gateway
    pub ssh: SshConfig,
    /// Database
    pub database: DatabaseConfig,
    /// Table paths
    pub paths: PathConfig,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any name-to-value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = Settings { lookup };

        Ok(Self {
            ssh: SshConfig {
                host: settings.text(SSH_HOST)?,
                port: settings.parsed(SSH_PORT, "a port number (u16)")?,
                user: settings.text(SSH_USER)?,
                private_key: settings.text(SSH_PRIVATE_KEY)?,
            },
            database: DatabaseConfig {
                user: settings.text(DB_USER)?,
                password: settings.text(DB_PASS)?,
                name: settings.text(DB_NAME)?,
                remote_host: settings.text(REMOTE_DB_HOST)?,
                remote_port: settings.parsed(REMOTE_DB_PORT, "a port number (u16)")?,
                local_bind_port: settings.parsed(LOCAL_BIND_PORT, "a port number (u16)")?,
            },
            paths: PathConfig {
                input: settings.text(INPUT_FILEPATH)?.into(),
                preprocessed: settings.text(OUTPUT_FILEPATH_PREPROCESS)?.into(),
                features: settings.text(OUTPUT_FILEPATH_FEATURE_ENGINEERING)?.into(),
            },
        })
    }
}

struct Settings<F> {
    lookup: F,
}

impl<F> Settings<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn text(&self, name: &'static str) -> Result<String, ConfigError> {
        (self.lookup)(name).ok_or(ConfigError::Missing { name })
    }

    fn parsed<T: FromStr>(&self, name: &'static str, expected: &'static str) -> Result<T, ConfigError> {
        let value = self.text(name)?;
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidType {
                name,
                expected,
                value,
            })
    }
}
