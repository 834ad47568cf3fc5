//! Key-value configuration storage backed by SQLite.
//!
//! Shares a database with [`AuthStorage`](crate::auth::AuthStorage). Pass the
//! same path to both.

use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::Duration;

use crate::consts::{DEFAULT_BIND, DEFAULT_HUB_URL, DEFAULT_INFERENCE_URL, DEFAULT_TIMEOUT_SECS};

pub const KEY_BIND: &str = "bind";
pub const KEY_INFERENCE_URL: &str = "inference_url";
pub const KEY_HUB_URL: &str = "hub_url";
pub const KEY_TIMEOUT: &str = "timeout";

/// Keys accepted by [`Config::set`].
pub const KNOWN_KEYS: &[&str] = &[KEY_BIND, KEY_INFERENCE_URL, KEY_HUB_URL, KEY_TIMEOUT];

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert). The key must be one of [`KNOWN_KEYS`]
    /// and the value must parse for that key.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        validate(key, value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }
}

fn validate(key: &str, value: &str) -> Result<()> {
    match key {
        KEY_BIND => {
            value
                .parse::<SocketAddr>()
                .with_context(|| format!("invalid {key}: {value}"))?;
        }
        KEY_TIMEOUT => {
            value
                .parse::<u64>()
                .with_context(|| format!("invalid {key}: {value}"))?;
        }
        KEY_INFERENCE_URL | KEY_HUB_URL => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("invalid {key}: {value} (expected an http(s) URL)");
            }
        }
        _ => bail!("unknown config key: {key} (known: {})", KNOWN_KEYS.join(", ")),
    }
    Ok(())
}

/// Values given on the command line. `None` means "not passed".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub inference_url: Option<String>,
    pub hub_url: Option<String>,
    pub timeout: Option<u64>,
}

/// Effective settings after layering flags, stored config, and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind: SocketAddr,
    pub inference_url: String,
    pub hub_url: String,
    pub timeout: Duration,
}

impl Settings {
    /// Resolve each setting: command-line flag, then stored config, then default.
    pub fn resolve(config: &Config, overrides: &Overrides) -> Result<Self> {
        let bind = match overrides.bind {
            Some(addr) => addr,
            None => config
                .get(KEY_BIND)?
                .as_deref()
                .unwrap_or(DEFAULT_BIND)
                .parse()
                .with_context(|| format!("invalid stored {KEY_BIND}"))?,
        };

        let inference_url = match &overrides.inference_url {
            Some(url) => url.clone(),
            None => config
                .get(KEY_INFERENCE_URL)?
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
        };

        let hub_url = match &overrides.hub_url {
            Some(url) => url.clone(),
            None => config
                .get(KEY_HUB_URL)?
                .unwrap_or_else(|| DEFAULT_HUB_URL.to_string()),
        };

        let timeout = match overrides.timeout {
            Some(secs) => secs,
            None => match config.get(KEY_TIMEOUT)? {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("invalid stored {KEY_TIMEOUT}: {raw}"))?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Self {
            bind,
            inference_url,
            hub_url,
            timeout: Duration::from_secs(timeout),
        })
    }
}
