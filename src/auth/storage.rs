use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Credential types stored per provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum Credential {
    #[serde(rename = "api_key")]
    ApiKey { key: String },
}

/// Where the active token came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenSource {
    Stored,
    Env,
    Anonymous,
}

impl TokenSource {
    /// Status line for the banner.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenSource::Stored => "token ✓",
            TokenSource::Env => "token (env) ✓",
            TokenSource::Anonymous => "anonymous",
        }
    }
}

/// Manages credential storage in SQLite.
///
/// Shares a database with [`Config`](crate::config::Config). Pass the same path.
pub struct AuthStorage {
    conn: Mutex<Connection>,
}

impl AuthStorage {
    /// Open or create a credentials table in the given database path.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open credentials database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS credentials (
                provider TEXT PRIMARY KEY,
                data     TEXT NOT NULL
            )",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get credential for a provider.
    pub fn get(&self, provider: &str) -> Result<Option<Credential>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT data FROM credentials WHERE provider = ?1")?;
        let mut rows = stmt.query([provider])?;
        match rows.next()? {
            Some(row) => {
                let json: String = row.get(0)?;
                let cred: Credential = serde_json::from_str(&json)?;
                Ok(Some(cred))
            }
            None => Ok(None),
        }
    }

    /// Store credential for a provider (upsert).
    pub fn set(&self, provider: &str, credential: Credential) -> Result<()> {
        let json = serde_json::to_string(&credential)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO credentials (provider, data) VALUES (?1, ?2)
             ON CONFLICT(provider) DO UPDATE SET data = excluded.data",
            [provider, &json],
        )?;
        Ok(())
    }

    /// Remove credential for a provider.
    pub fn remove(&self, provider: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM credentials WHERE provider = ?1", [provider])?;
        Ok(())
    }

    /// Get the token for a provider and where it came from.
    /// Priority: stored key, then environment variable, then none.
    pub fn get_token(&self, provider: &str, env_var: &str) -> Result<(Option<String>, TokenSource)> {
        if let Some(Credential::ApiKey { key }) = self.get(provider)? {
            return Ok((Some(key), TokenSource::Stored));
        }

        if let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Ok((Some(key), TokenSource::Env));
        }

        Ok((None, TokenSource::Anonymous))
    }
}
