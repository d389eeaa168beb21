//! Key-value configuration storage backed by SQLite.
//!
//! Holds the Moltbook service token and the solver's LLM endpoint/token.
//! All commands read the same database — pass the same path everywhere.

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::sync::Mutex;

/// Key for the Moltbook API bearer token.
pub const SERVICE_TOKEN: &str = "moltbook.token";
/// Key for the solver's chat-completions endpoint URL.
pub const SOLVER_ENDPOINT: &str = "solver.endpoint";
/// Key for the solver's API token.
pub const SOLVER_TOKEN: &str = "solver.token";

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

    /// Get a required config value, with a hint on how to set it.
    pub fn require(&self, key: &str) -> Result<String> {
        self.get(key)?.ok_or_else(|| {
            anyhow!("no value stored for '{key}'. Set one with: molt config set {key} <value>")
        })
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let config = mem_config();
        config.set(SERVICE_TOKEN, "moltbook_sk_123").unwrap();
        assert_eq!(
            config.get(SERVICE_TOKEN).unwrap().unwrap(),
            "moltbook_sk_123"
        );
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set(SOLVER_TOKEN, "old").unwrap();
        config.set(SOLVER_TOKEN, "new").unwrap();
        assert_eq!(config.get(SOLVER_TOKEN).unwrap().unwrap(), "new");
    }

    #[test]
    fn remove_deletes_key() {
        let config = mem_config();
        config.set(SERVICE_TOKEN, "test").unwrap();
        config.remove(SERVICE_TOKEN).unwrap();
        assert!(config.get(SERVICE_TOKEN).unwrap().is_none());
    }

    #[test]
    fn remove_nonexistent_is_ok() {
        let config = mem_config();
        config.remove("nonexistent").unwrap();
    }

    #[test]
    fn require_tells_how_to_set_a_missing_key() {
        let config = mem_config();
        let err = config.require(SERVICE_TOKEN).unwrap_err();
        assert!(
            err.to_string()
                .contains("molt config set moltbook.token")
        );
    }

    #[test]
    fn multiple_keys_independent() {
        let config = mem_config();
        config.set(SERVICE_TOKEN, "svc").unwrap();
        config.set(SOLVER_ENDPOINT, "https://llm.example/v1").unwrap();

        assert_eq!(config.get(SERVICE_TOKEN).unwrap().unwrap(), "svc");
        assert_eq!(
            config.get(SOLVER_ENDPOINT).unwrap().unwrap(),
            "https://llm.example/v1"
        );
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config-test.db");
        let path_str = path.to_str().unwrap();

        {
            let config = Config::open(path_str).unwrap();
            config.set(SERVICE_TOKEN, "persisted").unwrap();
        }

        {
            let config = Config::open(path_str).unwrap();
            assert_eq!(config.get(SERVICE_TOKEN).unwrap().unwrap(), "persisted");
        }
    }
}
