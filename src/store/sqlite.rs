//! SQLite-backed key/value store

use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::{KeyValueStore, StoreResult};
use crate::db::{migrations, Database};

/// Key/value store over the `kv_store` table
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    /// Wrap a database, running migrations first
    pub fn new(database: Database) -> StoreResult<Self> {
        database.with_conn(migrations::run_migrations)?;
        Ok(Self { database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// All keys currently stored, sorted
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let keys = self.database.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM kv_store ORDER BY key ASC")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
            Ok(keys)
        })?;
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let raw: Option<String> = self.database.with_conn(|conn| {
            let raw = conn
                .query_row(
                    "SELECT value FROM kv_store WHERE key = ?1",
                    [key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(raw)
        })?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let text = serde_json::to_string(value)?;
        self.database.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![key, text],
            )?;
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteStore {
        SqliteStore::new(Database::in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_get_missing_key() {
        assert!(store().get("2024-01-01").unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let store = store();
        store.set("stepHistory", &json!({"2024-01-01": 100})).unwrap();
        store.set("stepHistory", &json!({"2024-01-01": 250})).unwrap();

        assert_eq!(
            store.get("stepHistory").unwrap(),
            Some(json!({"2024-01-01": 250}))
        );
        assert_eq!(store.keys().unwrap(), vec!["stepHistory".to_string()]);
    }
}
