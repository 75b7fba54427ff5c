//! Persistent key/value store
//!
//! The tracker persists every piece of state as a JSON document under a
//! string key: one selection set per date, plus fixed keys for the history
//! maps and the catalog.

mod memory;
mod sqlite;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::db::DbError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the daily nutrition totals map
pub const NUTRITION_HISTORY_KEY: &str = "nutritionHistory";
/// Key holding the weight map
pub const WEIGHT_HISTORY_KEY: &str = "weightHistory";
/// Key holding the step count map
pub const STEP_HISTORY_KEY: &str = "stepHistory";
/// Key holding the food catalog
pub const CATALOG_KEY: &str = "foodCatalog";

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("Stored value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Db(DbError::Sqlite(e))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed JSON document store
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &Value) -> StoreResult<()>;

    /// Fetch and deserialize a typed value
    fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a typed value
    fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(value)?;
        self.set(key, &value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
