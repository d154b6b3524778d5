//! Record storage behind a uniform CRUD contract.

mod file;
mod postgres;

pub use file::FileStore;
pub use postgres::{ensure_user_data_table, PgStore};

use crate::error::AppError;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Collection-level CRUD over one resource, regardless of backing storage.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The whole collection, in stored order.
    async fn list(&self) -> Result<Vec<Value>, AppError>;

    /// First record whose key equals `key`, or None.
    async fn get(&self, key: &str) -> Result<Option<Value>, AppError>;

    /// Generate the key and server-set fields, merge them over `body`,
    /// persist, and return the finished record. `body` is assumed to have
    /// passed the required-field check already.
    async fn create(&self, body: Map<String, Value>) -> Result<Value, AppError>;

    /// Shallow merge `body` over the record at `key`: provided fields win,
    /// absent fields survive. None when the key is absent.
    async fn update(&self, key: &str, body: Map<String, Value>)
        -> Result<Option<Value>, AppError>;

    /// Remove the record(s) matching `key`. False when nothing matched.
    async fn delete(&self, key: &str) -> Result<bool, AppError>;
}
