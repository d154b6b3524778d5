//! File-backed store: one JSON array per resource, fully read and fully
//! rewritten on every mutating call. A per-store mutex serializes the
//! read-modify-write cycle so interleaved mutations cannot lose an overwrite
//! or hand out duplicate sequential keys.

use crate::error::AppError;
use crate::resource::ResourceSpec;
use crate::store::RecordStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::Mutex;

pub struct FileStore {
    spec: ResourceSpec,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(spec: ResourceSpec, path: impl Into<PathBuf>) -> Self {
        FileStore {
            spec,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Seed the backing file with an empty collection if it does not exist.
    pub async fn ensure_file(&self) -> Result<(), AppError> {
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        tokio::fs::write(&self.path, "[]").await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "seed failed");
            AppError::Storage(format!(
                "Error al preparar la base de datos de {}",
                self.spec.plural
            ))
        })
    }

    fn read_error(&self) -> AppError {
        AppError::Storage(format!(
            "Error al leer la base de datos de {}",
            self.spec.plural
        ))
    }

    async fn read_records(&self) -> Result<Vec<Value>, AppError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "read failed");
            self.read_error()
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "parse failed");
            self.read_error()
        })
    }

    /// Serialize and overwrite the whole file. `action` names the operation
    /// in the client-facing message ("agregar", "actualizar", "eliminar").
    async fn write_records(&self, records: &[Value], action: &str) -> Result<(), AppError> {
        let err = |e: &dyn std::fmt::Display| {
            tracing::error!(path = %self.path.display(), error = %e, "write failed");
            AppError::Storage(format!("Error al {} el {}", action, self.spec.singular))
        };
        let raw = serde_json::to_string_pretty(records).map_err(|e| err(&e))?;
        tokio::fs::write(&self.path, raw).await.map_err(|e| err(&e))
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn list(&self) -> Result<Vec<Value>, AppError> {
        self.read_records().await
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let records = self.read_records().await?;
        Ok(records
            .into_iter()
            .find(|r| self.spec.key_matches(r, key)))
    }

    async fn create(&self, body: Map<String, Value>) -> Result<Value, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let mut record = body;
        for (k, v) in self.spec.generated_fields(&records) {
            record.insert(k, v);
        }
        let record = Value::Object(record);
        records.push(record.clone());
        self.write_records(&records, "agregar").await?;
        Ok(record)
    }

    async fn update(
        &self,
        key: &str,
        body: Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let Some(idx) = records.iter().position(|r| self.spec.key_matches(r, key)) else {
            return Ok(None);
        };
        if let Value::Object(existing) = &mut records[idx] {
            for (k, v) in body {
                existing.insert(k, v);
            }
        }
        let merged = records[idx].clone();
        self.write_records(&records, "actualizar").await?;
        Ok(Some(merged))
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let before = records.len();
        records.retain(|r| !self.spec.key_matches(r, key));
        if records.len() == before {
            return Ok(false);
        }
        self.write_records(&records, "eliminar").await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::{DurationStrategy, KeyScheme};
    use crate::resource::{page_visits, ORDERS, PRODUCTS};
    use serde_json::json;

    async fn temp_store(spec: ResourceSpec) -> FileStore {
        let dir = std::env::temp_dir().join(format!("registro-store-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let store = FileStore::new(spec, dir.join(format!("{}.json", spec.path)));
        store.ensure_file().await.unwrap();
        store
    }

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = temp_store(PRODUCTS).await;
        let created = store
            .create(obj(json!({"name": "cafe", "price": 12})))
            .await
            .unwrap();
        assert_eq!(created["idProduct"], json!(1));
        assert_eq!(created["name"], json!("cafe"));

        let fetched = store.get("1").await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn sequential_keys_from_empty() {
        let store = temp_store(PRODUCTS).await;
        for expected in 1..=3 {
            let created = store.create(obj(json!({"n": expected}))).await.unwrap();
            assert_eq!(created["idProduct"], json!(expected));
        }
    }

    #[tokio::test]
    async fn update_merges_shallowly() {
        let store = temp_store(PRODUCTS).await;
        store
            .create(obj(json!({"a": 0, "b": 2})))
            .await
            .unwrap();
        let merged = store
            .update("1", obj(json!({"a": 1})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged["a"], json!(1));
        assert_eq!(merged["b"], json!(2));
        assert_eq!(merged["idProduct"], json!(1));
    }

    #[tokio::test]
    async fn update_missing_key_is_none() {
        let store = temp_store(PRODUCTS).await;
        assert!(store
            .update("999999", obj(json!({"a": 1})))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_twice_reports_missing() {
        let store = temp_store(ORDERS).await;
        store.create(obj(json!({"item": "x"}))).await.unwrap();
        assert!(store.delete("1").await.unwrap());
        assert!(!store.delete("1").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn order_create_stamps_order_date() {
        let store = temp_store(ORDERS).await;
        let created = store.create(obj(json!({"item": "te"}))).await.unwrap();
        assert_eq!(created["order_id"], json!(1));
        assert!(created["order_date"].is_string());
    }

    #[tokio::test]
    async fn visit_create_generates_string_key_and_stamps() {
        let spec = page_visits(KeyScheme::LetterPrefixMillis, DurationStrategy::UniformShort);
        let store = temp_store(spec).await;
        let created = store
            .create(obj(json!({
                "device": "movil", "path": "/", "country": "CO", "city": "Cali"
            })))
            .await
            .unwrap();
        let id = created["user_id"].as_str().unwrap().to_string();
        assert!(id[..4].chars().all(|c| c.is_ascii_uppercase()));
        assert!(created["duration"].is_string());

        let fetched = store.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn extra_fields_survive_as_is() {
        let store = temp_store(PRODUCTS).await;
        let created = store
            .create(obj(json!({"whatever": {"nested": true}})))
            .await
            .unwrap();
        assert_eq!(created["whatever"]["nested"], json!(true));
    }

    #[tokio::test]
    async fn missing_file_is_storage_error() {
        let dir = std::env::temp_dir().join(format!("registro-store-{}", uuid::Uuid::new_v4()));
        let store = FileStore::new(PRODUCTS, dir.join("products.json"));
        let err = store.list().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(err.to_string(), "Error al leer la base de datos de productos");
    }

    #[tokio::test]
    async fn seed_failure_names_the_collection() {
        let dir = std::env::temp_dir().join(format!("registro-store-{}", uuid::Uuid::new_v4()));
        // Parent directory never created, so the seed write fails.
        let store = FileStore::new(PRODUCTS, dir.join("products.json"));
        let err = store.ensure_file().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error al preparar la base de datos de productos"
        );
    }

    #[tokio::test]
    async fn unparseable_file_is_storage_error() {
        let store = temp_store(PRODUCTS).await;
        tokio::fs::write(&store.path, "not json").await.unwrap();
        assert!(matches!(
            store.list().await.unwrap_err(),
            AppError::Storage(_)
        ));
    }
}
