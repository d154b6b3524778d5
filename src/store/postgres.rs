//! PostgreSQL-backed store for the `user_data` table. Every request value is
//! passed as a bound parameter; nothing is interpolated into SQL text.

use crate::error::AppError;
use crate::resource::ResourceSpec;
use crate::store::RecordStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::PgPool;

/// Columns of `user_data`, in statement order. `user_id` is the key.
const COLUMNS: [&str; 8] = [
    "user_id", "date", "time", "duration", "country", "city", "path", "device",
];

const SELECT_COLUMNS: &str =
    "user_id, date, time, duration, country, city, path, device";

pub struct PgStore {
    spec: ResourceSpec,
    pool: PgPool,
}

impl PgStore {
    pub fn new(spec: ResourceSpec, pool: PgPool) -> Self {
        PgStore { spec, pool }
    }

    fn storage_err(&self, e: &sqlx::Error, msg: String) -> AppError {
        tracing::error!(error = %e, "database call failed");
        AppError::Storage(msg)
    }

    fn read_err(&self, e: &sqlx::Error) -> AppError {
        self.storage_err(
            e,
            format!("Error al leer la base de datos de {}", self.spec.plural),
        )
    }

    fn write_err(&self, e: &sqlx::Error, action: &str) -> AppError {
        self.storage_err(e, format!("Error al {} el {}", action, self.spec.singular))
    }
}

/// Create `user_data` if it does not exist. All columns TEXT; the primary key
/// on `user_id` backs the uniqueness invariant the generator alone cannot.
pub async fn ensure_user_data_table(pool: &PgPool) -> Result<(), AppError> {
    let ddl = r#"
        CREATE TABLE IF NOT EXISTS user_data (
            user_id TEXT PRIMARY KEY,
            date TEXT,
            time TEXT,
            duration TEXT,
            country TEXT,
            city TEXT,
            path TEXT,
            device TEXT
        )
    "#;
    sqlx::query(ddl).execute(pool).await.map_err(|e| {
        tracing::error!(error = %e, "user_data DDL failed");
        AppError::Storage("Error al preparar la base de datos de usuarios".into())
    })?;
    Ok(())
}

#[async_trait]
impl RecordStore for PgStore {
    async fn list(&self) -> Result<Vec<Value>, AppError> {
        let sql = format!("SELECT {} FROM user_data", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| self.read_err(&e))?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let sql = format!("SELECT {} FROM user_data WHERE user_id = $1", SELECT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.read_err(&e))?;
        Ok(row.as_ref().map(row_to_json))
    }

    async fn create(&self, body: Map<String, Value>) -> Result<Value, AppError> {
        let generated = self.spec.generated_fields(&[]);
        let record = new_row(&generated, &body);

        let sql = "INSERT INTO user_data (user_id, date, time, duration, country, city, path, device) \
                   VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query(sql);
        for col in COLUMNS {
            query = query.bind(record[col].as_str().map(str::to_owned));
        }
        query
            .execute(&self.pool)
            .await
            .map_err(|e| self.write_err(&e, "agregar"))?;
        Ok(Value::Object(record))
    }

    async fn update(
        &self,
        key: &str,
        body: Map<String, Value>,
    ) -> Result<Option<Value>, AppError> {
        let Some(Value::Object(existing)) = self.get(key).await? else {
            return Ok(None);
        };
        let merged = merge_row(existing, body);

        let sql = format!(
            "UPDATE user_data SET date = $1, time = $2, duration = $3, country = $4, \
             city = $5, path = $6, device = $7 WHERE user_id = $8 RETURNING {}",
            SELECT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let mut query = sqlx::query(&sql);
        for col in COLUMNS.iter().skip(1) {
            query = query.bind(merged.get(*col).and_then(Value::as_str).map(str::to_owned));
        }
        let row = query
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.write_err(&e, "actualizar"))?;
        Ok(row.as_ref().map(row_to_json))
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let sql = "DELETE FROM user_data WHERE user_id = $1 RETURNING user_id";
        tracing::debug!(sql = %sql, "query");
        let row = sqlx::query(sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.write_err(&e, "eliminar"))?;
        Ok(row.is_some())
    }
}

/// Column text for binding and echoing: strings pass through, any other
/// non-null value is stringified (the columns are TEXT, so `"city": 5` is
/// stored and returned as `"5"` rather than silently becoming NULL).
fn text_value(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Row for INSERT: one entry per table column, generated fields winning over
/// the body, everything normalized to TEXT. The table has fixed columns, so
/// unlike the file backend extra caller fields are dropped.
fn new_row(generated: &Map<String, Value>, body: &Map<String, Value>) -> Map<String, Value> {
    let mut record = Map::new();
    for col in COLUMNS {
        let v = generated
            .get(col)
            .or_else(|| body.get(col))
            .and_then(text_value)
            .map(Value::String)
            .unwrap_or(Value::Null);
        record.insert(col.to_string(), v);
    }
    record
}

/// Shallow merge for UPDATE: body fields win, absent fields survive. The key
/// stays immutable and fields outside the table's columns are dropped.
fn merge_row(
    mut existing: Map<String, Value>,
    body: Map<String, Value>,
) -> Map<String, Value> {
    for (k, v) in body {
        if k == "user_id" || !COLUMNS.contains(&k.as_str()) {
            continue;
        }
        let v = text_value(&v).map(Value::String).unwrap_or(Value::Null);
        existing.insert(k, v);
    }
    existing
}

fn row_to_json(row: &PgRow) -> Value {
    use sqlx::{Column, Row};
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        let v = row
            .try_get::<Option<String>, _>(name)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null);
        map.insert(name.to_string(), v);
    }
    Value::Object(map)
}
