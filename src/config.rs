//! Environment-driven configuration, read once at startup.

use crate::keygen::KeyScheme;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Directory holding the file-backed collections (`<resource>.json`).
    pub data_dir: PathBuf,
    /// When set, page visits are stored in PostgreSQL instead of a JSON file.
    pub database_url: Option<String>,
    pub visit_key_scheme: KeyScheme,
}

impl AppConfig {
    /// `BIND_ADDR` (default `0.0.0.0:3000`), `DATA_DIR` (default `data`),
    /// `DATABASE_URL` (optional), `VISIT_ID_SCHEME` (`letters` default, or
    /// `uuid`).
    pub fn from_env() -> Self {
        let visit_key_scheme = match std::env::var("VISIT_ID_SCHEME").as_deref() {
            Ok("uuid") => KeyScheme::Uuid,
            _ => KeyScheme::LetterPrefixMillis,
        };
        AppConfig {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".into())
                .into(),
            database_url: std::env::var("DATABASE_URL").ok(),
            visit_key_scheme,
        }
    }
}
