//! registro: a small record store with an HTTP CRUD interface.

pub mod config;
pub mod error;
pub mod handlers;
pub mod keygen;
pub mod resource;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::AppConfig;
pub use error::AppError;
pub use keygen::{DurationStrategy, KeyScheme};
pub use resource::{page_visits, ResourceSpec, StampFields, ORDERS, PRODUCTS};
pub use routes::app_router;
pub use service::RequestValidator;
pub use state::{AppState, ResourceEntry};
pub use store::{ensure_user_data_table, FileStore, PgStore, RecordStore};
