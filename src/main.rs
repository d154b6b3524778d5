//! Server entry point: env config, tracing, store construction, router.

use registro::{
    app_router, ensure_user_data_table, page_visits, AppConfig, AppState, DurationStrategy,
    FileStore, PgStore, ResourceEntry, ORDERS, PRODUCTS,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("registro=info".parse()?))
        .init();

    let config = AppConfig::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let mut entries = Vec::new();
    for spec in [PRODUCTS, ORDERS] {
        let store = FileStore::new(spec, config.data_dir.join(format!("{}.json", spec.path)));
        store.ensure_file().await?;
        entries.push(ResourceEntry {
            spec,
            store: Arc::new(store),
        });
    }

    match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            ensure_user_data_table(&pool).await?;
            let spec = page_visits(config.visit_key_scheme, DurationStrategy::Weighted);
            entries.push(ResourceEntry {
                spec,
                store: Arc::new(PgStore::new(spec, pool)),
            });
            tracing::info!("page visits backed by PostgreSQL");
        }
        None => {
            let spec = page_visits(config.visit_key_scheme, DurationStrategy::UniformShort);
            let store = FileStore::new(spec, config.data_dir.join(format!("{}.json", spec.path)));
            store.ensure_file().await?;
            entries.push(ResourceEntry {
                spec,
                store: Arc::new(store),
            });
            tracing::info!("page visits backed by JSON file");
        }
    }

    let app = app_router(AppState::new(entries));
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
