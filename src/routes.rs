//! Route table: banner and ping, the generic resource CRUD routes, a CORS
//! layer over everything, and the plain-text 404 fallback.

use crate::handlers::{create, delete as delete_handler, list, read, update};
use crate::state::AppState;
use axum::{http::StatusCode, routing::get, Router};
use tower_http::cors::CorsLayer;

async fn root() -> &'static str {
    "Proyecto backend Sistemas Autoorganizados"
}

async fn ping() -> &'static str {
    "Pong!"
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Ruta no encontrada")
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ping", get(ping))
        .route("/:path_segment", get(list).post(create))
        .route(
            "/:path_segment/:id",
            get(read).put(update).delete(delete_handler),
        )
        .fallback(fallback)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
