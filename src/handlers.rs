//! CRUD handlers. The resource is resolved from the first path segment, so
//! one set of handlers serves every mounted collection.

use crate::error::AppError;
use crate::service::RequestValidator;
use crate::state::{AppState, ResourceEntry};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

fn resolve<'a>(state: &'a AppState, segment: &str) -> Result<&'a ResourceEntry, AppError> {
    state
        .resource(segment)
        .ok_or_else(|| AppError::NotFound("Ruta no encontrada".into()))
}

fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::Validation(
            "El cuerpo debe ser un objeto JSON".into(),
        )),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<Vec<Value>>, AppError> {
    let entry = resolve(&state, &segment)?;
    Ok(Json(entry.store.list().await?))
}

pub async fn read(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let entry = resolve(&state, &segment)?;
    let record = entry
        .store
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(entry.spec.singular))?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let entry = resolve(&state, &segment)?;
    let body = body_to_map(body)?;
    RequestValidator::validate(&body, &entry.spec)?;
    let record = entry.store.create(body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let entry = resolve(&state, &segment)?;
    let body = body_to_map(body)?;
    let record = entry
        .store
        .update(&id, body)
        .await?
        .ok_or_else(|| AppError::not_found(entry.spec.singular))?;
    Ok(Json(record))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((segment, id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let entry = resolve(&state, &segment)?;
    if entry.store.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(entry.spec.singular))
    }
}
