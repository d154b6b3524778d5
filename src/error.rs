//! Typed errors and HTTP mapping.
//!
//! Clients receive a plain-text Spanish message plus a status code; the
//! underlying cause is logged server-side where the failure happened.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing required field on create (400).
    #[error("{0}")]
    Validation(String),
    /// Key absent from the collection, or unmatched route (404).
    #[error("{0}")]
    NotFound(String),
    /// Backing file unreadable/unwritable, or database call failed (500).
    #[error("{0}")]
    Storage(String),
}

impl AppError {
    /// `NotFound` with the resource's own message, e.g. "Producto no encontrado".
    pub fn not_found(singular: &str) -> Self {
        let mut msg = String::with_capacity(singular.len() + 14);
        let mut chars = singular.chars();
        if let Some(first) = chars.next() {
            msg.extend(first.to_uppercase());
            msg.push_str(chars.as_str());
        }
        msg.push_str(" no encontrado");
        AppError::NotFound(msg)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_capitalizes_label() {
        let err = AppError::not_found("usuario");
        assert_eq!(err.to_string(), "Usuario no encontrado");
    }
}
