//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Mensaje fijo cuando ningún tarif corresponde a los criterios
pub const NO_MATCHING_TARIF_MESSAGE: &str = "No matching tarif found for the given criteria";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No matching tarif found for the given criteria")]
    TariffNotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    status: &'static str,
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, details: Option<serde_json::Value>, code: &str) -> Self {
        Self {
            status: "error",
            error: error.to_string(),
            message,
            details,
            code: Some(code.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::TariffNotFound => {
                tracing::info!("🔎 {}", NO_MATCHING_TARIF_MESSAGE);
                // Resultado de dominio esperado: cuerpo fijo, sin envoltorio de error técnico
                return (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "status": "error",
                        "message": NO_MATCHING_TARIF_MESSAGE,
                    })),
                )
                    .into_response();
            }

            AppError::Database(e) => {
                tracing::error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        Some(json!({ "sql_error": e.to_string() })),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        Some(json!(e)),
                        "VALIDATION_ERROR",
                    ),
                )
            }

            AppError::Unauthorized(msg) => {
                tracing::warn!("🔒 Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, None, "UNAUTHORIZED"),
                )
            }

            AppError::NotFound(msg) => {
                tracing::info!("🔎 Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, None, "NOT_FOUND"),
                )
            }

            AppError::BadRequest(msg) => {
                tracing::warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, None, "BAD_REQUEST"),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        Some(json!({ "internal_error": msg })),
                        "INTERNAL_ERROR",
                    ),
                )
            }

            AppError::ServiceUnavailable(msg) => {
                tracing::error!("❌ Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("Service Unavailable", msg, None, "SERVICE_UNAVAILABLE"),
                )
            }

            AppError::Jwt(msg) => {
                tracing::warn!("🔒 JWT error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("JWT Error", msg, None, "JWT_ERROR"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación sobre un único campo
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("invalid");
    error.message = Some(Cow::Borrowed(message));
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Campo obligatorio ausente
pub fn required_field_error(field: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed("This field is required."));

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_error_names_the_field() {
        match required_field_error("vehicle_id") {
            AppError::Validation(errors) => {
                let fields = errors.field_errors();
                assert_eq!(fields.len(), 1);
                assert!(fields.contains_key("vehicle_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::TariffNotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found_error("Vehicle", 7).into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unauthorized("x".to_string()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            internal_error("boom").into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
