//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Errors fall into three groups: validation failures raised while building a
//! query or a domain value (never reaching the database), execution failures
//! reported by PostgreSQL, and boundary errors such as malformed requests or
//! missing configuration. A "not found" outcome is not an error at the data
//! layer; handlers turn empty results into `AppError::NotFound` themselves.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! it directly. `From` implementations exist for `sqlx::Error`,
//! `validator::ValidationErrors`, `bcrypt::BcryptError` and
//! `sqlx::migrate::MigrateError`, allowing for easy conversion using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, PartialEq)]
pub enum AppError {
    /// A malformed request that could not be parsed (HTTP 400).
    BadRequest(String),
    /// The requested rows do not exist (HTTP 404).
    NotFound(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A statement failed while executing against PostgreSQL (HTTP 500).
    /// The message carries the failed action and the driver's text.
    DatabaseError(String),
    /// Invalid table, column, value or entity field (HTTP 422 Unprocessable Entity).
    ValidationError(String),
    /// Missing or malformed environment configuration (HTTP 500).
    Configuration(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side failures are logged before the response is built so the
/// original message is never lost behind a generic 500.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "error": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::Configuration(msg) => {
                log::error!("{}", self);
                HttpResponse::InternalServerError().json(json!({
                    "error": msg
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError::DatabaseError`.
///
/// The data layer reports missing rows as empty results, so `RowNotFound`
/// is not special-cased here.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::DatabaseError(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Failed to run migrations: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Failed to hash password: {}", error))
    }
}
