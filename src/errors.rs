// ============================================================================
// ERREURS HTTP
// ============================================================================
//
// Description:
//   Toutes les erreurs remontées par les services convergent vers AppError.
//   AppError implémente ResponseError : les handlers retournent simplement
//   Result<HttpResponse, AppError> et utilisent `?`.
//
// Format de réponse:
//   { "error": "<résumé>", "details": "<message>" }
//
// Points d'attention:
//   - Les erreurs 500 ne renvoient jamais le message brut de la BD au client,
//     le détail est loggé côté serveur seulement.
//
// ============================================================================

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::services::stock_service::StockError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidJson(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    details: String,
}

impl AppError {
    /// Résumé court renvoyé dans le champ "error"
    fn summary(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "Validation failed",
            AppError::InvalidJson(_) => "Invalid JSON",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::NotFound(_) => "Not found",
            AppError::Conflict(_) => "Conflict",
            AppError::Stock(StockError::Insufficient { .. }) => "Insufficient stock",
            AppError::Stock(_) => "Invalid stock",
            AppError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => "Duplicate entry",
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => "Invalid reference",
                _ => match err {
                    DbErr::RecordNotFound(_) => "Not found",
                    _ => "Server error",
                },
            },
            AppError::Internal(_) => "Server error",
        }
    }

    fn details(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            return "An unexpected error occurred".to_string();
        }
        match self {
            AppError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    "A record with the same unique value already exists".to_string()
                }
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    "A referenced record does not exist".to_string()
                }
                _ => err.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Stock(StockError::Insufficient { .. }) => StatusCode::CONFLICT,
            AppError::Stock(_) => StatusCode::BAD_REQUEST,
            AppError::Database(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StatusCode::CONFLICT,
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => StatusCode::BAD_REQUEST,
                _ => match err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                },
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        HttpResponse::build(status).json(ErrorBody {
            error: self.summary(),
            details: self.details(),
        })
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        // Format: "champ: message; champ: message" (trié pour être stable)
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(|e| match &e.message {
                        Some(message) => format!("{}: {}", field, message),
                        None => format!("{}: invalid value ({})", field, e.code),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        messages.sort();

        AppError::Validation(messages.join("; "))
    }
}
