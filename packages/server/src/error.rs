use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::provider::ProviderError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INSUFFICIENT_CREDITS`, `NOT_FOUND`, `GENERATION_FAILED`,
    /// `INVALID_PROVIDER_OUTPUT`, `DOWNLOAD_FAILED`, `UPLOAD_FAILED`,
    /// `PUBLIC_URL_UNAVAILABLE`, `RECORD_WRITE_FAILED`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Prompt must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    /// The user's credit balance is exhausted.
    InsufficientCredits,
    NotFound(String),
    /// The provider reported the prediction as failed or canceled.
    GenerationFailed(String),
    /// The provider succeeded but returned no usable image URL.
    InvalidProviderOutput(String),
    /// Fetching the generated image from the provider's URL failed.
    DownloadFailed(String),
    /// Writing the image into object storage failed.
    UploadFailed(String),
    PublicUrlUnavailable,
    /// The image was stored but the database record could not be written.
    RecordWriteFailed(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InsufficientCredits => (
                StatusCode::PAYMENT_REQUIRED,
                ErrorBody {
                    code: "INSUFFICIENT_CREDITS",
                    message: "Not enough credits".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::GenerationFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "GENERATION_FAILED",
                    message: msg,
                },
            ),
            AppError::InvalidProviderOutput(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "INVALID_PROVIDER_OUTPUT",
                    message: msg,
                },
            ),
            AppError::DownloadFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "DOWNLOAD_FAILED",
                    message: msg,
                },
            ),
            AppError::UploadFailed(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "UPLOAD_FAILED",
                    message: msg,
                },
            ),
            AppError::PublicUrlUnavailable => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "PUBLIC_URL_UNAVAILABLE",
                    message: "Stored image has no public URL".into(),
                },
            ),
            AppError::RecordWriteFailed(detail) => {
                tracing::error!("Record write failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "RECORD_WRITE_FAILED",
                        message: "Image stored but the record could not be saved".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        tracing::warn!("Provider request failed: {err}");
        AppError::Internal(err.to_string())
    }
}
