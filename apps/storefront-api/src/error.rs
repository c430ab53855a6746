//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront API                     │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /api/orders                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Unknown id? ─── CatalogError::ProductNotFound ───┐              │  │
//! │  │         │                                          │              │  │
//! │  │         ▼                                          ▼              │  │
//! │  │  Bad input? ──── CoreError::Validation ────────► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  HTTP 400                                                               │
//! │  { "success": false, "code": "VALIDATION_ERROR",                        │
//! │    "message": "...", "errors": [{ "field": "zipCode", ... }] }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use portables_catalog::CatalogError;
use portables_core::{CoreError, FieldError};
use serde::Serialize;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "success": false,
///   "code": "NOT_FOUND",
///   "message": "Product not found: 9999"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field failures, present for validation errors
    #[serde(rename = "errors", skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Non-positive quantity on a first add (400)
    InvalidQuantity,

    /// Cart limits exceeded (400)
    CartError,

    /// Malformed request body, path or query (400)
    BadRequest,

    /// An order is already being submitted (409)
    SubmissionInProgress,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError
            | ErrorCode::InvalidQuantity
            | ErrorCode::CartError
            | ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::SubmissionInProgress => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidQuantity { .. } => {
                ApiError::new(ErrorCode::InvalidQuantity, err.to_string())
            }
            CoreError::QuantityTooLarge { .. } | CoreError::LedgerFull { .. } => {
                ApiError::new(ErrorCode::CartError, err.to_string())
            }
            CoreError::SubmissionInProgress => {
                ApiError::new(ErrorCode::SubmissionInProgress, err.to_string())
            }
            CoreError::InvalidTransition { .. } => {
                tracing::error!(error = %err, "Checkout state machine violated");
                ApiError::internal("Checkout is in an unexpected state")
            }
            CoreError::Validation(errors) => ApiError {
                code: ErrorCode::ValidationError,
                message: errors.to_string(),
                field_errors: errors.to_field_errors(),
            },
        }
    }
}

/// Converts catalog errors to API errors.
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        if err.is_not_found() {
            return ApiError::not_found(err.to_string());
        }
        // Log the actual error but return a generic message
        tracing::error!(error = %err, "Catalog error");
        ApiError::internal("Catalog is unavailable")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    #[serde(flatten)]
    error: &'a ApiError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.code == ErrorCode::Internal {
            tracing::error!(message = %self.message, "Request failed");
        }

        let body = ErrorBody {
            success: false,
            error: &self,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use portables_core::{ValidationError, ValidationErrors};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::SubmissionInProgress, StatusCode::CONFLICT),
            (
                CoreError::InvalidQuantity {
                    product_id: 1,
                    quantity: 0,
                },
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::LedgerFull { max: 100 }, StatusCode::BAD_REQUEST),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }

        assert_eq!(
            ApiError::from(CatalogError::ProductNotFound(9)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_carries_fields() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::Required {
            field: "email".to_string(),
        });
        let api = ApiError::from(CoreError::Validation(errors));

        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.field_errors.len(), 1);

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["errors"][0]["field"], "email");
    }

    #[test]
    fn test_plain_error_omits_field_list() {
        let json = serde_json::to_value(ApiError::not_found("Category not found: 9")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn test_internal_catalog_error_is_generic() {
        let err = CatalogError::Load(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let api = ApiError::from(err);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.message, "Catalog is unavailable");
    }
}
