//! Success envelope shared by every JSON endpoint.
//!
//! ```json
//! { "success": true, "data": [...], "count": 4 }
//! { "success": true, "message": "Product added to cart", "data": {...} }
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub data: T,

    /// Number of entries when `data` is a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data,
            count: None,
            status: StatusCode::OK,
        }
    }

    /// 201 Created.
    pub fn created(data: T) -> Self {
        ApiResponse {
            status: StatusCode::CREATED,
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List response with `count` filled in.
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        ApiResponse {
            count: Some(count),
            ..Self::ok(data)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_message_envelope() {
        let response = ApiResponse::ok("x").with_message("Product added to cart");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Product added to cart");
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_created_status() {
        let response = ApiResponse::created(()).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
