use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Success envelope for API payloads.
///
/// Failures never come through here: every handler returns `Result`, and
/// `AppError`'s `IntoResponse` builds the error body with the right status
/// code. The `error` field is kept in the wire shape for clients that
/// check it.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = json!({
            "success": self.success,
            "data": self.data,
            "error": self.error,
        });

        (StatusCode::OK, Json(body)).into_response()
    }
}
