use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::errors::ReviewError;

#[derive(Debug)]
/// An error that can be returned by the API
/// and will be converted into a JSON response.
pub(crate) struct ApiError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl From<ReviewError> for ApiError {
    fn from(error: ReviewError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let payload = json!({
            "message": self.message,
            "status": self.status.as_u16(),
        });

        (self.status, axum::Json(payload)).into_response()
    }
}
