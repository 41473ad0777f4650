/**
 * Error Conversion
 *
 * `IntoResponse` for `BackendError`, so handlers can return it directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "someone else just changed this, please refresh and retry (...)",
 *   "kind": "conflict",
 *   "status": 409,
 *   "retriable": true
 * }
 * ```
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::BackendError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    pub status: u16,
    pub retriable: bool,
}

impl From<&BackendError> for ErrorBody {
    fn from(err: &BackendError) -> Self {
        Self {
            error: err.message(),
            kind: err.kind(),
            status: err.status_code().as_u16(),
            retriable: err.retriable(),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "[Http] request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "[Http] request rejected");
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
