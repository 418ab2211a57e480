//! Rendering of protocol-neutral results into HTTP responses.

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use ftpgate_core::model::{HttpResult, ResponseBody};

/// Render an [`HttpResult`] with the content type its body calls for.
pub fn render(result: HttpResult) -> Response {
    match result.body {
        ResponseBody::Text(text) => {
            (result.status, [(CONTENT_TYPE, "text/plain")], text).into_response()
        }
        ResponseBody::Binary(bytes) => (
            result.status,
            [(CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response(),
        ResponseBody::Json(value) => (
            result.status,
            [(CONTENT_TYPE, "application/json; charset=utf-8")],
            value.to_string(),
        )
            .into_response(),
    }
}
