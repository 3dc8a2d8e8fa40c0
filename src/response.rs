//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Success envelope: `{status_code, message, data}`. `data` is omitted for bare acknowledgements.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn success<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (
        status,
        Json(Envelope {
            status_code: status.as_u16(),
            message: message.to_string(),
            data: Some(data),
        }),
    )
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    success(StatusCode::OK, "success", data)
}

pub fn acknowledge(status: StatusCode, message: &str) -> (StatusCode, Json<Envelope<()>>) {
    (
        status,
        Json(Envelope {
            status_code: status.as_u16(),
            message: message.to_string(),
            data: None,
        }),
    )
}
