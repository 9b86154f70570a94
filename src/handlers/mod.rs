use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};

use crate::error::Error;

pub mod links;
pub mod users;

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Unwrap a JSON body, reporting any decoding problem as invalid input.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    body.map(|Json(value)| value)
        .map_err(|rejection| Error::invalid("body", rejection.body_text()))
}
