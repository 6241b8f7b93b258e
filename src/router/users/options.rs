//! Verb discovery for the collection endpoint.

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

const ALLOWED: &str = "POST,GET,OPTIONS";

pub async fn handler() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, ALLOWED)])
}
