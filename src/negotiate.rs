//! Content negotiation over the `Accept` header.
//!
//! Handlers stay encoding-agnostic: they return [`Negotiated`] values and
//! serialization happens here, at the boundary.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::internal_server_error;

/// Body encodings the API can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Encoding {
    #[default]
    Json,
    Yaml,
}

impl Encoding {
    /// Resolve the encoding from request headers. Anything that does not
    /// ask for YAML negotiates to JSON.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if accept.contains("application/yaml") || accept.contains("application/x-yaml") {
            Encoding::Yaml
        } else {
            Encoding::Json
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Yaml => "application/yaml",
        }
    }
}

impl<S> FromRequestParts<S> for Encoding
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        Ok(Encoding::from_headers(&parts.headers))
    }
}

/// A response body paired with its negotiated encoding.
#[derive(Debug)]
pub struct Negotiated<T> {
    encoding: Encoding,
    status: StatusCode,
    value: T,
}

impl<T> Negotiated<T> {
    pub fn new(encoding: Encoding, value: T) -> Self {
        Self {
            encoding,
            status: StatusCode::OK,
            value,
        }
    }

    /// Override the success status code.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for Negotiated<T> {
    fn into_response(self) -> Response {
        let body = match self.encoding {
            Encoding::Json => serde_json::to_string(&self.value).map_err(|err| err.to_string()),
            Encoding::Yaml => serde_yaml::to_string(&self.value).map_err(|err| err.to_string()),
        };

        match body {
            Ok(body) => Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, self.encoding.content_type())
                .body(body.into())
                .unwrap_or_else(|_| internal_server_error()),
            Err(error) => {
                tracing::error!(%error, "response body serialization failed");
                internal_server_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(accept: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_str(accept).unwrap());
        headers
    }

    #[test]
    fn test_encoding_resolution() {
        assert_eq!(Encoding::from_headers(&HeaderMap::new()), Encoding::Json);
        assert_eq!(Encoding::from_headers(&headers("*/*")), Encoding::Json);
        assert_eq!(
            Encoding::from_headers(&headers("application/json")),
            Encoding::Json
        );
        assert_eq!(
            Encoding::from_headers(&headers("application/yaml")),
            Encoding::Yaml
        );
        assert_eq!(
            Encoding::from_headers(&headers("application/x-yaml, */*")),
            Encoding::Yaml
        );
    }
}
