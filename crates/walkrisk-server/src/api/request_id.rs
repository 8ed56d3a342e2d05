//! Per-request correlation IDs.
//!
//! Every request carries an `x-request-id`: the caller's, if it sent a
//! usable one, otherwise a fresh UUID. The ID is echoed on the response and
//! attached to a tracing span so scoring logs can be matched to requests.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied ID we accept before minting our own.
const MAX_REQUEST_ID_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl RequestId {
    /// Reuse the incoming header when it is non-blank and reasonably sized.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty() && value.len() <= MAX_REQUEST_ID_LEN)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self(id)
    }
}

pub async fn ensure_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "http",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_caller_supplied_id() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  trace-42 "));
        assert_eq!(RequestId::from_headers(&headers), RequestId("trace-42".into()));
    }

    #[test]
    fn mints_uuid_for_blank_or_oversized_ids() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let minted = RequestId::from_headers(&headers);
        assert!(uuid::Uuid::parse_str(&minted.0).is_ok());

        let long = "x".repeat(MAX_REQUEST_ID_LEN + 1);
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_str(&long).unwrap());
        assert_ne!(RequestId::from_headers(&headers).0, long);

        assert!(uuid::Uuid::parse_str(&RequestId::from_headers(&HeaderMap::new()).0).is_ok());
    }
}
