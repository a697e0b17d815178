use std::fmt;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Opaque per-user session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the id a client sent back, if it is a well-formed UUID
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(SESSION_ID_HEADER)?.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    fn header_value(&self) -> HeaderValue {
        let mut buf = Uuid::encode_buffer();
        let hyphenated = self.0.hyphenated().encode_lower(&mut buf);
        // A hyphenated UUID is always valid header ASCII.
        HeaderValue::from_str(hyphenated).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Attaches a [`SessionId`] to every request and echoes it in the response.
///
/// Clients without a usable `x-session-id` are issued a fresh one.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session_id = SessionId::from_headers(request.headers()).unwrap_or_default();
    request.extensions_mut().insert(session_id.clone());

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(SESSION_ID_HEADER, session_id.header_value());
    response
}

pub fn make_span_with_session_id(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        session_id = tracing::field::Empty,
    );
    if let Some(id) = request.extensions().get::<SessionId>() {
        span.record("session_id", tracing::field::display(id));
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_headers_accepts_uuid() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            SESSION_ID_HEADER,
            HeaderValue::from_str(&id.to_string()).unwrap(),
        );
        assert_eq!(SessionId::from_headers(&headers), Some(SessionId(id)));
    }

    #[test]
    fn test_from_headers_rejects_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert_eq!(SessionId::from_headers(&headers), None);
        assert_eq!(SessionId::from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_header_value_matches_display() {
        let id = SessionId::new();
        assert_eq!(id.header_value().to_str().unwrap(), id.to_string());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = SessionId::new();
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::Value::String(id.to_string())
        );
    }
}
