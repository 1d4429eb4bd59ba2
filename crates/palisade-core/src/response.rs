//! Immutable response value and its builder helpers.
//!
//! Like [`Request`](crate::Request), a [`Response`] is never edited in
//! place; helpers consume and return. Authentication exits, fallbacks and
//! the transport adapter all rewrite responses through these helpers.

use crate::{Body, Error, Result};
use http::header::{CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Serialize;

/// An immutable HTTP response value.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    /// Creates a response with no headers and an empty body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// A `204 No Content` response.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// A `200 OK` plain-text response.
    #[must_use]
    pub fn text(body: impl Into<Body>) -> Self {
        Self::new(StatusCode::OK)
            .with_body(body)
            .with_content_type(HeaderValue::from_static("text/plain; charset=utf-8"))
    }

    /// A `200 OK` JSON response serialized from `value`.
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        let payload = serde_json::to_vec(value)
            .map_err(|e| Error::internal_with_source("response serialization failed", e))?;
        Ok(Self::new(StatusCode::OK)
            .with_body(payload)
            .with_content_type(HeaderValue::from_static("application/json")))
    }

    /// The response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The response body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Consumes the response, yielding its body.
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// Consumes the response, yielding status, headers and body.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Body) {
        (self.status, self.headers, self.body)
    }

    /// Returns a new response with the status replaced.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns a new response with the body replaced.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a new response with a header appended.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns a new response with every value of `name` removed.
    #[must_use]
    pub fn without_header(mut self, name: &HeaderName) -> Self {
        self.headers.remove(name);
        self
    }

    /// Returns a new response with the content type replaced.
    #[must_use]
    pub fn with_content_type(mut self, value: HeaderValue) -> Self {
        self.headers.remove(CONTENT_TYPE);
        self.headers.append(CONTENT_TYPE, value);
        self
    }

    /// Returns a new response with the JSON content type.
    #[must_use]
    pub fn as_json(self) -> Self {
        self.with_content_type(HeaderValue::from_static("application/json"))
    }

    /// Returns a new response with a `Set-Cookie` header appended.
    ///
    /// `attrs` are rendered verbatim after the value, each terminated by a
    /// semicolon (`Path=/`, `HttpOnly`, `Expires=...`).
    pub fn with_cookie(self, name: &str, value: &str, attrs: &[&str]) -> Result<Self> {
        let mut cookie = format!("{name}={value};");
        for attr in attrs {
            cookie.push_str(attr);
            cookie.push(';');
        }
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| Error::internal_with_source("invalid cookie value", e))?;
        Ok(self.with_header(SET_COOKIE, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_response_sets_content_type() {
        let resp = Response::text("hello");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn json_response_serializes_value() {
        let resp = Response::json(&serde_json::json!({"ok": true})).unwrap();
        assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(resp.into_body().read_all().await, r#"{"ok":true}"#);
    }

    #[test]
    fn content_type_is_replaced_not_duplicated() {
        let resp = Response::text("x").as_json();
        let values: Vec<_> = resp.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec![HeaderValue::from_static("application/json")]);
    }

    #[test]
    fn cookie_renders_value_and_attributes() {
        let resp = Response::empty()
            .with_cookie("session", "abc", &["Path=/", "HttpOnly"])
            .unwrap();
        assert_eq!(
            resp.headers().get(SET_COOKIE).unwrap(),
            "session=abc;Path=/;HttpOnly;"
        );
    }

    #[test]
    fn empty_is_no_content() {
        assert_eq!(Response::empty().status(), StatusCode::NO_CONTENT);
    }
}
