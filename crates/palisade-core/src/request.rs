//! Immutable request value.
//!
//! A [`Request`] is never edited in place: every helper consumes the value
//! and returns a new one with the change applied. Handlers are composed in
//! layers, and each layer must be free to rewrite headers without
//! affecting sibling layers holding the same request value.

use crate::{Body, Error, Result};
use http::uri::PathAndQuery;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// An immutable HTTP request value.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    /// Creates a request with no headers and an empty body.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Body::empty(),
        }
    }

    /// Creates a request from previously captured parts.
    #[must_use]
    pub fn from_parts(head: RequestHead, body: Body) -> Self {
        Self {
            method: head.method,
            uri: head.uri,
            headers: head.headers,
            body,
        }
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body.
    #[must_use]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Consumes the request, yielding its body.
    #[must_use]
    pub fn into_body(self) -> Body {
        self.body
    }

    /// A cloneable snapshot of everything but the body.
    #[must_use]
    pub fn head(&self) -> RequestHead {
        RequestHead {
            method: self.method.clone(),
            uri: self.uri.clone(),
            headers: self.headers.clone(),
        }
    }

    /// Returns a new request with the body replaced.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns a new request with a header appended.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns a new request with every value of `name` removed.
    #[must_use]
    pub fn without_header(mut self, name: &HeaderName) -> Self {
        self.headers.remove(name);
        self
    }

    /// Returns a new request where `name` carries exactly `value`.
    ///
    /// Any previously present values are dropped in the same operation, so
    /// a layer can overwrite a channel header without a window where both
    /// the old and the new value are visible.
    #[must_use]
    pub fn with_replaced_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.remove(&name);
        self.headers.append(name, value);
        self
    }

    /// Reads and parses the body as JSON.
    ///
    /// Consumes the remaining body bytes; like any body read, this works
    /// once.
    pub async fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let raw = self.body.read_all().await;
        serde_json::from_slice(&raw).map_err(|e| Error::malformed("request body", e.to_string()))
    }

    /// Returns a new request with the URI path replaced, keeping the query.
    pub fn with_path(mut self, path: &str) -> Result<Self> {
        let mut parts = self.uri.into_parts();
        let pq = match parts.path_and_query.as_ref().and_then(PathAndQuery::query) {
            Some(query) => format!("{path}?{query}").parse::<PathAndQuery>(),
            None => path.parse::<PathAndQuery>(),
        }
        .map_err(|e| Error::malformed("uri", e.to_string()))?;
        parts.path_and_query = Some(pq);
        self.uri = Uri::from_parts(parts)
            .map_err(|e| Error::malformed("uri", e.to_string()))?;
        Ok(self)
    }
}

/// A cloneable snapshot of a request's method, URI and headers.
///
/// Bodies are consumable once and cannot travel with a snapshot; recovery
/// layers that need to describe a failed request use this instead.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// The request method.
    pub method: Method,
    /// The request URI.
    pub uri: Uri,
    /// The request headers.
    pub headers: HeaderMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> Request {
        Request::new(Method::GET, Uri::from_static("/items?page=2"))
    }

    #[test]
    fn header_edits_do_not_leak_between_values() {
        let a = request().with_header(
            HeaderName::from_static("x-tag"),
            HeaderValue::from_static("one"),
        );
        let b = a.head();
        let a = a.without_header(&HeaderName::from_static("x-tag"));
        assert!(a.headers().get("x-tag").is_none());
        assert_eq!(b.headers.get("x-tag").unwrap(), "one");
    }

    #[test]
    fn replaced_header_drops_previous_values() {
        let name = HeaderName::from_static("x-channel");
        let rq = request()
            .with_header(name.clone(), HeaderValue::from_static("forged"))
            .with_header(name.clone(), HeaderValue::from_static("forged-too"))
            .with_replaced_header(name.clone(), HeaderValue::from_static("real"));
        let values: Vec<_> = rq.headers().get_all(&name).iter().collect();
        assert_eq!(values, vec![HeaderValue::from_static("real")]);
    }

    #[test]
    fn with_path_keeps_query() {
        let rq = request().with_path("/other").unwrap();
        assert_eq!(rq.path(), "/other");
        assert_eq!(rq.uri().query(), Some("page=2"));
    }

    #[tokio::test]
    async fn body_travels_with_the_request() {
        let rq = request().with_body("payload");
        assert_eq!(rq.into_body().read_all().await, "payload");
    }

    #[tokio::test]
    async fn json_parses_the_body() {
        let rq = request().with_body(r#"{"name":"alice"}"#);
        let parsed: serde_json::Value = rq.json().await.unwrap();
        assert_eq!(parsed["name"], "alice");
    }

    #[tokio::test]
    async fn broken_json_is_malformed() {
        let rq = request().with_body("{not json");
        let parsed: Result<serde_json::Value> = rq.json().await;
        assert!(matches!(parsed.unwrap_err(), Error::Malformed { .. }));
    }
}
