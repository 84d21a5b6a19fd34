//! The per-request request/response handle handed to the dispatcher.
//!
//! # Responsibilities
//! - Carry the inbound method, URI, headers and buffered body
//! - Accumulate the outbound status, headers and body written by handlers
//! - Convert to and from axum types at the transport edge
//!
//! # Design Decisions
//! - Owned, not borrowed: the dispatcher takes it by value and hands it back,
//!   so a pooled context never outlives the exchange it was bound to
//! - Response status defaults to 200

use axum::body::{Body, Bytes};
use axum::http::header::IntoHeaderName;
use axum::http::{request, HeaderMap, HeaderValue, Method, Response, StatusCode, Uri};

/// An owned request plus the response being built for it.
#[derive(Debug, Default)]
pub struct Exchange {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    response: ResponseParts,
}

/// Outbound half of an [`Exchange`].
#[derive(Debug)]
pub struct ResponseParts {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Default for ResponseParts {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl Exchange {
    /// Create an exchange with an empty request body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            ..Self::default()
        }
    }

    /// Build from decomposed request parts and an already-buffered body.
    pub fn from_parts(parts: request::Parts, body: Bytes) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
            response: ResponseParts::default(),
        }
    }

    /// Add a request header.
    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The exact request path, without the query string.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn response(&self) -> &ResponseParts {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseParts {
        &mut self.response
    }

    /// Response status written so far.
    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    /// Response body written so far.
    pub fn response_body(&self) -> &[u8] {
        &self.response.body
    }

    /// Response headers written so far.
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response.headers
    }

    /// Convert the outbound half into an axum response.
    pub fn into_response(self) -> Response<Body> {
        let ResponseParts {
            status,
            headers,
            body,
        } = self.response;
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let exchange = Exchange::default();
        assert_eq!(exchange.method(), Method::GET);
        assert_eq!(exchange.path(), "/");
        assert_eq!(exchange.status(), StatusCode::OK);
        assert!(exchange.response_body().is_empty());
    }

    #[test]
    fn test_path_excludes_query() {
        let exchange = Exchange::new(Method::GET, Uri::from_static("/search?q=rust"));
        assert_eq!(exchange.path(), "/search");
        assert_eq!(exchange.uri().query(), Some("q=rust"));
    }

    #[test]
    fn test_into_response() {
        let mut exchange = Exchange::new(Method::GET, Uri::from_static("/"));
        exchange.response_mut().status = StatusCode::CREATED;
        exchange
            .response_mut()
            .headers
            .insert("x-test", "1".parse().unwrap());
        exchange.response_mut().body.extend_from_slice(b"done");

        let response = exchange.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-test"], "1");
    }
}
