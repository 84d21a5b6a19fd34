//! Per-request context handed to every handler in a chain.
//!
//! # Responsibilities
//! - Expose the bound [`Exchange`] (request accessors, response writers)
//! - Carry the abort flag that short-circuits the chain
//! - Hold a per-request key-value store for passing data between handlers
//!
//! # Design Decisions
//! - Contexts are pooled; every per-request field is reset on acquisition
//!   and cleared again on release
//! - Data values are typed by the caller and looked up with a downcast

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use axum::body::Bytes;
use axum::http::header::{IntoHeaderName, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use serde::Serialize;

use crate::http::Exchange;

/// Request-scoped context.
#[derive(Default)]
pub struct Context {
    exchange: Exchange,
    aborted: bool,
    data: HashMap<String, Box<dyn Any + Send>>,
}

impl Context {
    /// A fresh, unpooled context bound to `exchange`.
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange,
            ..Self::default()
        }
    }

    /// Bind a new exchange and wipe all per-request state.
    pub(crate) fn reset(&mut self, exchange: Exchange) {
        self.exchange = exchange;
        self.aborted = false;
        self.data.clear();
    }

    /// Detach the bound exchange, leaving an empty one behind.
    pub(crate) fn take_exchange(&mut self) -> Exchange {
        std::mem::take(&mut self.exchange)
    }

    /// Drop everything a finished request left behind.
    pub(crate) fn recycle(&mut self) {
        self.exchange = Exchange::default();
        self.aborted = false;
        self.data.clear();
    }

    // -- request ---------------------------------------------------------

    pub fn method(&self) -> &Method {
        self.exchange.method()
    }

    pub fn path(&self) -> &str {
        self.exchange.path()
    }

    pub fn uri(&self) -> &Uri {
        self.exchange.uri()
    }

    pub fn query(&self) -> Option<&str> {
        self.exchange.uri().query()
    }

    pub fn request_headers(&self) -> &HeaderMap {
        self.exchange.headers()
    }

    /// A request header as a string, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.exchange.headers().get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        self.exchange.body()
    }

    // -- response --------------------------------------------------------

    pub fn status(&self) -> StatusCode {
        self.exchange.status()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.exchange.response_mut().status = status;
    }

    /// Set (replace) a response header.
    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.exchange.response_mut().headers.insert(name, value);
    }

    pub fn set_content_type(&mut self, value: &'static str) {
        self.set_header(CONTENT_TYPE, HeaderValue::from_static(value));
    }

    pub fn response_headers(&self) -> &HeaderMap {
        self.exchange.response_headers()
    }

    /// Replace the response body.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        let body = body.into();
        let out = &mut self.exchange.response_mut().body;
        out.clear();
        out.extend_from_slice(&body);
    }

    /// Append to the response body.
    pub fn write(&mut self, chunk: &[u8]) {
        self.exchange.response_mut().body.extend_from_slice(chunk);
    }

    pub fn response_body(&self) -> &[u8] {
        self.exchange.response_body()
    }

    /// Serialize `value` as the JSON response body.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_vec(value)?;
        self.set_content_type("application/json");
        self.exchange.response_mut().body = encoded;
        Ok(())
    }

    // -- chain control ---------------------------------------------------

    /// Stop the chain after the current handler returns.
    ///
    /// The caller is expected to have written its response already; the
    /// dispatcher writes nothing on abort.
    pub fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    // -- data store ------------------------------------------------------

    /// Store a value under `key`, replacing any previous value.
    pub fn set_data<T: Any + Send>(&mut self, key: impl Into<String>, value: T) {
        self.data.insert(key.into(), Box::new(value));
    }

    /// The value under `key`, if present and of type `T`.
    pub fn get_data<T: Any>(&self, key: &str) -> Option<&T> {
        self.data.get(key).and_then(|v| v.downcast_ref())
    }

    pub fn get_data_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.data.get_mut(key).and_then(|v| v.downcast_mut())
    }

    /// Remove and return the value under `key` if it is of type `T`.
    ///
    /// A value of another type is left in place.
    pub fn remove_data<T: Any>(&mut self, key: &str) -> Option<T> {
        if !self.data.get(key).is_some_and(|v| v.is::<T>()) {
            return None;
        }
        self.data
            .remove(key)
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.method())
            .field("path", &self.path())
            .field("aborted", &self.aborted)
            .field("data_keys", &self.data.len())
            .finish_non_exhaustive()
    }
}
