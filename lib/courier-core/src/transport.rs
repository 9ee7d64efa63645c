//! The transport seam: wire-level request/response values and the
//! [`Transport`] trait any conforming HTTP stack implements.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use url::Url;

use crate::{DEFAULT_TIMEOUT, Headers, TransportError};

/// Capability to execute one HTTP request on the wire.
///
/// The `courier` crate ships a hyper-based implementation; tests may supply
/// their own.
pub trait Transport: Send + Sync {
    /// Execute the request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on connection failures, timeouts, TLS
    /// problems, or a malformed response.
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = Result<Response, TransportError>> + Send;
}

/// A wire-level HTTP request: method, URL, resolved headers, optional body,
/// and the per-attempt timeout.
#[derive(Debug, Clone)]
pub struct Request {
    method: http::Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
    timeout: Duration,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: http::Method, url: Url) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &http::Method {
        &self.method
    }

    /// Request URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Consume into (method, url, headers, body, timeout).
    #[must_use]
    pub fn into_parts(self) -> (http::Method, Url, Headers, Option<Bytes>, Duration) {
        (self.method, self.url, self.headers, self.body, self.timeout)
    }
}

/// Builder for [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: http::Method,
    url: Url,
    headers: Headers,
    body: Option<Bytes>,
    timeout: Duration,
}

impl RequestBuilder {
    /// Creates a new builder with the default timeout.
    #[must_use]
    pub fn new(method: http::Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
            body: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets multiple headers.
    #[must_use]
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
        }
    }
}

/// A buffered HTTP response: status, headers, body bytes.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: Bytes,
}

impl Response {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: Headers, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consume into the body bytes.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, Headers, Bytes) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Deserialize the body as JSON with the default date policy.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// The body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}
