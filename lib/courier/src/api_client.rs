//! The request orchestrator.
//!
//! [`ApiClient`] executes one [`Endpoint`] to completion: it resolves headers
//! through the [`HeaderProvider`], runs the transport call, classifies the
//! response, and on an authorization failure performs exactly one
//! refresh-and-retry cycle before surfacing the normalized [`ApiError`].
//!
//! The client holds no call-to-call mutable state; any number of calls may
//! run concurrently without client-side locking.

use bytes::Bytes;
use courier_core::{
    ApiError, Endpoint, HeaderMode, HeaderProvider, Headers, Request, Response, Result, Transport,
    from_json_with,
};
use tracing::warn;
use url::Url;

use crate::HyperTransport;

/// Per-attempt response classification.
///
/// Computed exactly once per attempt so the retry/no-retry ordering stays
/// explicit: a 401 is checked for retry eligibility before any payload error
/// decoding happens.
#[derive(Debug)]
enum Disposition {
    /// 2xx: the body bytes, unmodified.
    Success(Bytes),
    /// 401 on a provider-resolved attempt: refresh headers and retry once.
    RetryWithFreshHeaders,
    /// Any other non-2xx status (including 401 when the mode disables
    /// refresh): classify the body into an error.
    Failure(u16, Bytes),
}

impl Disposition {
    fn classify(response: Response, mode: &HeaderMode) -> Self {
        if response.is_success() {
            return Self::Success(response.into_body());
        }
        let (status, _, body) = response.into_parts();
        if status == 401 && mode.allows_refresh() {
            return Self::RetryWithFreshHeaders;
        }
        Self::Failure(status, body)
    }
}

/// HTTP client combining a [`HeaderProvider`] with a [`Transport`].
///
/// # Example
///
/// ```ignore
/// use courier::{ApiClient, Endpoint, HyperTransport};
/// use courier::providers::StaticHeaders;
///
/// let provider = StaticHeaders::new(headers);
/// let client = ApiClient::new(provider);
///
/// let user: User = client.get("https://api.example.com/users/1".parse()?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<P, T = HyperTransport> {
    provider: P,
    transport: T,
}

impl<P: HeaderProvider> ApiClient<P> {
    /// Create a client over the default hyper transport.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self::with_transport(provider, HyperTransport::new())
    }
}

impl<P, T> ApiClient<P, T>
where
    P: HeaderProvider,
    T: Transport,
{
    /// Create a client over a custom transport.
    #[must_use]
    pub const fn with_transport(provider: P, transport: T) -> Self {
        Self {
            provider,
            transport,
        }
    }

    /// Get a reference to the header provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Get a reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute the endpoint and return the successful response body bytes.
    ///
    /// This is the primitive the other operations build on. A 401 response
    /// on a provider-resolved endpoint triggers exactly one header refresh
    /// and one re-attempt; the derived retry endpoint carries the renewed
    /// headers in its mode, which makes a second refresh unrepresentable.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`]: decoded verbatim from a structured error
    /// payload, synthesized from the HTTP status (raw body attached), or a
    /// client-side error (code -1) for provider/transport failures.
    pub async fn fetch_bytes(&self, endpoint: Endpoint) -> Result<Bytes> {
        let mut current = endpoint;
        loop {
            match self.attempt(&current).await? {
                Disposition::Success(body) => return Ok(body),
                Disposition::RetryWithFreshHeaders => {
                    // Requires Provider mode, and the derived endpoint is in
                    // Refreshed mode, so this arm runs at most once.
                    let headers = self.refresh_headers(&current).await?;
                    current = current.refreshed(headers);
                }
                Disposition::Failure(status, body) => {
                    let err = ApiError::from_response(status, body);
                    warn!(
                        url = %current.url(),
                        verb = current.method().verb(),
                        code = err.code,
                        message = %err.message,
                        "request failed",
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Execute the endpoint, discarding the response body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`fetch_bytes`](Self::fetch_bytes).
    pub async fn send(&self, endpoint: Endpoint) -> Result<()> {
        self.fetch_bytes(endpoint).await?;
        Ok(())
    }

    /// Execute the endpoint and decode the response body as JSON under the
    /// endpoint's date-decoding policy.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`fetch_bytes`](Self::fetch_bytes), plus a
    /// client-side error (code -1, path-qualified message, no raw body) when
    /// the body does not parse as `R`.
    pub async fn send_decoded<R: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
    ) -> Result<R> {
        let url = endpoint.url().clone();
        let verb = endpoint.method().verb();
        let dates = endpoint.date_decoding();

        let bytes = self.fetch_bytes(endpoint).await?;
        from_json_with(&bytes, dates).map_err(|err| {
            warn!(
                url = %url,
                verb,
                code = err.code,
                message = %err.message,
                "response decoding failed",
            );
            err
        })
    }

    /// Convenience: GET the target with a default endpoint and decode the
    /// result.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`send_decoded`](Self::send_decoded).
    pub async fn get<R: serde::de::DeserializeOwned>(&self, url: Url) -> Result<R> {
        self.send_decoded(Endpoint::get(url)).await
    }

    /// One attempt: resolve headers, execute on the wire, classify.
    async fn attempt(&self, endpoint: &Endpoint) -> Result<Disposition> {
        let headers = self.resolve_headers(endpoint).await?;
        let request = build_request(endpoint, headers);

        let response = self.transport.execute(request).await.map_err(|err| {
            warn!(
                url = %endpoint.url(),
                verb = endpoint.method().verb(),
                error = %err,
                "transport failure",
            );
            ApiError::from(err)
        })?;

        Ok(Disposition::classify(response, endpoint.header_mode()))
    }

    async fn resolve_headers(&self, endpoint: &Endpoint) -> Result<Headers> {
        match endpoint.header_mode() {
            HeaderMode::Provider => self.provider.current_headers().await.map_err(|err| {
                warn!(
                    url = %endpoint.url(),
                    verb = endpoint.method().verb(),
                    error = %err,
                    "header provider failure",
                );
                ApiError::client(format!("header provider failure: {err}"))
            }),
            HeaderMode::Refreshed(headers) | HeaderMode::Explicit(headers) => Ok(headers.clone()),
        }
    }

    async fn refresh_headers(&self, endpoint: &Endpoint) -> Result<Headers> {
        self.provider.refreshed_headers().await.map_err(|err| {
            warn!(
                url = %endpoint.url(),
                verb = endpoint.method().verb(),
                error = %err,
                "header refresh failure",
            );
            ApiError::client(format!("header refresh failure: {err}"))
        })
    }
}

fn build_request(endpoint: &Endpoint, headers: Headers) -> Request {
    let has_content_type = headers.contains_key("Content-Type");
    let mut builder = Request::builder(endpoint.method().into(), endpoint.url().clone())
        .headers(headers)
        .timeout(endpoint.timeout());

    if let Some(body) = endpoint.method().encoded_body() {
        if !has_content_type {
            builder = builder.header("Content-Type", "application/json");
        }
        builder = builder.body(body.clone());
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use courier_core::Method;

    use super::*;

    fn response(status: u16, body: &'static [u8]) -> Response {
        Response::new(status, Headers::new(), Bytes::from_static(body))
    }

    fn refreshed_mode() -> HeaderMode {
        HeaderMode::Refreshed(Headers::new())
    }

    #[test]
    fn success_returns_body_unmodified() {
        let disposition = Disposition::classify(response(200, b"payload"), &HeaderMode::Provider);
        assert!(matches!(
            disposition,
            Disposition::Success(body) if body.as_ref() == b"payload"
        ));
    }

    #[test]
    fn provider_mode_401_is_retry_eligible() {
        // Even when the body would decode as a structured error: the retry
        // check comes before any payload decoding.
        let disposition = Disposition::classify(
            response(401, br#"{"code":9,"description":"expired"}"#),
            &HeaderMode::Provider,
        );
        assert!(matches!(disposition, Disposition::RetryWithFreshHeaders));
    }

    #[test]
    fn refreshed_mode_401_is_a_failure() {
        let disposition = Disposition::classify(response(401, b"denied"), &refreshed_mode());
        assert!(matches!(disposition, Disposition::Failure(401, _)));
    }

    #[test]
    fn explicit_mode_401_is_a_failure() {
        let mode = HeaderMode::Explicit(Headers::new());
        let disposition = Disposition::classify(response(401, b""), &mode);
        assert!(matches!(disposition, Disposition::Failure(401, _)));
    }

    #[test]
    fn other_statuses_are_failures() {
        let disposition = Disposition::classify(response(500, b"boom"), &HeaderMode::Provider);
        assert!(matches!(
            disposition,
            Disposition::Failure(500, body) if body.as_ref() == b"boom"
        ));
    }

    #[test]
    fn build_request_sets_json_content_type_for_bodies() {
        let url: Url = "https://api.example.com/users".parse().expect("valid URL");
        let method = Method::post(Some(&serde_json::json!({"name": "a"}))).expect("encode");
        let endpoint = Endpoint::builder(url, method).build();

        let request = build_request(&endpoint, Headers::new());
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert!(request.body().is_some());
    }

    #[test]
    fn build_request_keeps_caller_content_type() {
        let url: Url = "https://api.example.com/users".parse().expect("valid URL");
        let method = Method::post(Some(&serde_json::json!({}))).expect("encode");
        let endpoint = Endpoint::builder(url, method).build();

        let headers = Headers::from([(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )]);
        let request = build_request(&endpoint, headers);
        assert_eq!(
            request.header("Content-Type"),
            Some("application/json; charset=utf-8")
        );
    }

    #[test]
    fn build_request_for_get_has_no_body() {
        let url: Url = "https://api.example.com/users".parse().expect("valid URL");
        let request = build_request(&Endpoint::get(url), Headers::new());
        assert!(request.body().is_none());
        assert!(request.header("Content-Type").is_none());
    }
}
