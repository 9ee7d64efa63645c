//! Hyper-based transport implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use courier_core::{Headers, Request, Response, Transport, TransportError};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    config::{ClientConfig, ClientConfigBuilder},
    connector::https_connector,
    middleware::LoggingLayer,
};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased transport service for middleware composition.
///
/// This type allows storing and composing arbitrary Tower layers without
/// exposing complex generic types to users.
pub type BoxedTransport = BoxCloneService<Request, Response, TransportError>;

/// Future type for Tower Service implementation.
pub type TransportFuture =
    Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + 'static>>;

/// Thread-safe wrapper for [`BoxedTransport`].
///
/// The wrapper uses a Mutex to make the service Sync, which is required by
/// the [`Transport`] trait.
#[derive(Clone)]
struct SyncTransport {
    inner: Arc<Mutex<BoxedTransport>>,
}

impl SyncTransport {
    fn new(service: BoxedTransport) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> TransportFuture {
        // Lock, clone the service, and release the lock immediately
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

// ============================================================================
// Raw Transport (internal, direct hyper access)
// ============================================================================

/// Raw HTTP transport over hyper-util (internal implementation).
#[derive(Clone)]
struct RawHyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
}

impl RawHyperTransport {
    fn new(config: &ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner }
    }

    /// Build a hyper request from a wire-level request.
    fn build_hyper_request(
        request: Request,
    ) -> Result<(http::Request<Full<Bytes>>, Duration), TransportError> {
        let (method, url, headers, body, timeout) = request.into_parts();

        let mut builder = http::Request::builder().method(method).uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = body.map_or_else(Full::default, Full::new);
        let hyper_request = builder
            .body(body)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok((hyper_request, timeout))
    }

    /// Extract response headers as a [`Headers`] map.
    fn extract_headers(headers: &http::HeaderMap) -> Headers {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let (hyper_request, timeout) = Self::build_hyper_request(request)?;

        let response = tokio::time::timeout(timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| TransportError::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let response_headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::InvalidResponse(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, response_headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> TransportError {
        let msg = err.to_string();

        if err.is_connect() {
            return TransportError::Connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return TransportError::Tls(msg);
        }

        TransportError::Connection(msg)
    }
}

impl Service<Request> for RawHyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = TransportFuture;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), TransportError>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

// ============================================================================
// Public Transport
// ============================================================================

/// HTTP transport using hyper-util with connection pooling, rustls TLS, and
/// per-request timeouts.
///
/// # Example
///
/// ```ignore
/// use courier::HyperTransport;
///
/// // Stock transport
/// let transport = HyperTransport::new();
///
/// // Transport with a logging layer
/// let transport = HyperTransport::builder()
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    service: SyncTransport,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperTransport {
    /// Create a new transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new transport with custom configuration (no middleware).
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let raw = RawHyperTransport::new(&config);
        Self {
            service: SyncTransport::new(BoxCloneService::new(raw)),
            config,
        }
    }

    /// Create a transport with a pre-composed service (used by the builder).
    fn with_service(service: BoxedTransport, config: ClientConfig) -> Self {
        Self {
            service: SyncTransport::new(service),
            config,
        }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HyperTransportBuilder {
        HyperTransportBuilder::default()
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HyperTransport {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.service.call(request).await
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = TransportError;
    type Future = TransportFuture;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), TransportError>> {
        // SyncTransport is always ready (the underlying service is polled when called)
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperTransport`].
///
/// # Example
///
/// ```ignore
/// use courier::HyperTransport;
/// use std::time::Duration;
///
/// let transport = HyperTransport::builder()
///     .connect_timeout(Duration::from_secs(5))
///     .with_logging()
///     .build();
/// ```
#[derive(Default)]
pub struct HyperTransportBuilder {
    config: ClientConfigBuilder,
    layers: Vec<Arc<dyn Fn(BoxedTransport) -> BoxedTransport + Send + Sync>>,
}

impl std::fmt::Debug for HyperTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransportBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperTransportBuilder {
    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Add a Tower layer to the transport.
    ///
    /// Layers are applied in order: first added = outermost (processes
    /// requests first).
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedTransport> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = TransportError>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add request/response logging.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add debug-level logging (includes headers and more detail).
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the transport with all configured middleware.
    #[must_use]
    pub fn build(self) -> HyperTransport {
        let config = self.config.build();
        let raw = RawHyperTransport::new(&config);

        let mut service: BoxedTransport = BoxCloneService::new(raw);

        // Apply user layers in order (first added = outermost)
        for layer_fn in self.layers {
            service = layer_fn(service);
        }

        HyperTransport::with_service(service, config)
    }
}
