//! Request descriptors.
//!
//! An [`Endpoint`] is an immutable description of one intended HTTP call:
//! target URL, verb (with its payload), per-attempt timeout, date-decoding
//! policy, and the header-resolution mode driving the refresh-retry protocol.
//!
//! # Example
//!
//! ```
//! use courier_core::{Endpoint, Method};
//! use std::time::Duration;
//!
//! let url: url::Url = "https://api.example.com/users/1".parse().unwrap();
//! let endpoint = Endpoint::builder(url, Method::Get)
//!     .timeout(Duration::from_secs(5))
//!     .build();
//! ```

use std::time::Duration;

use url::Url;

use crate::{DateDecoding, Headers, Method};

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Header-resolution mode of an [`Endpoint`].
///
/// This is the small state machine bounding the refresh-retry protocol: the
/// only transitions are `Provider -> Refreshed` (taken internally by the
/// client, once) and `Provider -> Explicit` (taken by the caller at
/// construction). The modes that disable refresh embed their header map in
/// the variant, so "already refreshed but no headers attached" cannot be
/// represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMode {
    /// Resolve headers via [`crate::HeaderProvider::current_headers`]; a 401
    /// response is retry-eligible.
    Provider,
    /// Retry attempt carrying freshly renewed headers; refresh-retry
    /// disabled.
    Refreshed(Headers),
    /// Caller-supplied fixed header map; refresh-retry disabled.
    Explicit(Headers),
}

impl HeaderMode {
    /// Whether a 401 response in this mode may trigger a refresh-retry.
    #[must_use]
    pub const fn allows_refresh(&self) -> bool {
        matches!(self, Self::Provider)
    }
}

/// Immutable description of one intended HTTP call.
#[derive(Debug, Clone)]
pub struct Endpoint {
    url: Url,
    method: Method,
    timeout: Duration,
    date_decoding: DateDecoding,
    header_mode: HeaderMode,
}

impl Endpoint {
    /// Creates a new [`EndpointBuilder`].
    #[must_use]
    pub fn builder(url: Url, method: Method) -> EndpointBuilder {
        EndpointBuilder::new(url, method)
    }

    /// A default GET endpoint for the given target.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::builder(url, Method::Get).build()
    }

    /// Target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// HTTP method, with its payload for mutating verbs.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Date-decoding policy for typed results.
    #[must_use]
    pub const fn date_decoding(&self) -> DateDecoding {
        self.date_decoding
    }

    /// Header-resolution mode.
    #[must_use]
    pub const fn header_mode(&self) -> &HeaderMode {
        &self.header_mode
    }

    /// Derive the single retry attempt carrying renewed headers.
    ///
    /// The result is identical to `self` except its mode is
    /// [`HeaderMode::Refreshed`], which makes a second refresh-retry
    /// unrepresentable.
    #[must_use]
    pub fn refreshed(&self, headers: Headers) -> Self {
        Self {
            header_mode: HeaderMode::Refreshed(headers),
            ..self.clone()
        }
    }
}

/// Builder for [`Endpoint`] values.
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    url: Url,
    method: Method,
    timeout: Duration,
    date_decoding: DateDecoding,
    header_mode: HeaderMode,
}

impl EndpointBuilder {
    /// Creates a builder with the default timeout, date policy, and
    /// provider-resolved headers.
    #[must_use]
    pub fn new(url: Url, method: Method) -> Self {
        Self {
            url,
            method,
            timeout: DEFAULT_TIMEOUT,
            date_decoding: DateDecoding::default(),
            header_mode: HeaderMode::Provider,
        }
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the date-decoding policy.
    #[must_use]
    pub const fn date_decoding(mut self, policy: DateDecoding) -> Self {
        self.date_decoding = policy;
        self
    }

    /// Uses a fixed header map instead of the provider, disabling the
    /// refresh-retry for this call.
    #[must_use]
    pub fn explicit_headers(mut self, headers: Headers) -> Self {
        self.header_mode = HeaderMode::Explicit(headers);
        self
    }

    /// Builds the [`Endpoint`].
    #[must_use]
    pub fn build(self) -> Endpoint {
        Endpoint {
            url: self.url,
            method: self.method,
            timeout: self.timeout,
            date_decoding: self.date_decoding,
            header_mode: self.header_mode,
        }
    }
}
