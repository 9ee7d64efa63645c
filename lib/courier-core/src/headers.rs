//! The headers-provider capability boundary.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::BoxError;

/// Header map currency of the whole crate: provider results, explicit maps,
/// and transport request headers.
pub type Headers = HashMap<String, String>;

/// Capability supplying current/refreshed authorization headers.
///
/// The client consumes this contract but never implements it; token storage,
/// renewal calls, and caching live behind it.
///
/// Implementations must serialize the renewal side effect of
/// [`refreshed_headers`](Self::refreshed_headers): two concurrent refreshes
/// must not race over shared credential state, whether by coalescing into one
/// in-flight renewal or by running the second only after the first completes.
/// After a successful refresh, any subsequent
/// [`current_headers`](Self::current_headers) call observes the renewed
/// values.
pub trait HeaderProvider: Send + Sync {
    /// Current headers, possibly served from a cache.
    ///
    /// # Errors
    ///
    /// Returns a provider-defined error if the headers cannot be produced.
    fn current_headers(&self) -> impl Future<Output = Result<Headers, BoxError>> + Send;

    /// Force a renewal and return the new headers atomically with it.
    ///
    /// # Errors
    ///
    /// Returns a provider-defined error if the renewal fails.
    fn refreshed_headers(&self) -> impl Future<Output = Result<Headers, BoxError>> + Send;
}

impl<P: HeaderProvider> HeaderProvider for Arc<P> {
    fn current_headers(&self) -> impl Future<Output = Result<Headers, BoxError>> + Send {
        (**self).current_headers()
    }

    fn refreshed_headers(&self) -> impl Future<Output = Result<Headers, BoxError>> + Send {
        (**self).refreshed_headers()
    }
}
