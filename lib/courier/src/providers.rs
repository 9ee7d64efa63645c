//! Reference [`HeaderProvider`] implementations.
//!
//! The client consumes the provider contract; these two implementations cover
//! the common cases. Anything token-shaped goes through [`CachedProvider`]
//! with a [`HeaderSource`] that performs the renewal call; fixed API-key
//! style auth uses [`StaticHeaders`].

use std::future::Future;

use courier_core::{BoxError, HeaderProvider, Headers};
use tokio::sync::Mutex;

/// A fixed header map.
///
/// `refreshed_headers` returns the same map: there is no renewal side effect
/// to serialize. Useful for API-key auth and as a test fake.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: Headers,
}

impl StaticHeaders {
    /// Create a provider serving the given headers.
    #[must_use]
    pub fn new(headers: Headers) -> Self {
        Self { headers }
    }
}

impl HeaderProvider for StaticHeaders {
    async fn current_headers(&self) -> Result<Headers, BoxError> {
        Ok(self.headers.clone())
    }

    async fn refreshed_headers(&self) -> Result<Headers, BoxError> {
        Ok(self.headers.clone())
    }
}

/// Source of freshly computed headers, e.g. a token renewal call.
pub trait HeaderSource: Send + Sync {
    /// Compute a fresh header map.
    ///
    /// # Errors
    ///
    /// Returns a source-defined error if the headers cannot be produced.
    fn fetch_headers(&self) -> impl Future<Output = Result<Headers, BoxError>> + Send;
}

/// Caching provider over a [`HeaderSource`].
///
/// `current_headers` serves the cached map, fetching once on first use;
/// `refreshed_headers` always fetches and replaces the cache.
///
/// Concurrency policy: the cache mutex is held across the fetch, so
/// concurrent refreshes are serialized - a second caller waits for the first
/// renewal to complete and then redundantly renews again. Callers observing
/// `current_headers` after a successful refresh always see the renewed map.
#[derive(Debug)]
pub struct CachedProvider<S> {
    source: S,
    cache: Mutex<Option<Headers>>,
}

impl<S: HeaderSource> CachedProvider<S> {
    /// Create a provider with an empty cache.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }
}

impl<S: HeaderSource> HeaderProvider for CachedProvider<S> {
    async fn current_headers(&self) -> Result<Headers, BoxError> {
        let mut cache = self.cache.lock().await;
        if let Some(headers) = cache.as_ref() {
            return Ok(headers.clone());
        }

        let headers = self.source.fetch_headers().await?;
        *cache = Some(headers.clone());
        Ok(headers)
    }

    async fn refreshed_headers(&self) -> Result<Headers, BoxError> {
        // Held across the fetch: refreshes are serialized, and the renewed
        // map is visible to any concurrent current_headers call.
        let mut cache = self.cache.lock().await;
        let headers = self.source.fetch_headers().await?;
        *cache = Some(headers.clone());
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSource {
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl HeaderSource for &CountingSource {
        async fn fetch_headers(&self) -> Result<Headers, BoxError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Headers::from([(
                "Authorization".to_string(),
                format!("Bearer token-{n}"),
            )]))
        }
    }

    #[tokio::test]
    async fn static_headers_never_change() {
        let headers = Headers::from([("X-Api-Key".to_string(), "k".to_string())]);
        let provider = StaticHeaders::new(headers.clone());

        assert_eq!(provider.current_headers().await.expect("current"), headers);
        assert_eq!(
            provider.refreshed_headers().await.expect("refreshed"),
            headers
        );
        assert_eq!(provider.current_headers().await.expect("current"), headers);
    }

    #[tokio::test]
    async fn current_headers_fetches_once_and_caches() {
        let source = CountingSource::new();
        let provider = CachedProvider::new(&source);

        let first = provider.current_headers().await.expect("current");
        let second = provider.current_headers().await.expect("current");

        assert_eq!(first, second);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn refresh_replaces_the_cache() {
        let source = CountingSource::new();
        let provider = CachedProvider::new(&source);

        let stale = provider.current_headers().await.expect("current");
        let fresh = provider.refreshed_headers().await.expect("refreshed");
        let observed = provider.current_headers().await.expect("current");

        assert_ne!(stale, fresh);
        assert_eq!(observed, fresh);
        assert_eq!(source.fetch_count(), 2);
    }
}
