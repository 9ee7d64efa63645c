//! Authorized HTTP client for Rust.
//!
//! courier executes declaratively described requests with pluggable
//! authorization headers and a bounded refresh-retry protocol: a 401 on a
//! provider-resolved call triggers exactly one header refresh and one
//! re-attempt, and every failure mode is normalized into a single
//! [`ApiError`] shape.
//!
//! # Example
//!
//! ```ignore
//! use courier::prelude::*;
//! use courier::providers::CachedProvider;
//!
//! #[derive(Debug, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! let client = ApiClient::new(CachedProvider::new(token_source));
//! let user: User = client.get("https://api.example.com/users/1".parse()?).await?;
//! ```

mod api_client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
pub mod providers;
mod transport;

// Re-export client types
pub use api_client::ApiClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use transport::{BoxedTransport, HyperTransport, HyperTransportBuilder, TransportFuture};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use courier_core::{
    ApiError, BoxError, DateDecoding, Endpoint, EndpointBuilder, HeaderMode, HeaderProvider,
    Headers, Method, Request, RequestBuilder, Response, Result, Transport, TransportError,
    datetime, from_json, from_json_with, to_json,
};

// Re-export http types for status codes and headers
pub use courier_core::{StatusCode, header};

// Re-export url for endpoint construction
pub use url;
