//! Core types and traits for the courier authorized HTTP client.
//!
//! This crate provides the protocol vocabulary used by courier:
//! - [`Endpoint`] and [`EndpointBuilder`] - declarative request descriptors
//! - [`Method`] - the closed five-verb method/body model
//! - [`HeaderMode`] - header-resolution state for the refresh-retry protocol
//! - [`HeaderProvider`] - capability supplying current/refreshed auth headers
//! - [`ApiError`] and [`Result`] - the single normalized error shape
//! - [`Transport`], [`Request`], [`Response`] - the transport seam
//! - [`DateDecoding`] and [`datetime`] - response date-decoding policies
//!
//! No I/O happens here; the runnable transport and the orchestrating client
//! live in the `courier` crate.

pub mod datetime;
mod endpoint;
mod error;
mod headers;
mod json;
mod method;
pub mod prelude;
mod transport;

pub use datetime::DateDecoding;
pub use endpoint::{DEFAULT_TIMEOUT, Endpoint, EndpointBuilder, HeaderMode};
pub use error::{ApiError, BoxError, Result, TransportError};
pub use headers::{HeaderProvider, Headers};
pub use json::{from_json, from_json_with, to_json};
pub use method::Method;
pub use transport::{Request, RequestBuilder, Response, Transport};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
