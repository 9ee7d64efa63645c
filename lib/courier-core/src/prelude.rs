//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    ApiError, DateDecoding, Endpoint, EndpointBuilder, HeaderMode, HeaderProvider, Headers, Method,
    Request, RequestBuilder, Response, Result, Transport, TransportError, from_json,
    from_json_with, to_json,
};
