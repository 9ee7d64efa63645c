//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use courier::prelude::*;
//! ```

pub use crate::{
    ApiClient, ApiError, ClientConfig, DateDecoding, Endpoint, HeaderMode, HeaderProvider, Headers,
    HyperTransport, Method, Request, Response, Result, StatusCode, Transport, TransportError,
    header,
};
pub use serde::{Deserialize, Serialize};
