//! Tower middleware layers for the courier transport.
//!
//! Layers are applied to the transport via
//! [`HyperTransportBuilder::layer`](crate::HyperTransportBuilder::layer).
//! They compose in order - the first layer added is the outermost and
//! processes requests first.
//!
//! # Example
//!
//! ```ignore
//! use courier::HyperTransport;
//! use courier::middleware::LoggingLayer;
//!
//! let transport = HyperTransport::builder()
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
