//! Error types for courier.
//!
//! Every failure mode of the pipeline - transport errors, non-2xx responses,
//! malformed error payloads, decoding failures - is normalized into the single
//! [`ApiError`] shape before it reaches a caller.

use std::collections::HashMap;

use bytes::Bytes;
use derive_more::{Display, Error};

// ============================================================================
// Structured Error
// ============================================================================

/// Wire format for server-declared errors.
///
/// Any non-2xx body is attempted against this shape before falling back to
/// status synthesis.
#[derive(Debug, serde::Deserialize)]
struct ErrorPayload {
    code: i64,
    description: String,
    info: Option<HashMap<String, String>>,
}

/// The single normalized error shape produced by this crate.
///
/// `code` is the server-domain code when decoded from a payload, the HTTP
/// status code when synthesized from an undecodable response, and
/// [`ApiError::CLIENT_FAILURE`] for client-side and transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("api error {code}: {message}")]
pub struct ApiError {
    /// Numeric error code.
    pub code: i64,
    /// Human-readable description.
    pub message: String,
    /// Additional structured context, verbatim from the payload when present.
    pub info: Option<HashMap<String, String>>,
    /// Original response body, attached only when the body could not be
    /// parsed as a structured error payload.
    pub raw_body: Option<Bytes>,
}

impl ApiError {
    /// Sentinel code for client-side and transport failures.
    pub const CLIENT_FAILURE: i64 = -1;

    /// Create a client-side error (code [`Self::CLIENT_FAILURE`], no body).
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self {
            code: Self::CLIENT_FAILURE,
            message: message.into(),
            info: None,
            raw_body: None,
        }
    }

    /// Classify a non-2xx response into an error.
    ///
    /// The body is first attempted against the structured error wire format
    /// (`code`, `description`, optional `info`); a conforming payload is
    /// taken verbatim and carries no raw body. Otherwise the error is
    /// synthesized from the HTTP status, with the message taken from the body
    /// text (or the status's canonical reason when the body is not usable
    /// text) and the original bytes attached for caller inspection.
    #[must_use]
    pub fn from_response(status: u16, body: Bytes) -> Self {
        if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(&body) {
            return Self {
                code: payload.code,
                message: payload.description,
                info: payload.info,
                raw_body: None,
            };
        }

        let message = std::str::from_utf8(&body)
            .ok()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map_or_else(|| canonical_reason(status), str::to_owned);

        Self {
            code: i64::from(status),
            message,
            info: None,
            raw_body: Some(body),
        }
    }

    /// Returns `true` if this is a client-side or transport failure.
    #[must_use]
    pub const fn is_client_failure(&self) -> bool {
        self.code == Self::CLIENT_FAILURE
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        Self::client(err.to_string())
    }
}

fn canonical_reason(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("unexpected status")
        .to_owned()
}

/// Result type alias using [`ApiError`].
pub type Result<T> = std::result::Result<T, ApiError>;

/// Boxed error type used at capability boundaries such as [`crate::HeaderProvider`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ============================================================================
// Transport seam
// ============================================================================

/// Errors at the transport seam.
///
/// These never escape the client un-normalized; the orchestrator maps each of
/// them to an [`ApiError`] with code [`ApiError::CLIENT_FAILURE`].
#[derive(Debug, Display, Error)]
pub enum TransportError {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    Tls(#[error(not(source))] String),

    /// Per-attempt request timeout.
    #[display("request timeout")]
    Timeout,

    /// The request could not be constructed for the wire.
    #[display("invalid request: {_0}")]
    InvalidRequest(#[error(not(source))] String),

    /// The transport returned something other than a proper HTTP response.
    #[display("invalid server response: {_0}")]
    InvalidResponse(#[error(not(source))] String),
}

impl TransportError {
    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
