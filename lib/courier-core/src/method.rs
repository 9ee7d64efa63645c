//! HTTP method types with their request payloads.

use bytes::Bytes;
use derive_more::Display;

use crate::Result;

/// HTTP request method, carrying the encoded body for mutating verbs.
///
/// The set of verbs is closed: exactly these five. Adding a verb is a
/// breaking change to the data model.
///
/// Payloads are serialized to JSON at construction time; a value that fails
/// to serialize fails the constructor rather than silently producing an
/// empty body.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Method {
    /// GET method - retrieve a resource. Never carries a body.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post(Option<Bytes>),
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put(Option<Bytes>),
    /// PATCH method - partially update a resource.
    #[display("PATCH")]
    Patch(Option<Bytes>),
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete(Option<Bytes>),
}

impl Method {
    /// Create a POST method with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to serialize.
    pub fn post<T: serde::Serialize>(payload: Option<&T>) -> Result<Self> {
        Ok(Self::Post(encode(payload)?))
    }

    /// Create a PUT method with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to serialize.
    pub fn put<T: serde::Serialize>(payload: Option<&T>) -> Result<Self> {
        Ok(Self::Put(encode(payload)?))
    }

    /// Create a PATCH method with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to serialize.
    pub fn patch<T: serde::Serialize>(payload: Option<&T>) -> Result<Self> {
        Ok(Self::Patch(encode(payload)?))
    }

    /// Create a DELETE method with an optional JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload fails to serialize.
    pub fn delete<T: serde::Serialize>(payload: Option<&T>) -> Result<Self> {
        Ok(Self::Delete(encode(payload)?))
    }

    /// The wire-level verb token.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post(_) => "POST",
            Self::Put(_) => "PUT",
            Self::Patch(_) => "PATCH",
            Self::Delete(_) => "DELETE",
        }
    }

    /// The encoded request body, if any.
    ///
    /// GET is defined to return `None` unconditionally.
    #[must_use]
    pub const fn encoded_body(&self) -> Option<&Bytes> {
        match self {
            Self::Get => None,
            Self::Post(body) | Self::Put(body) | Self::Patch(body) | Self::Delete(body) => {
                body.as_ref()
            }
        }
    }
}

fn encode<T: serde::Serialize>(payload: Option<&T>) -> Result<Option<Bytes>> {
    payload.map(crate::to_json).transpose()
}

impl From<&Method> for http::Method {
    fn from(method: &Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post(_) => Self::POST,
            Method::Put(_) => Self::PUT,
            Method::Patch(_) => Self::PATCH,
            Method::Delete(_) => Self::DELETE,
        }
    }
}
