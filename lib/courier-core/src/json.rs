//! JSON encode/decode helpers.

use bytes::Bytes;

use crate::{ApiError, DateDecoding, Result, datetime};

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns a client-side [`ApiError`] if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|err| ApiError::client(format!("body serialization failed: {err}")))
}

/// Deserialize JSON bytes with the default date-decoding policy.
///
/// # Errors
///
/// Returns a client-side [`ApiError`] with a path-qualified message if
/// deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    from_json_with(bytes, DateDecoding::default())
}

/// Deserialize JSON bytes under the given date-decoding policy.
///
/// The policy is applied to every field annotated with the
/// [`crate::datetime`] serde adapter.
///
/// # Errors
///
/// Returns a client-side [`ApiError`] with a path-qualified message if
/// deserialization fails. The error never carries a raw body: the response
/// did arrive as bytes, it just did not parse as the requested type.
pub fn from_json_with<T: serde::de::DeserializeOwned>(
    bytes: &[u8],
    dates: DateDecoding,
) -> Result<T> {
    datetime::with_policy(dates, || {
        let mut deserializer = serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
            ApiError::client(format!(
                "decode failed at '{path}': {inner}",
                path = err.path(),
                inner = err.inner()
            ))
        })
    })
}
