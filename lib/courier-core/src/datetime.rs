//! Response date-decoding policies and their serde adapter.
//!
//! Servers disagree on how timestamps appear in JSON; an [`crate::Endpoint`]
//! declares the policy for its responses and the decode path applies it to
//! every field annotated with this module:
//!
//! ```ignore
//! #[derive(Deserialize)]
//! struct Session {
//!     #[serde(with = "courier_core::datetime")]
//!     expires_at: DateTime<Utc>,
//! }
//! ```
//!
//! Outside a decode driven by [`crate::from_json_with`], the adapter uses the
//! default [`DateDecoding::Iso8601`] policy.

use std::cell::Cell;

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Policy for decoding date fields in typed responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateDecoding {
    /// ISO-8601 / RFC 3339 strings (the default).
    #[default]
    Iso8601,
    /// Integer seconds since the Unix epoch.
    EpochSeconds,
    /// Integer milliseconds since the Unix epoch.
    EpochMillis,
}

thread_local! {
    static ACTIVE: Cell<DateDecoding> = const { Cell::new(DateDecoding::Iso8601) };
}

/// Run `f` with `policy` as the active date-decoding policy.
///
/// The decode itself is synchronous, so scoping the policy to the calling
/// thread is sound even under an async runtime.
pub(crate) fn with_policy<R>(policy: DateDecoding, f: impl FnOnce() -> R) -> R {
    let previous = ACTIVE.replace(policy);
    let result = f();
    ACTIVE.set(previous);
    result
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Number(i64),
    Text(String),
}

/// Deserialize a `DateTime<Utc>` according to the active policy.
///
/// # Errors
///
/// Returns an error if the value does not match the active policy's shape or
/// does not denote a representable instant.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawDate::deserialize(deserializer)?;
    match (ACTIVE.get(), raw) {
        (DateDecoding::Iso8601, RawDate::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid ISO-8601 date: {err}"))),
        (DateDecoding::EpochSeconds, RawDate::Number(seconds)) => {
            DateTime::from_timestamp(seconds, 0)
                .ok_or_else(|| D::Error::custom("epoch seconds out of range"))
        }
        (DateDecoding::EpochMillis, RawDate::Number(millis)) => {
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| D::Error::custom("epoch milliseconds out of range"))
        }
        (policy, _) => Err(D::Error::custom(format!(
            "date value does not match the {policy:?} decoding policy"
        ))),
    }
}

/// Serialize a `DateTime<Utc>` according to the active policy.
///
/// # Errors
///
/// Returns an error if the serializer rejects the value.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ACTIVE.get() {
        DateDecoding::Iso8601 => serializer.serialize_str(&value.to_rfc3339()),
        DateDecoding::EpochSeconds => serializer.serialize_i64(value.timestamp()),
        DateDecoding::EpochMillis => serializer.serialize_i64(value.timestamp_millis()),
    }
}
