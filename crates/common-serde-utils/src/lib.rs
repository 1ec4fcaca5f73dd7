//! Serde helpers shared by the configuration types of the workspace.

use core::time::Duration;

use serde::{Deserialize as _, Deserializer, Serializer};

/// Decode a [`Duration`] from an integer amount of milliseconds.
///
/// # Errors
///
/// If the value is not an unsigned integer.
pub fn duration_ms_decode<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}

/// Encode a [`Duration`] as an integer amount of milliseconds.
///
/// Durations longer than `u64::MAX` milliseconds are saturated.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn duration_ms_encode<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(millis)
}
