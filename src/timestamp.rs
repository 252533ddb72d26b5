//! Clock access and timestamp conversions.

/// A trait that defines the minimum system clock interface for the generators.
///
/// Implementations are shared between threads through `&self`.
pub trait TimeSource {
    /// Returns the current Unix timestamp in milliseconds.
    fn unix_ts_ms(&self) -> u64;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

#[cfg(feature = "std")]
impl TimeSource for StdSystemTime {
    /// Reads the wall clock, reporting `0` if it is set before the Unix epoch.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn unix_ts_ms(&self) -> u64 {
        use std::time;
        match time::SystemTime::now().duration_since(time::UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as u64,
            Err(err) => {
                crate::warn_event!(
                    behind_ms = err.duration().as_millis() as u64,
                    "system clock is set before the unix epoch"
                );
                0
            }
        }
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn unix_ts_ms(&self) -> u64 {
        (**self).unix_ts_ms()
    }
}

/// Converts a Unix timestamp in milliseconds into a [`std::time::SystemTime`].
#[cfg(feature = "std")]
pub(crate) fn to_system_time(unix_ts_ms: u64) -> std::time::SystemTime {
    std::time::UNIX_EPOCH + std::time::Duration::from_millis(unix_ts_ms)
}

/// Converts a 48-bit Unix timestamp in milliseconds into a UTC date and time.
#[cfg(feature = "chrono")]
pub(crate) fn to_datetime(unix_ts_ms: u64) -> chrono::DateTime<chrono::Utc> {
    // every 48-bit millisecond count lies within the chrono range
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(unix_ts_ms as i64)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC)
}
