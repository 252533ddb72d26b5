//! Monotonic, time-sortable identifiers in a 32-symbol base32 text form
//!
//! ```rust
//! # #[cfg(feature = "global_gen")]
//! # {
//! use monoulid::{ulid, ulid64};
//!
//! let id = ulid();
//! println!("{}", id); // e.g. "01HF7YBV2C5K8Q0RWS3T9MZJXA"
//! println!("{}", id.prettify()); // random digits first, timestamp digits last
//!
//! let small = ulid64();
//! println!("{}", small); // e.g. "01HF7YBV2C0KQ"
//! # }
//! ```
//!
//! # Field and bit layout
//!
//! [`Ulid`] is a 128-bit value built from a 48-bit Unix timestamp in milliseconds and an 80-bit
//! random field:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |            random             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            random                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            random                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! [`Ulid64`] packs the same 48-bit timestamp with a 16-bit random field into a single `u64`:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |            random             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! The random field is drawn from a cryptographically strong source whenever the timestamp
//! changes and is incremented by one for each further identifier generated within the same
//! millisecond, so identifiers from one generator sort in creation order. The 80-bit field of
//! [`Ulid`] wraps around only after 2^80 identifiers in a millisecond; the 16-bit field of
//! [`Ulid64`] wraps around silently after 65,536 and breaks the order from that point on.
//!
//! # Text forms
//!
//! Both kinds encode to fixed-width strings over the alphabet
//! `0123456789ABCDEFGHJKMNPQRSTVWXYZ` (no `I`, `L`, `O` or `U`):
//!
//! - [`Ulid::encode`] produces 26 digits, timestamp first, so that the strings sort like the
//!   values. [`Ulid::prettify`] puts the 16 random digits before the 10 timestamp digits.
//! - [`Ulid64::encode`] produces 13 digits. [`Ulid64::lexic`] moves the top 4 digits behind the
//!   low 9.
//!
//! Decoders read exactly the required number of characters and ignore the rest of the input.
//! Lowercase letters are rejected.
//!
//! ```rust
//! use monoulid::{ParseError, Ulid};
//!
//! let id: Ulid = "014D2PF2DBZVEBN63PAGS11AYD".parse()?;
//! assert_eq!(id.timestamp(), 0x0123_4567_89ab);
//! assert_eq!(Ulid::parse_prettified(&id.prettify())?, id);
//!
//! assert_eq!("0000".parse::<Ulid>(), Err(ParseError::TooShort { expected: 26, found: 4 }));
//! # Ok::<(), ParseError>(())
//! ```
//!
//! # Crate features
//!
//! Default features:
//!
//! - `global_gen`: enables the process-wide default generators behind [`ulid()`] and
//!   [`ulid64()`] and the per-thread random number generator [`ThreadRandSource`]. Implies
//!   `std`.
//!
//! Optional features:
//!
//! - `std`: enables the generator types, [`std::time::SystemTime`] extraction and `String`
//!   conversions. Without it the crate is `no_std` and offers the value types and the codec only.
//! - `serde`: enables serialization and deserialization of both identifier kinds.
//! - `uuid`: enables conversion between [`Ulid`] and `uuid::Uuid`.
//! - `chrono`: enables extraction of the timestamp as `chrono::DateTime<Utc>`.
//! - `tracing`: emits diagnostic events through the `tracing` facade.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug_event {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug_event {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! warn_event {
    ($($arg:tt)*) => { ::tracing::warn!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! warn_event {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use {debug_event, warn_event};

mod base32;
pub use base32::ParseError;

mod ulid;
pub use ulid::Ulid;

mod ulid64;
pub use ulid64::Ulid64;

pub mod timestamp;
#[cfg(feature = "std")]
pub use timestamp::StdSystemTime;
pub use timestamp::TimeSource;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod generator;
#[cfg(feature = "global_gen")]
pub use generator::ThreadRandSource;
#[cfg(feature = "std")]
pub use generator::{RandSource, Ulid64Generator, UlidGenerator};

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{ulid, ulid64};
