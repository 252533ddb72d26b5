#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use fstr::FStr;

use crate::base32::{self, ParseError};

/// Maximum value of the 48-bit timestamp field.
pub(crate) const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// Maximum value of the 80-bit random field.
pub(crate) const MAX_RANDOM: u128 = (1 << 80) - 1;

/// Number of characters in the string representations.
const ENCODED_LEN: usize = 26;

/// Number of characters the random field occupies at the head of the prettified form.
const PRETTY_RANDOM_LEN: usize = 16;

/// Represents a 128-bit identifier made of a 48-bit Unix timestamp in milliseconds and an 80-bit
/// random field.
///
/// The value is held as two 64-bit words. The high word carries the timestamp in its upper 48
/// bits and the top 16 bits of the random field in its lower 16 bits; the low word carries the
/// remaining 64 random bits. Ordering follows the full 128-bit numeric value, which coincides
/// with the lexicographic order of the canonical string.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Ulid {
    hi: u64,
    lo: u64,
}

impl Ulid {
    /// The all-zero identifier (`00000000000000000000000000`).
    pub const NIL: Self = Self { hi: 0, lo: 0 };

    /// The all-one identifier (`7ZZZZZZZZZZZZZZZZZZZZZZZZZ`).
    pub const MAX: Self = Self {
        hi: u64::MAX,
        lo: u64::MAX,
    };

    /// Creates an identifier from its high and low words.
    pub const fn from_words(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Creates an identifier from field values.
    ///
    /// Bits above the 48-bit `timestamp` and the 80-bit `random` ranges are ignored.
    pub const fn from_fields(timestamp: u64, random: u128) -> Self {
        let timestamp = timestamp & MAX_TIMESTAMP;
        let random = random & MAX_RANDOM;
        Self {
            hi: (timestamp << 16) | (random >> 64) as u64,
            lo: random as u64,
        }
    }

    /// Returns the 48-bit Unix timestamp in milliseconds.
    pub const fn timestamp(&self) -> u64 {
        self.hi >> 16
    }

    /// Returns the 80-bit random field.
    pub const fn random(&self) -> u128 {
        (((self.hi & 0xffff) as u128) << 64) | self.lo as u128
    }

    /// Returns the high word: timestamp and the top 16 random bits.
    pub const fn high_word(&self) -> u64 {
        self.hi
    }

    /// Returns the low word: the bottom 64 random bits.
    pub const fn low_word(&self) -> u64 {
        self.lo
    }

    /// Returns the 128-bit unsigned integer representation.
    pub const fn to_u128(&self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    /// Creates an identifier from a 128-bit unsigned integer.
    pub const fn from_u128(value: u128) -> Self {
        Self {
            hi: (value >> 64) as u64,
            lo: value as u64,
        }
    }

    /// Returns the 16-byte representation: the low word followed by the high word, each in
    /// little-endian byte order.
    ///
    /// The layout does not depend on the host and is not the big-endian network order; it matches
    /// the in-memory image of the two words on little-endian machines, which is how previously
    /// stored values were produced.
    pub const fn to_bytes(&self) -> [u8; 16] {
        let lo = self.lo.to_le_bytes();
        let hi = self.hi.to_le_bytes();
        let mut dst = [0u8; 16];
        let mut i = 0;
        while i < 8 {
            dst[i] = lo[i];
            dst[i + 8] = hi[i];
            i += 1;
        }
        dst
    }

    /// Creates an identifier from the 16-byte representation produced by [`Ulid::to_bytes()`].
    pub const fn from_bytes(src: [u8; 16]) -> Self {
        Self {
            lo: u64::from_le_bytes([
                src[0], src[1], src[2], src[3], src[4], src[5], src[6], src[7],
            ]),
            hi: u64::from_le_bytes([
                src[8], src[9], src[10], src[11], src[12], src[13], src[14], src[15],
            ]),
        }
    }

    /// Creates an identifier from the first 16 bytes of `src`, or returns `None` if `src` is
    /// shorter than that.
    pub fn from_slice(src: &[u8]) -> Option<Self> {
        let bytes = src.get(..16)?;
        <[u8; 16]>::try_from(bytes).ok().map(Self::from_bytes)
    }

    /// Returns the 26-digit canonical string representation stored in a stack-allocated structure.
    ///
    /// The timestamp comes first, so that the strings sort in the same order as the values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Ulid;
    ///
    /// let x = Ulid::from_fields(0x0123_4567_89ab, 0xfedc_ba98_7654_3210_abcd);
    /// assert_eq!(&x.encode() as &str, "014D2PF2DBZVEBN63PAGS11AYD");
    /// ```
    pub fn encode(&self) -> FStr<ENCODED_LEN> {
        let mut buffer = [0u8; ENCODED_LEN];
        base32::encode_digits(self.to_u128(), &mut buffer);
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the 26-digit string representation with the 16 random digits first, followed by
    /// the 10 timestamp digits.
    ///
    /// Unlike [`Ulid::encode()`], these strings do not sort by creation time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Ulid;
    ///
    /// let x = Ulid::from_fields(0x0123_4567_89ab, 0xfedc_ba98_7654_3210_abcd);
    /// assert_eq!(&x.prettify() as &str, "ZVEBN63PAGS11AYD014D2PF2DB");
    /// assert_eq!(Ulid::parse_prettified("ZVEBN63PAGS11AYD014D2PF2DB"), Ok(x));
    /// ```
    pub fn prettify(&self) -> FStr<ENCODED_LEN> {
        let mut buffer = [0u8; ENCODED_LEN];
        let (random, timestamp) = buffer.split_at_mut(PRETTY_RANDOM_LEN);
        let rest = base32::encode_digits(self.to_u128(), random);
        base32::encode_digits(rest, timestamp);
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Parses the canonical string representation.
    ///
    /// Only the first 26 characters are read; anything after them is ignored. The two bits a
    /// 26-digit string can hold above 128 bits are discarded, so a leading digit above `7` does
    /// not round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidChar`] if one of the first 26 characters is not a base32 digit
    /// and [`ParseError::TooShort`] if `src` has fewer than 26 characters.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        base32::decode_segments(src, [(ENCODED_LEN, 0)]).map(Self::from_u128)
    }

    /// Parses the canonical string representation, returning `None` on failure.
    pub fn try_parse(src: &str) -> Option<Self> {
        Self::parse(src).ok()
    }

    /// Parses the string representation produced by [`Ulid::prettify()`].
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Ulid::parse()`].
    pub fn parse_prettified(src: &str) -> Result<Self, ParseError> {
        base32::decode_segments(
            src,
            [
                (PRETTY_RANDOM_LEN, 0),
                (ENCODED_LEN - PRETTY_RANDOM_LEN, 80),
            ],
        )
        .map(Self::from_u128)
    }

    /// Parses the prettified string representation, returning `None` on failure.
    pub fn try_parse_prettified(src: &str) -> Option<Self> {
        Self::parse_prettified(src).ok()
    }
}

impl fmt::Display for Ulid {
    /// Returns the 26-digit canonical string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ulid({})", self.encode())
    }
}

impl str::FromStr for Ulid {
    type Err = ParseError;

    /// Creates an object from the 26-digit canonical string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl TryFrom<&str> for Ulid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse(src)
    }
}

impl From<Ulid> for u128 {
    fn from(src: Ulid) -> Self {
        src.to_u128()
    }
}

impl From<u128> for Ulid {
    fn from(src: u128) -> Self {
        Self::from_u128(src)
    }
}

impl From<Ulid> for [u8; 16] {
    fn from(src: Ulid) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 16]> for Ulid {
    fn from(src: [u8; 16]) -> Self {
        Self::from_bytes(src)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{ParseError, Ulid};
    use std::time::SystemTime;

    impl Ulid {
        /// Returns the embedded timestamp as a [`SystemTime`].
        pub fn system_time(&self) -> SystemTime {
            crate::timestamp::to_system_time(self.timestamp())
        }
    }

    impl From<Ulid> for String {
        fn from(src: Ulid) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Ulid {
        type Error = ParseError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }
}

#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
mod chrono_support {
    use super::Ulid;
    use chrono::{DateTime, Utc};

    impl Ulid {
        /// Returns the embedded timestamp as a calendar date and time in UTC.
        pub fn datetime(&self) -> DateTime<Utc> {
            crate::timestamp::to_datetime(self.timestamp())
        }
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Ulid;

    /// Reinterprets the 16-byte representation as a GUID whose first three fields are stored in
    /// little-endian order.
    impl From<Ulid> for uuid::Uuid {
        fn from(src: Ulid) -> Self {
            uuid::Uuid::from_bytes_le(src.to_bytes())
        }
    }

    impl From<uuid::Uuid> for Ulid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from_bytes(src.to_bytes_le())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Ulid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Ulid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Ulid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Ulid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 26-digit base32 string or 16 bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::parse(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from_bytes)
                .map_err(de::Error::custom)
        }
    }

}
