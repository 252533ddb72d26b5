#[cfg(not(feature = "std"))]
use core as std;

use std::{fmt, str};

use fstr::FStr;

use crate::base32::{self, ParseError};

/// Maximum value of the 48-bit timestamp field.
pub(crate) const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

/// Number of characters in the string representations.
const ENCODED_LEN: usize = 13;

/// Number of low-order digits placed at the head of the lexic form.
const LEXIC_LOW_LEN: usize = 9;

/// Represents a 64-bit identifier made of a 48-bit Unix timestamp in milliseconds and a 16-bit
/// random field.
///
/// The timestamp occupies the upper 48 bits, so the numeric order and the order of the canonical
/// string both follow creation time. Within a millisecond the 16-bit field is a counter that
/// wraps around silently once it passes `0xffff`; identifiers minted after such a wrap sort
/// before the ones minted earlier in the same millisecond.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Ulid64(u64);

impl Ulid64 {
    /// The all-zero identifier (`0000000000000`).
    pub const NIL: Self = Self(0);

    /// The all-one identifier (`FZZZZZZZZZZZZ`).
    pub const MAX: Self = Self(u64::MAX);

    /// Creates an identifier from field values, ignoring bits above the 48-bit `timestamp`
    /// range.
    pub const fn from_fields(timestamp: u64, random: u16) -> Self {
        Self(((timestamp & MAX_TIMESTAMP) << 16) | random as u64)
    }

    /// Returns the 48-bit Unix timestamp in milliseconds.
    pub const fn timestamp(&self) -> u64 {
        self.0 >> 16
    }

    /// Returns the 16-bit random field.
    pub const fn random(&self) -> u16 {
        self.0 as u16
    }

    /// Returns the 64-bit unsigned integer representation.
    pub const fn to_u64(&self) -> u64 {
        self.0
    }

    /// Creates an identifier from a 64-bit unsigned integer.
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Returns the 8-byte little-endian representation.
    pub const fn to_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Creates an identifier from the 8-byte little-endian representation.
    pub const fn from_bytes(src: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(src))
    }

    /// Creates an identifier from the first 8 bytes of `src`, or returns `None` if `src` is
    /// shorter than that.
    pub fn from_slice(src: &[u8]) -> Option<Self> {
        let bytes = src.get(..8)?;
        <[u8; 8]>::try_from(bytes).ok().map(Self::from_bytes)
    }

    /// Returns the 13-digit canonical string representation stored in a stack-allocated structure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Ulid64;
    ///
    /// let x = Ulid64::from_fields(0x0123_4567_89ab, 0xbeef);
    /// assert_eq!(&x.encode() as &str, "028T5CY4TQFQF");
    /// ```
    pub fn encode(&self) -> FStr<ENCODED_LEN> {
        let mut buffer = [0u8; ENCODED_LEN];
        base32::encode_digits(self.0 as u128, &mut buffer);
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Returns the 13-digit string representation with the low 9 digits (the random field and the
    /// lowest 29 timestamp bits) first, followed by the top 4 digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monoulid::Ulid64;
    ///
    /// let x = Ulid64::from_fields(0x0123_4567_89ab, 0xbeef);
    /// assert_eq!(&x.lexic() as &str, "5CY4TQFQF028T");
    /// assert_eq!(Ulid64::parse_lexic("5CY4TQFQF028T"), Ok(x));
    /// ```
    pub fn lexic(&self) -> FStr<ENCODED_LEN> {
        let mut buffer = [0u8; ENCODED_LEN];
        let (low, high) = buffer.split_at_mut(LEXIC_LOW_LEN);
        let rest = base32::encode_digits(self.0 as u128, low);
        base32::encode_digits(rest, high);
        debug_assert!(buffer.is_ascii());
        unsafe { FStr::from_bytes_unchecked(buffer) }
    }

    /// Parses the canonical string representation.
    ///
    /// Only the first 13 characters are read; anything after them is ignored. The leading digit
    /// carries 4 bits, so a leading digit above `F` does not round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidChar`] if one of the first 13 characters is not a base32 digit
    /// and [`ParseError::TooShort`] if `src` has fewer than 13 characters.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        base32::decode_segments(src, [(ENCODED_LEN, 0)]).map(|n| Self(n as u64))
    }

    /// Parses the canonical string representation, returning `None` on failure.
    pub fn try_parse(src: &str) -> Option<Self> {
        Self::parse(src).ok()
    }

    /// Parses the string representation produced by [`Ulid64::lexic()`].
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`Ulid64::parse()`].
    pub fn parse_lexic(src: &str) -> Result<Self, ParseError> {
        base32::decode_segments(
            src,
            [
                (LEXIC_LOW_LEN, 0),
                (ENCODED_LEN - LEXIC_LOW_LEN, 5 * LEXIC_LOW_LEN as u32),
            ],
        )
        .map(|n| Self(n as u64))
    }

    /// Parses the lexic string representation, returning `None` on failure.
    pub fn try_parse_lexic(src: &str) -> Option<Self> {
        Self::parse_lexic(src).ok()
    }
}

impl fmt::Display for Ulid64 {
    /// Returns the 13-digit canonical string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Ulid64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ulid64({})", self.encode())
    }
}

impl str::FromStr for Ulid64 {
    type Err = ParseError;

    /// Creates an object from the 13-digit canonical string representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl TryFrom<&str> for Ulid64 {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse(src)
    }
}

impl From<Ulid64> for u64 {
    fn from(src: Ulid64) -> Self {
        src.0
    }
}

impl From<u64> for Ulid64 {
    fn from(src: u64) -> Self {
        Self(src)
    }
}

impl From<Ulid64> for [u8; 8] {
    fn from(src: Ulid64) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 8]> for Ulid64 {
    fn from(src: [u8; 8]) -> Self {
        Self::from_bytes(src)
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
mod std_ext {
    use super::{ParseError, Ulid64};
    use std::time::SystemTime;

    impl Ulid64 {
        /// Returns the embedded timestamp as a [`SystemTime`].
        pub fn system_time(&self) -> SystemTime {
            crate::timestamp::to_system_time(self.timestamp())
        }
    }

    impl From<Ulid64> for String {
        fn from(src: Ulid64) -> Self {
            src.to_string()
        }
    }

    impl TryFrom<String> for Ulid64 {
        type Error = ParseError;

        fn try_from(src: String) -> Result<Self, Self::Error> {
            src.parse()
        }
    }
}

#[cfg(feature = "chrono")]
#[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
mod chrono_support {
    use super::Ulid64;
    use chrono::{DateTime, Utc};

    impl Ulid64 {
        /// Returns the embedded timestamp as a calendar date and time in UTC.
        pub fn datetime(&self) -> DateTime<Utc> {
            crate::timestamp::to_datetime(self.timestamp())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Ulid64};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Ulid64 {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Ulid64 {
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
        type Value = Ulid64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a 13-digit base32 string or 8 bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Self::Value::parse(value).map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 8]>::try_from(value)
                .map(Self::Value::from_bytes)
                .map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{ParseError, Ulid64, MAX_TIMESTAMP};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16), &'static str, &'static str)] {
        &[
            ((0, 0), "0000000000000", "0000000000000"),
            ((MAX_TIMESTAMP, 0), "FZZZZZZZZY000", "ZZZZZY000FZZZ"),
            ((0, 0xffff), "0000000001ZZZ", "000001ZZZ0000"),
            ((MAX_TIMESTAMP, 0xffff), "FZZZZZZZZZZZZ", "ZZZZZZZZZFZZZ"),
            ((1, 1), "0000000002001", "0000020010000"),
            ((0x0123_4567_89ab, 0xbeef), "028T5CY4TQFQF", "5CY4TQFQF028T"),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for &(fs, text, lexic) in prepare_cases() {
            let from_fields = Ulid64::from_fields(fs.0, fs.1);
            assert_eq!(from_fields.timestamp(), fs.0);
            assert_eq!(from_fields.random(), fs.1);
            assert_eq!(&from_fields.encode() as &str, text);
            assert_eq!(&from_fields.lexic() as &str, lexic);
            assert_eq!(Ulid64::parse(text), Ok(from_fields));
            assert_eq!(text.parse(), Ok(from_fields));
            assert_eq!(Ulid64::parse_lexic(lexic), Ok(from_fields));
            #[cfg(feature = "std")]
            assert_eq!(&from_fields.to_string(), text);
        }
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for &(fs, _, _) in prepare_cases() {
            let e = Ulid64::from_fields(fs.0, fs.1);
            assert_eq!(Ulid64::from(<[u8; 8]>::from(e)), e);
            assert_eq!(Ulid64::from(u64::from(e)), e);
            assert_eq!(Ulid64::from_u64(e.to_u64()), e);
            assert_eq!(Ulid64::from_slice(&e.to_bytes()), Some(e));
            assert_eq!(Ulid64::try_from(&e.encode() as &str), Ok(e));
            assert_eq!(Ulid64::try_parse_lexic(&e.lexic()), Some(e));
            #[cfg(feature = "std")]
            assert_eq!(Ulid64::try_from(e.to_string()), Ok(e));
        }
    }

    /// Writes the single word in little-endian byte order
    #[test]
    fn writes_the_single_word_in_little_endian_byte_order() {
        let x = Ulid64::from_fields(0x0123_4567_89ab, 0xbeef);
        assert_eq!(x.to_u64(), 0x0123_4567_89ab_beef);
        assert_eq!(x.to_bytes(), [239, 190, 171, 137, 103, 69, 35, 1]);
        assert_eq!(Ulid64::from_slice(&x.to_bytes()[..7]), None);
    }

    /// Round-trips random values through every representation
    #[test]
    fn round_trips_random_values_through_every_representation() {
        for _ in 0..1_000 {
            let bytes: [u8; 8] = rand::random();
            let e = Ulid64::from_bytes(bytes);
            assert_eq!(e.to_bytes(), bytes);
            assert_eq!(Ulid64::parse(&e.encode()), Ok(e));
            assert_eq!(Ulid64::parse_lexic(&e.lexic()), Ok(e));
        }
    }

    /// Ignores characters after the thirteenth
    #[test]
    fn ignores_characters_after_the_thirteenth() {
        assert_eq!(Ulid64::parse("0000000000000"), Ok(Ulid64::NIL));
        assert_eq!(Ulid64::parse("0000000000000ILOU!"), Ok(Ulid64::NIL));
        assert_eq!(
            Ulid64::try_parse_lexic("5CY4TQFQF028T 01"),
            Some(Ulid64::from_fields(0x0123_4567_89ab, 0xbeef))
        );
    }

    /// Rejects characters outside the alphabet in both entry points
    #[test]
    fn rejects_characters_outside_the_alphabet_in_both_entry_points() {
        let cases = [
            ("028T5CY4TQFQI", ParseError::InvalidChar('I')),
            ("L28T5CY4TQFQF", ParseError::InvalidChar('L')),
            ("028T5CY4OQFQF", ParseError::InvalidChar('O')),
            ("028T5CU4TQFQF", ParseError::InvalidChar('U')),
            ("028T5CY4TQFQ!", ParseError::InvalidChar('!')),
            ("028t5cy4tqfqf", ParseError::InvalidChar('t')),
            ("\u{7f}28T5CY4TQFQF", ParseError::InvalidChar('\u{7f}')),
            ("028T5CY4TQFQ\u{3042}", ParseError::InvalidChar('\u{3042}')),
        ];

        for (text, err) in cases {
            assert_eq!(Ulid64::parse(text), Err(err));
            assert_eq!(Ulid64::try_parse(text), None);
            assert_eq!(Ulid64::parse_lexic(text), Err(err));
            assert_eq!(Ulid64::try_parse_lexic(text), None);
        }
    }

    /// Fails on too short input
    #[test]
    fn fails_on_too_short_input() {
        for text in ["", "028T5CY4TQFQ", "0"] {
            assert_eq!(Ulid64::try_parse(text), None);
            assert_eq!(Ulid64::try_parse_lexic(text), None);
        }
        assert_eq!(
            Ulid64::parse("028T5CY4TQFQ"),
            Err(ParseError::TooShort {
                expected: 13,
                found: 12
            })
        );
    }

    /// Discards the bits above 64 in the leading digit
    #[test]
    fn discards_the_bits_above_64_in_the_leading_digit() {
        assert_eq!(Ulid64::parse("ZZZZZZZZZZZZZ"), Ok(Ulid64::MAX));
        assert_eq!(Ulid64::parse("G000000000000"), Ok(Ulid64::NIL));
        assert_eq!(Ulid64::parse_lexic("000000000G000"), Ok(Ulid64::NIL));
    }

    /// Sorts canonical strings by timestamp first
    #[test]
    fn sorts_canonical_strings_by_timestamp_first() {
        let a = Ulid64::from_fields(1_700_000_000_000, 0xffff);
        let b = Ulid64::from_fields(1_700_000_000_001, 0);
        assert!(a < b);
        assert!((&a.encode() as &str) < (&b.encode() as &str));
    }

    /// Returns Nil and Max identifiers
    #[test]
    fn returns_nil_and_max_identifiers() {
        assert_eq!(&Ulid64::NIL.encode() as &str, "0000000000000");
        assert_eq!(&Ulid64::MAX.encode() as &str, "FZZZZZZZZZZZZ");
        assert_eq!(format!("{:?}", Ulid64::NIL), "Ulid64(0000000000000)");
    }

    /// Extracts the system time
    #[cfg(feature = "std")]
    #[test]
    fn extracts_the_system_time() {
        use std::time::{Duration, UNIX_EPOCH};
        let x = Ulid64::from_fields(1_700_000_000_123, 7);
        assert_eq!(
            x.system_time(),
            UNIX_EPOCH + Duration::from_millis(1_700_000_000_123)
        );
        #[cfg(feature = "chrono")]
        assert_eq!(x.datetime().timestamp_millis(), 1_700_000_000_123);
    }
}
