//! Fixed-width base32 codec over the `0-9A-Z` alphabet without `I`, `L`, `O` and `U`.

/// Digit characters used in the base32 notation.
pub(crate) const DIGITS: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Marks a character code that is not a digit in [`DECODE_MAP`].
const INVALID: u8 = 0xff;

/// O(1) map from ASCII code points to base32 digit values.
static DECODE_MAP: [u8; 128] = {
    let mut map = [INVALID; 128];
    let mut i = 0;
    while i < DIGITS.len() {
        map[DIGITS[i] as usize] = i as u8;
        i += 1;
    }
    map
};

/// Error parsing an invalid string representation of an identifier.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, thiserror::Error)]
pub enum ParseError {
    /// The string contains a character outside the base32 alphabet.
    #[error("invalid character {0:?} in identifier string")]
    InvalidChar(char),

    /// The string is shorter than the fixed width of the identifier.
    #[error("identifier string too short: expected {expected} characters, found {found}")]
    TooShort {
        /// Number of characters the identifier requires.
        expected: usize,
        /// Number of characters the string contains.
        found: usize,
    },
}

/// Fills `dst` with the lowest `5 * dst.len()` bits of `value`, most significant digit first, and
/// returns the bits that did not fit.
pub(crate) fn encode_digits(mut value: u128, dst: &mut [u8]) -> u128 {
    for e in dst.iter_mut().rev() {
        *e = DIGITS[(value & 31) as usize];
        value >>= 5;
    }
    value
}

/// Reads `n_digits` characters from `src` and accumulates them into an integer, most significant
/// digit first.
///
/// Bits shifted past the top of `u128` are discarded; callers truncate the result to their own
/// width. Characters after the `n_digits`-th one are left in `src` untouched.
pub(crate) fn decode_digits(
    src: &mut core::str::Chars<'_>,
    n_digits: usize,
) -> Result<u128, DigitError> {
    let mut value = 0u128;
    for _ in 0..n_digits {
        let c = src.next().ok_or(DigitError::Exhausted)?;
        value = (value << 5) | decode_char(c)? as u128;
    }
    Ok(value)
}

/// Returns the digit value of a single character.
fn decode_char(c: char) -> Result<u8, DigitError> {
    match DECODE_MAP.get(c as usize) {
        Some(&n) if n != INVALID => Ok(n),
        _ => Err(DigitError::InvalidChar(c)),
    }
}

/// Failure of [`decode_digits`], converted into [`ParseError`] once the full input length is
/// known.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) enum DigitError {
    InvalidChar(char),
    Exhausted,
}

impl DigitError {
    /// Converts into the public error for an identifier of `expected` characters parsed from
    /// `src`.
    pub(crate) fn into_parse_error(self, src: &str, expected: usize) -> ParseError {
        match self {
            Self::InvalidChar(c) => ParseError::InvalidChar(c),
            Self::Exhausted => ParseError::TooShort {
                expected,
                found: src.chars().count(),
            },
        }
    }
}

/// Decodes a string made of consecutive digit segments into a single integer.
///
/// Each `(n_digits, shift)` pair reads the next `n_digits` characters and places their value
/// `shift` bits up. Bits pushed past the top of `u128` are discarded.
pub(crate) fn decode_segments<const N: usize>(
    src: &str,
    segments: [(usize, u32); N],
) -> Result<u128, ParseError> {
    let expected = segments.iter().map(|s| s.0).sum();
    let mut chars = src.chars();
    let mut value = 0u128;
    for (n_digits, shift) in segments {
        let digits =
            decode_digits(&mut chars, n_digits).map_err(|e| e.into_parse_error(src, expected))?;
        value |= digits << shift;
    }
    Ok(value)
}
