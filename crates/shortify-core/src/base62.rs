//! Base62 codec for numeric identifiers.
//!
//! The alphabet is digits, then uppercase letters, then lowercase letters.
//! The order is part of the wire contract: codes minted by one deployment
//! must decode to the same identifier in every other.

use thiserror::Error;

/// The 62-character alphabet, in digit-value order.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const BASE: u64 = ALPHABET.len() as u64;

/// Longest encoding of any `u64` (`u64::MAX` needs 11 digits).
pub const MAX_ENCODED_LEN: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("cannot decode an empty string")]
    Empty,
    #[error("invalid base62 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
    #[error("base62 value does not fit in 64 bits")]
    Overflow,
}

/// Returns `true` if `byte` belongs to the alphabet.
pub fn is_alphabet_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Encodes `id` most-significant digit first.
///
/// `0` encodes to `"0"`; every other value has no leading zero digits.
///
/// ```
/// use shortify_core::base62;
///
/// assert_eq!(base62::encode(0), "0");
/// assert_eq!(base62::encode(61), "z");
/// assert_eq!(base62::encode(62), "10");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut digits = [0u8; MAX_ENCODED_LEN];
    let mut start = MAX_ENCODED_LEN;
    let mut rest = id;
    while rest > 0 {
        start -= 1;
        digits[start] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
    }

    digits[start..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 string back into its identifier.
///
/// Leading `'0'` digits are accepted and contribute nothing, so only
/// canonical strings survive an `encode(decode(s))` round trip.
pub fn decode(code: &str) -> Result<u64, DecodeError> {
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }

    code.chars()
        .enumerate()
        .try_fold(0u64, |acc, (position, character)| {
            let digit = digit_value(character)
                .ok_or(DecodeError::InvalidCharacter { character, position })?;
            acc.checked_mul(BASE)
                .and_then(|shifted| shifted.checked_add(digit))
                .ok_or(DecodeError::Overflow)
        })
}

fn digit_value(c: char) -> Option<u64> {
    let value = match c {
        '0'..='9' => c as u64 - '0' as u64,
        'A'..='Z' => c as u64 - 'A' as u64 + 10,
        'a'..='z' => c as u64 - 'a' as u64 + 36,
        _ => return None,
    };
    Some(value)
}
