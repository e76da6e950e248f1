use crate::base62;
use crate::error::ShortCodeError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;
use std::str::FromStr;

/// Length of the random suffix appended to every minted short code.
pub const SUFFIX_LENGTH: usize = 4;

const MAX_LENGTH: usize = 32;

/// A validated short code.
///
/// Short codes are 1-32 characters from the base62 alphabet. Minted codes
/// are the base62 encoding of the mapping id followed by a
/// [`SUFFIX_LENGTH`]-character random suffix.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl AsRef<str>) -> Result<Self, ShortCodeError> {
        let code = code.as_ref();
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Assembles a code from a mapping id and the digit values of a random
    /// suffix. Suffix digits are taken modulo 62.
    ///
    /// Two ids never produce the same code: the encoded prefix is canonical,
    /// so codes of equal length carry prefixes of equal length.
    pub fn assemble(id: u64, suffix: [u8; SUFFIX_LENGTH]) -> Self {
        let mut code = base62::encode(id);
        code.extend(suffix.iter().map(|&digit| {
            base62::ALPHABET[usize::from(digit) % base62::ALPHABET.len()] as char
        }));
        Self(SmolStr::new(code))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), ShortCodeError> {
        if code.is_empty() || code.len() > MAX_LENGTH {
            return Err(ShortCodeError::InvalidLength {
                max: MAX_LENGTH,
                actual: code.len(),
            });
        }

        if !code.bytes().all(base62::is_alphabet_byte) {
            return Err(ShortCodeError::InvalidCharacters(code.to_string()));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortCode {
    type Err = ShortCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}
