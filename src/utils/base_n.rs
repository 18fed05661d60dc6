//! Reversible integer ⇄ string encoding over an arbitrary alphabet.
//!
//! Short codes are the positional base-N representation of a redirect id,
//! where N is the alphabet length. The functions work on arbitrary-precision
//! integers so any non-negative value round-trips, not only storage ids.

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{ToPrimitive, Zero};
use std::collections::HashMap;

/// Default alphabet: digits and letters without the look-alikes `0 1 l I O`.
pub const DEFAULT_ALPHABET: &str = "23456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";

/// Character to digit-value lookup used by [`decode`].
pub type CharMap = HashMap<char, u32>;

/// Errors produced by the base-N codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Character '{0}' is not part of the alphabet")]
    UnknownCharacter(char),
}

/// Builds the char map for an alphabet (character → index).
pub fn char_map(alphabet: &str) -> CharMap {
    alphabet
        .chars()
        .enumerate()
        .map(|(idx, ch)| (ch, idx as u32))
        .collect()
}

/// Encodes a non-negative integer with the given alphabet.
///
/// `0` encodes to the first alphabet character; any other value has no
/// leading "zero" characters.
///
/// # Errors
///
/// Returns [`CodecError::InvalidArgument`] if the alphabet is empty, if `n`
/// is negative, or if a one-character alphabet is asked to encode `n > 0`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(encode(0, "ZYX").unwrap(), "Z");
/// assert_eq!(encode(5, "01").unwrap(), "101");
/// ```
pub fn encode(n: impl Into<BigInt>, alphabet: &str) -> Result<String, CodecError> {
    let digits: Vec<char> = alphabet.chars().collect();
    let base = digits.len();
    if base == 0 {
        return Err(CodecError::InvalidArgument(
            "The base must be at least 1".to_string(),
        ));
    }

    let n = n.into();
    let mut n = match n.sign() {
        Sign::Minus => {
            return Err(CodecError::InvalidArgument(format!(
                "n must be a non-negative integer (found: {n})"
            )));
        }
        _ => n.magnitude().clone(),
    };

    if n.is_zero() {
        return Ok(digits[0].to_string());
    }

    if base == 1 {
        return Err(CodecError::InvalidArgument(
            "A single-character alphabet can only encode 0".to_string(),
        ));
    }

    let radix = BigUint::from(base);
    let mut encoded = Vec::new();
    while !n.is_zero() {
        let digit = (&n % &radix).to_usize().unwrap_or_default();
        encoded.push(digits[digit]);
        n /= &radix;
    }

    Ok(encoded.into_iter().rev().collect())
}

/// Decodes a string produced by [`encode`] back into an integer.
///
/// Characters are read from the least significant (rightmost) position.
///
/// # Errors
///
/// - [`CodecError::InvalidArgument`] if `encoded` or `char_map` is empty
/// - [`CodecError::UnknownCharacter`] if a character is missing from `char_map`
pub fn decode(encoded: &str, char_map: &CharMap) -> Result<BigUint, CodecError> {
    if char_map.is_empty() {
        return Err(CodecError::InvalidArgument(
            "The base must be at least 1".to_string(),
        ));
    }
    if encoded.is_empty() {
        return Err(CodecError::InvalidArgument(
            "Nothing to decode".to_string(),
        ));
    }

    let radix = BigUint::from(char_map.len());
    let mut place = BigUint::from(1u8);
    let mut n = BigUint::zero();

    for ch in encoded.chars().rev() {
        let value = char_map
            .get(&ch)
            .copied()
            .ok_or(CodecError::UnknownCharacter(ch))?;
        n += &place * BigUint::from(value);
        place *= &radix;
    }

    Ok(n)
}

/// A validated alphabet together with its char map.
///
/// Bridges the codec and the redirect id range: ids are `i32` values in
/// `[0, i32::MAX]`, codes outside that range decode to `None`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: String,
    char_map: CharMap,
}

impl Alphabet {
    /// Validates an alphabet: it must be non-empty and contain no duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] if the alphabet is empty or
    /// repeats a character.
    pub fn new(symbols: &str) -> Result<Self, CodecError> {
        if symbols.is_empty() {
            return Err(CodecError::InvalidArgument(
                "The alphabet must not be empty".to_string(),
            ));
        }

        let char_map = char_map(symbols);
        if char_map.len() != symbols.chars().count() {
            return Err(CodecError::InvalidArgument(
                "The alphabet must not repeat characters".to_string(),
            ));
        }

        Ok(Self {
            symbols: symbols.to_string(),
            char_map,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.symbols
    }

    pub fn char_map(&self) -> &CharMap {
        &self.char_map
    }

    /// Number of symbols, i.e. the radix of the encoding.
    pub fn base(&self) -> usize {
        self.char_map.len()
    }

    /// Encodes a redirect id.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidArgument`] for negative ids.
    pub fn encode_id(&self, id: i32) -> Result<String, CodecError> {
        encode(id, &self.symbols)
    }

    /// Decodes a short code into a redirect id.
    ///
    /// Returns `Ok(None)` when the code is well formed but denotes a value
    /// beyond the id range, since no record can carry such an id.
    ///
    /// # Errors
    ///
    /// Propagates [`decode`] errors.
    pub fn decode_id(&self, code: &str) -> Result<Option<i32>, CodecError> {
        decode(code, &self.char_map).map(|n| n.to_i32())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.to_string(),
            char_map: char_map(DEFAULT_ALPHABET),
        }
    }
}
