//! Base-36 short codes minted from the store counters.
//!
//! Digits are `0-9` then `a-z`, most significant first, with no leading zeros
//! except for `"0"` itself.

use std::cmp::Ordering;

use thiserror::Error;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RADIX: i64 = 36;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShortCodeError {
    #[error("non-negative integer required, got {0}")]
    InvalidArgument(i64),
    #[error("empty short code")]
    Empty,
    #[error("invalid short code digit '{0}'")]
    InvalidDigit(char),
    #[error("short code out of range")]
    Overflow,
}

/// Encode a counter value as a short code.
pub fn encode(n: i64) -> Result<String, ShortCodeError> {
    if n < 0 {
        return Err(ShortCodeError::InvalidArgument(n));
    }
    if n == 0 {
        return Ok("0".to_string());
    }
    let mut rest = n;
    let mut digits = Vec::new();
    while rest != 0 {
        digits.push(ALPHABET[(rest % RADIX) as usize]);
        rest /= RADIX;
    }
    digits.reverse();
    // alphabet is ASCII
    Ok(digits.into_iter().map(char::from).collect())
}

/// Inverse of [`encode`]. Only the canonical lowercase alphabet is accepted.
pub fn decode(code: &str) -> Result<i64, ShortCodeError> {
    if code.is_empty() {
        return Err(ShortCodeError::Empty);
    }
    code.chars().try_fold(0i64, |acc, c| {
        let digit = match c {
            '0'..='9' => c as i64 - '0' as i64,
            'a'..='z' => c as i64 - 'a' as i64 + 10,
            other => return Err(ShortCodeError::InvalidDigit(other)),
        };
        acc.checked_mul(RADIX)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ShortCodeError::Overflow)
    })
}

/// Compare two codes by the seed they encode.
///
/// For canonical codes this is length first, then lexicographic, so it also
/// orders codes that would not decode (e.g. too long for an `i64`) consistently.
pub fn cmp_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
