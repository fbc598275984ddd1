//! Short deterministic identifiers for collection names.
//!
//! [`hash6`] folds a string into a 32-bit signed accumulator
//! (`acc * 31 + code_unit`, two's-complement wraparound) and renders the
//! magnitude in base 36, truncated to six characters. The fold runs over
//! UTF-16 code units so names match those produced by JavaScript tooling
//! working on the same CMS ids.
//!
//! Collisions are possible and tolerated; the value is a naming aid, not a
//! content digest.

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Maximum length of a [`hash6`] identifier.
pub const HASH6_LEN: usize = 6;

/// Hash `input` into an identifier of at most six `[0-9a-z]` characters.
///
/// ```
/// use nsite_collections::hash6;
///
/// assert_eq!(hash6(""), "0");
/// assert_eq!(hash6("abc123"), "nk2mb4");
/// ```
#[must_use]
pub fn hash6(input: &str) -> String {
    let mut encoded = to_base36(fold(input).unsigned_abs());
    encoded.truncate(HASH6_LEN);
    encoded
}

fn fold(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

fn to_base36(mut value: u32) -> String {
    if value == 0 {
        return "0".to_owned();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    // Digits are ASCII.
    String::from_utf8(digits).unwrap_or_default()
}
