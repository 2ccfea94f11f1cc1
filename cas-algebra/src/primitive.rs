//! Functions to construct and display [`Integer`]s.

use crate::error::ArgumentError;
use rug::Integer;

/// The digits used to display and parse numbers in radixes up to 64.
pub const DIGITS: [char; 64] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
    '+', '/',
];

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Returns the radix unchanged if integers can be written in it.
pub fn check_radix(radix: u8) -> Result<u8, ArgumentError> {
    if (2..=64).contains(&radix) {
        Ok(radix)
    } else {
        Err(ArgumentError::InvalidRadix(radix))
    }
}

/// Formats an [`Integer`] in the given radix.
///
/// Radixes up to 36 are formatted by [`rug`] directly. Larger radixes (up to 64) continue with
/// uppercase letters, then `+` and `/`, following [`DIGITS`].
pub fn to_string_radix(n: &Integer, radix: u8) -> Result<String, ArgumentError> {
    check_radix(radix).map(|radix| format_radix(n, radix))
}

/// Formats an [`Integer`] in a radix already accepted by [`check_radix`].
pub(crate) fn format_radix(n: &Integer, radix: u8) -> String {
    if radix <= 36 {
        return n.to_string_radix(i32::from(radix));
    }

    let mut value = n.clone().abs();
    if value == 0 {
        return String::from("0");
    }

    let mut digits = Vec::new();
    while value != 0 {
        digits.push(DIGITS[value.mod_u(u32::from(radix)) as usize]);
        value /= u32::from(radix);
    }
    if *n < 0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// Parses an [`Integer`] from a string in the given radix. The radix must be between 2 and 64,
/// inclusive.
///
/// Returns [`None`] if the radix is out of range or the string contains a digit that is not
/// allowed in the radix.
pub fn from_str_radix(s: &str, radix: u8) -> Option<Integer> {
    check_radix(radix).ok()?;

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() {
        return None;
    }

    let allowed_digits = &DIGITS[..radix as usize];
    let mut result = int(0);
    for c in digits.chars() {
        let digit = allowed_digits.iter().position(|&d| d == c)?;
        result *= radix as u32;
        result += digit as u32;
    }

    if negative {
        result = -result;
    }
    Some(result)
}
