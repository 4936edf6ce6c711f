/// Field decoding primitives
///
/// Stateless helpers shared by the record decoder: packed BCD digit
/// extraction, ASCII decode, hex rendering and fixed-point number formatting.

use crate::error::{DecodeError, DecodeResult};
use std::fmt::Write;

const MATCHING_TIME_DIGITS: usize = 12;

/// Decode an ASCII field, dropping trailing whitespace
pub fn decode_ascii(bytes: &[u8]) -> DecodeResult<String> {
    if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(DecodeError::Encoding {
            offset,
            byte: bytes[offset],
        });
    }
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    Ok(text.trim_end().to_string())
}

/// Expand packed BCD into a digit string, two digits per byte.
///
/// Nibbles are not range checked: a nibble of 10-15 is written as its
/// decimal value ("10".."15"). Use [`check_packed_bcd`] to reject those.
pub fn decode_packed_bcd(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        push_nibble(&mut out, byte >> 4);
        push_nibble(&mut out, byte & 0x0F);
    }
    out
}

#[inline]
fn push_nibble(out: &mut String, nibble: u8) {
    if nibble > 9 {
        out.push('1');
        out.push(char::from(b'0' + nibble - 10));
    } else {
        out.push(char::from(b'0' + nibble));
    }
}

/// Fails on the first byte holding a nibble outside 0-9
pub fn check_packed_bcd(bytes: &[u8]) -> DecodeResult<()> {
    match bytes.iter().find(|&&b| (b >> 4) > 9 || (b & 0x0F) > 9) {
        Some(&byte) => Err(DecodeError::InvalidBcd { byte }),
        None => Ok(()),
    }
}

/// Uppercase hex rendering, e.g. `[0x0D, 0x0A]` -> `"0D0A"`
pub fn decode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Format a digit string as an integer or fixed-point decimal.
///
/// With `decimal_digits == 0` the rightmost `integer_digits` characters
/// (or the whole string) are taken and leading zeros stripped. Otherwise the
/// rightmost `integer_digits + decimal_digits` characters are split into
/// integer and fraction parts; leading zeros of the integer part and
/// trailing zeros of the fraction are dropped, and the point is omitted when
/// the fraction ends up empty. An all-zero value formats as `"0"`.
pub fn format_number(
    digits: &str,
    integer_digits: Option<usize>,
    decimal_digits: usize,
) -> DecodeResult<String> {
    let total = digits.len();

    if decimal_digits == 0 {
        let integer_part = match integer_digits {
            Some(n) if n > 0 => tail(digits, n.min(total))?,
            _ => digits,
        };
        return Ok(non_empty(integer_part.trim_start_matches('0')));
    }

    let integer_digits = match integer_digits {
        Some(n) => n,
        None => total.checked_sub(decimal_digits).ok_or(DecodeError::Format {
            need: decimal_digits,
            have: total,
        })?,
    };
    let need = integer_digits + decimal_digits;
    if total < need {
        return Err(DecodeError::Format { need, have: total });
    }

    let window = tail(digits, need)?;
    let (integer_part, fraction) = split(window, integer_digits, need)?;
    let integer_part = integer_part.trim_start_matches('0');
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        Ok(non_empty(integer_part))
    } else {
        Ok(format!("{}.{}", integer_part, fraction))
    }
}

fn tail(digits: &str, n: usize) -> DecodeResult<&str> {
    digits.get(digits.len() - n..).ok_or(DecodeError::Format {
        need: n,
        have: digits.len(),
    })
}

fn split(window: &str, at: usize, need: usize) -> DecodeResult<(&str, &str)> {
    match (window.get(..at), window.get(at..)) {
        (Some(head), Some(rest)) => Ok((head, rest)),
        _ => Err(DecodeError::Format {
            need,
            have: window.len(),
        }),
    }
}

#[inline]
fn non_empty(s: &str) -> String {
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Decode a 6-byte packed BCD matching time into `HH:MM:SS.mmmuuu`
pub fn format_matching_time(bytes: &[u8]) -> DecodeResult<String> {
    let digits = decode_packed_bcd(bytes);
    let d = match digits.get(..MATCHING_TIME_DIGITS) {
        Some(d) => d,
        None => {
            return Err(DecodeError::Format {
                need: MATCHING_TIME_DIGITS,
                have: digits.len(),
            })
        }
    };
    Ok(format!(
        "{}:{}:{}.{}{}",
        &d[0..2],
        &d[2..4],
        &d[4..6],
        &d[6..9],
        &d[9..12]
    ))
}
