/// Format 6 (TP03) record layout
///
/// Every record is framed as:
///   [ESC 0x1B][header(9)][body(19 + 9*n)][check(1)][CR LF]
///
/// Header: 9 bytes packed BCD
///   - message_length: 2 bytes
///   - business_code: 1 byte
///   - format_code: 1 byte
///   - format_version: 1 byte
///   - transmission_number: 4 bytes
///
/// Body:
///   - stock_code: 6 bytes ASCII, space padded
///   - matching_time: 6 bytes packed BCD (HHMMSSmmmuuu)
///   - reveal / limit / status flags: 1 byte each
///   - total_volume: 4 bytes packed BCD
///   - quote groups: 5-byte BCD price + 4-byte BCD quantity, repeated

use std::ops::Range;

pub const ESC_CODE: u8 = 0x1B;
pub const TERMINAL_CODE: [u8; 2] = [0x0D, 0x0A];

/// Anything shorter cannot hold a header and is dropped during framing
pub const MIN_RECORD_LEN: usize = 19;

pub const MESSAGE_LENGTH: Range<usize> = 1..3;
pub const BUSINESS_CODE: Range<usize> = 3..4;
pub const FORMAT_CODE: Range<usize> = 4..5;
pub const FORMAT_VERSION: Range<usize> = 5..6;
pub const TRANSMISSION_NUMBER: Range<usize> = 6..10;

pub const STOCK_CODE: Range<usize> = 10..16;
pub const MATCHING_TIME: Range<usize> = 16..22;
pub const REVEAL_FLAGS: usize = 22;
pub const LIMIT_FLAGS: usize = 23;
pub const STATUS_FLAGS: usize = 24;
pub const TOTAL_VOLUME: Range<usize> = 25..29;

pub const QUOTE_OFFSET: usize = 29;
pub const PRICE_LEN: usize = 5;
pub const QUANTITY_LEN: usize = 4;
pub const QUOTE_GROUP_LEN: usize = PRICE_LEN + QUANTITY_LEN;

/// Prices are fixed-point: 5 integer digits, 4 fractional digits
pub const PRICE_INTEGER_DIGITS: usize = 5;
pub const PRICE_DECIMAL_DIGITS: usize = 4;

/// Stock code prefixes of central-registered government bonds
pub const CENTRAL_BOND_PREFIXES: [char; 3] = ['A', 'C', 'D'];

// Compile-time checks on the layout
const _: () = {
    assert!(TERMINAL_CODE.len() == 2);
    assert!(TRANSMISSION_NUMBER.end == STOCK_CODE.start);
    assert!(STATUS_FLAGS + 1 == TOTAL_VOLUME.start);
    assert!(TOTAL_VOLUME.end == QUOTE_OFFSET);
    assert!(QUOTE_GROUP_LEN == 9);
    assert!(PRICE_LEN * 2 >= PRICE_INTEGER_DIGITS + PRICE_DECIMAL_DIGITS);
};

/// Slice `record[range]`, clamped to what the record actually holds.
///
/// Short records (between `MIN_RECORD_LEN` and a full body) yield truncated
/// or empty fields instead of panicking; the field decoders reject those.
#[inline]
pub fn field(record: &[u8], range: Range<usize>) -> &[u8] {
    let end = range.end.min(record.len());
    let start = range.start.min(end);
    &record[start..end]
}

/// Single-byte flag field as a slice (empty when out of range)
#[inline]
pub fn flag_field(record: &[u8], pos: usize) -> &[u8] {
    field(record, pos..pos + 1)
}

/// Returns true if the stock code denotes a central-registered bond
pub fn is_central_bond(stock_code: &str) -> bool {
    stock_code.starts_with(&CENTRAL_BOND_PREFIXES[..])
}

/// Stored check byte just before the terminal code, if the record has one
pub fn check_byte(record: &[u8]) -> Option<u8> {
    record
        .len()
        .checked_sub(TERMINAL_CODE.len() + 1)
        .map(|idx| record[idx])
}

/// Trailing terminal bytes of a record (may be shorter than `TERMINAL_CODE`)
pub fn terminal_bytes(record: &[u8]) -> &[u8] {
    let start = record.len().saturating_sub(TERMINAL_CODE.len());
    &record[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_clamps_to_record() {
        let record = [0u8; 20];
        assert_eq!(field(&record, STOCK_CODE).len(), 6);
        assert_eq!(field(&record, MATCHING_TIME).len(), 4);
        assert!(flag_field(&record, REVEAL_FLAGS).is_empty());
        assert!(field(&record, TOTAL_VOLUME).is_empty());
    }

    #[test]
    fn test_central_bond_prefix() {
        assert!(is_central_bond("A01234"));
        assert!(is_central_bond("C1"));
        assert!(is_central_bond("D9"));
        assert!(!is_central_bond("2330"));
        assert!(!is_central_bond("B123"));
        assert!(!is_central_bond(""));
    }

    #[test]
    fn test_check_and_terminal_bytes() {
        let record = [ESC_CODE, 0x11, 0x22, 0x7F, 0x0D, 0x0A];
        assert_eq!(check_byte(&record), Some(0x7F));
        assert_eq!(terminal_bytes(&record), &TERMINAL_CODE);
        assert_eq!(check_byte(&[0x0D, 0x0A]), None);
    }
}
