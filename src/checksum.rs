/// XOR checksum over a record's payload
///
/// The payload runs from the byte after ESC through the stored check byte,
/// stopping before the terminal code. The result is reported, not compared:
/// a record whose stored check byte is the XOR of the bytes before it
/// reports 0.

use crate::protocol::TERMINAL_CODE;

/// XOR-reduce a byte range
#[inline]
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Checksum of `record[1..len - TERMINAL_CODE.len()]`; 0 for degenerate records
pub fn record_checksum(record: &[u8]) -> u8 {
    let end = record.len().saturating_sub(TERMINAL_CODE.len());
    record.get(1..end).map(xor_checksum).unwrap_or(0)
}
