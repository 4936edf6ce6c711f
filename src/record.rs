/// Decoded record model handed to output sinks.
///
/// All numeric fields stay as digit strings, exactly as the feed carries
/// them; prices are rendered as fixed-point decimals. The structs derive
/// `Serialize` so a sink can write them with any serde format.

use crate::flags::{LimitFlags, RevealFlags, StatusFlags};
use crate::quotes::InstantQuotes;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub message_length: String,
    pub business_code: String,
    pub format_code: String,
    pub format_version: String,
    pub transmission_number: String,
}

impl Header {
    /// Transmission number as a sequence value, if it is all decimal digits
    pub fn transmission_sequence(&self) -> Option<u32> {
        self.transmission_number.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    pub stock_code: String,
    /// `HH:MM:SS.mmmuuu`
    pub matching_time: String,
    pub reveal_flags: RevealFlags,
    pub limit_flags: LimitFlags,
    pub status_flags: StatusFlags,
    pub total_volume: String,
    pub instant_quotes: InstantQuotes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedRecord {
    pub esc_code: String,
    pub header: Header,
    pub body: Body,
    /// XOR of the payload, stored check byte included
    pub check_code: u8,
    /// Byte preceding the terminal code, as carried on the wire
    pub stored_check_byte: Option<u8>,
    /// Uppercase hex of the terminal code
    pub terminal_code: String,
}

impl DecodedRecord {
    /// True when the stored check byte is the XOR of the bytes before it
    pub fn checksum_ok(&self) -> bool {
        self.stored_check_byte.is_some() && self.check_code == 0
    }
}
