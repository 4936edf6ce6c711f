/// Bit-mapped flag fields: reveal, limit and status
///
/// Each field is a single byte. The decoders take a slice so that a short
/// record surfaces as a validation error instead of a panic.

use crate::error::{DecodeError, DecodeResult};
use serde::Serialize;

fn single_byte(field: &'static str, bytes: &[u8]) -> DecodeResult<u8> {
    match bytes {
        [b] => Ok(*b),
        _ => Err(DecodeError::Validation {
            field,
            len: bytes.len(),
        }),
    }
}

/// Which quote groups follow the fixed body, and how many
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealFlags {
    /// Bit 7: a trade price/quantity group is present
    pub trade_price_qty: bool,
    /// Bits 6-4
    pub best_bid_count: u8,
    /// Bits 3-1
    pub best_ask_count: u8,
    /// Bit 0: only the trade is disclosed, no bid/ask groups
    pub trade_only: bool,
}

impl RevealFlags {
    pub fn from_byte(b: u8) -> Self {
        RevealFlags {
            trade_price_qty: b & 0b1000_0000 != 0,
            best_bid_count: (b >> 4) & 0b111,
            best_ask_count: (b >> 1) & 0b111,
            trade_only: b & 0b0000_0001 != 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        single_byte("reveal_flags", bytes).map(Self::from_byte)
    }
}

/// Price-limit state of a trade or best bid/ask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitState {
    #[default]
    Normal,
    LimitDown,
    LimitUp,
    Unknown,
}

impl LimitState {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => LimitState::Normal,
            0b01 => LimitState::LimitDown,
            0b10 => LimitState::LimitUp,
            _ => LimitState::Unknown,
        }
    }
}

/// Instantaneous price trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTrend {
    #[default]
    NormalDisclosure,
    HaltedTrendingDown,
    HaltedTrendingUp,
    Reserved,
}

impl PriceTrend {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => PriceTrend::NormalDisclosure,
            0b01 => PriceTrend::HaltedTrendingDown,
            0b10 => PriceTrend::HaltedTrendingUp,
            _ => PriceTrend::Reserved,
        }
    }

    /// Matching is deferred; a disclosed trade carries an indicative price only
    pub fn is_halted(&self) -> bool {
        !matches!(self, PriceTrend::NormalDisclosure)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitFlags {
    /// Bits 7-6
    pub trade: LimitState,
    /// Bits 5-4
    pub best_bid: LimitState,
    /// Bits 3-2
    pub best_ask: LimitState,
    /// Bits 1-0
    pub price_trend: PriceTrend,
}

impl LimitFlags {
    pub fn from_byte(b: u8) -> Self {
        LimitFlags {
            trade: LimitState::from_bits(b >> 6),
            best_bid: LimitState::from_bits(b >> 4),
            best_ask: LimitState::from_bits(b >> 2),
            price_trend: PriceTrend::from_bits(b),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        single_byte("limit_flags", bytes).map(Self::from_byte)
    }
}

/// Delayed open/close marks only mean something during trial disclosure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialMark {
    #[default]
    NotApplicable,
    Yes,
    No,
}

impl TrialMark {
    fn new(trial: bool, bit: bool) -> Self {
        match (trial, bit) {
            (false, _) => TrialMark::NotApplicable,
            (true, true) => TrialMark::Yes,
            (true, false) => TrialMark::No,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMethod {
    #[default]
    CallAuction,
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusFlags {
    /// Bit 7
    pub trial_disclosure: bool,
    /// Bit 6
    pub delayed_open: TrialMark,
    /// Bit 5
    pub delayed_close: TrialMark,
    /// Bit 4
    pub matching_method: MatchingMethod,
    /// Bit 3
    pub market_open: bool,
    /// Bit 2
    pub market_close: bool,
}

impl StatusFlags {
    pub fn from_byte(b: u8) -> Self {
        let trial = b & 0b1000_0000 != 0;
        StatusFlags {
            trial_disclosure: trial,
            delayed_open: TrialMark::new(trial, b & 0b0100_0000 != 0),
            delayed_close: TrialMark::new(trial, b & 0b0010_0000 != 0),
            matching_method: if b & 0b0001_0000 != 0 {
                MatchingMethod::Continuous
            } else {
                MatchingMethod::CallAuction
            },
            market_open: b & 0b0000_1000 != 0,
            market_close: b & 0b0000_0100 != 0,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> DecodeResult<Self> {
        single_byte("status_flags", bytes).map(Self::from_byte)
    }
}
