/// Instant quote reconstruction
///
/// The body ends in a flat run of 9-byte price/quantity groups. Which group
/// is the trade, which are bids and which are asks is only known from the
/// reveal flags:
///
///   [trade?][bid 0 .. bid n-1][ask 0 .. ask m-1]
///
/// Central-registered bonds (stock codes A*, C*, D*) disclose one level per
/// side; the remaining bid groups are still present on the wire and skipped.

use crate::error::DecodeResult;
use crate::fields::{decode_packed_bcd, format_number};
use crate::flags::{LimitFlags, RevealFlags, StatusFlags};
use crate::protocol::*;
use serde::Serialize;

/// One raw price/quantity group, borrowed from the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteGroup<'a> {
    pub price: &'a [u8],
    pub quantity: &'a [u8],
}

impl<'a> QuoteGroup<'a> {
    fn from_chunk(chunk: &'a [u8]) -> Self {
        let (price, quantity) = chunk.split_at(PRICE_LEN);
        QuoteGroup { price, quantity }
    }
}

/// Split the quote region of a raw record into groups.
///
/// Groups are taken at fixed strides from `QUOTE_OFFSET` for as long as a
/// whole group fits before the terminal code. A trailing partial group (the
/// stored check byte) is ignored.
pub fn extract_groups(record: &[u8]) -> Vec<QuoteGroup<'_>> {
    let end = record.len().saturating_sub(TERMINAL_CODE.len());
    match record.get(QUOTE_OFFSET..end) {
        Some(region) => region
            .chunks_exact(QUOTE_GROUP_LEN)
            .map(QuoteGroup::from_chunk)
            .collect(),
        None => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceQty {
    pub price: String,
    pub quantity: String,
}

impl PriceQty {
    pub fn new(price: impl Into<String>, quantity: impl Into<String>) -> Self {
        PriceQty {
            price: price.into(),
            quantity: quantity.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantQuotes {
    pub trade_price_qty: Option<PriceQty>,
    pub best_bids: Vec<PriceQty>,
    pub best_asks: Vec<PriceQty>,
}

impl InstantQuotes {
    pub fn is_empty(&self) -> bool {
        self.trade_price_qty.is_none() && self.best_bids.is_empty() && self.best_asks.is_empty()
    }
}

pub fn decode_price(bytes: &[u8]) -> DecodeResult<String> {
    format_number(
        &decode_packed_bcd(bytes),
        Some(PRICE_INTEGER_DIGITS),
        PRICE_DECIMAL_DIGITS,
    )
}

pub fn decode_quantity(bytes: &[u8]) -> DecodeResult<String> {
    format_number(&decode_packed_bcd(bytes), None, 0)
}

fn decode_group(group: &QuoteGroup) -> DecodeResult<PriceQty> {
    Ok(PriceQty {
        price: decode_price(group.price)?,
        quantity: decode_quantity(group.quantity)?,
    })
}

pub struct QuoteReconstructor;

impl QuoteReconstructor {
    /// Turn the flat group list into trade / best bid / best ask entries.
    ///
    /// Missing groups are not an error: the walk stops at the end of the
    /// available data.
    pub fn reconstruct(
        groups: &[QuoteGroup],
        reveal: &RevealFlags,
        limit: &LimitFlags,
        status: &StatusFlags,
        stock_code: &str,
    ) -> DecodeResult<InstantQuotes> {
        let mut quotes = InstantQuotes::default();

        if status.trial_disclosure {
            return Ok(quotes);
        }

        let mut cursor = 0usize;
        if reveal.trade_price_qty {
            if let Some(group) = groups.first() {
                let mut trade = decode_group(group)?;
                // Deferred matching: indicative price, zero volume
                if limit.price_trend.is_halted() {
                    trade.quantity = "0".to_string();
                }
                quotes.trade_price_qty = Some(trade);
            }
            cursor = 1;
        }

        if reveal.trade_only {
            return Ok(quotes);
        }

        let depth_cap = if is_central_bond(stock_code) { 1 } else { usize::MAX };

        let bid_count = reveal.best_bid_count as usize;
        quotes.best_bids = Self::take_levels(groups, cursor, bid_count, depth_cap)?;
        cursor += bid_count;

        let ask_count = reveal.best_ask_count as usize;
        quotes.best_asks = Self::take_levels(groups, cursor, ask_count, depth_cap)?;

        Ok(quotes)
    }

    fn take_levels(
        groups: &[QuoteGroup],
        start: usize,
        count: usize,
        cap: usize,
    ) -> DecodeResult<Vec<PriceQty>> {
        groups
            .iter()
            .skip(start)
            .take(count.min(cap))
            .map(decode_group)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PriceTrend;

    static PRICES: [[u8; 5]; 3] = [
        [0x00, 0x00, 0x12, 0x34, 0x00],
        [0x00, 0x00, 0x56, 0x78, 0x00],
        [0x00, 0x00, 0x12, 0x34, 0x00],
    ];
    static QUANTITIES: [[u8; 4]; 3] = [
        [0x00, 0x00, 0x12, 0x12],
        [0x00, 0x00, 0x23, 0x23],
        [0x00, 0x00, 0x34, 0x34],
    ];

    fn groups() -> Vec<QuoteGroup<'static>> {
        PRICES
            .iter()
            .zip(QUANTITIES.iter())
            .map(|(p, q)| QuoteGroup { price: p, quantity: q })
            .collect()
    }

    #[test]
    fn test_trade_bid_ask() {
        let reveal = RevealFlags {
            trade_price_qty: true,
            best_bid_count: 1,
            best_ask_count: 1,
            trade_only: false,
        };
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &StatusFlags::default(),
            "1101",
        )
        .unwrap();

        assert_eq!(quotes.trade_price_qty, Some(PriceQty::new("12.34", "1212")));
        assert_eq!(quotes.best_bids, vec![PriceQty::new("56.78", "2323")]);
        assert_eq!(quotes.best_asks, vec![PriceQty::new("12.34", "3434")]);
    }

    #[test]
    fn test_halted_trade_reports_zero_quantity() {
        let reveal = RevealFlags::from_byte(0b1000_0000);
        let limit = LimitFlags::from_byte(0b0000_0010);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &limit,
            &StatusFlags::default(),
            "2330",
        )
        .unwrap();
        assert_eq!(quotes.trade_price_qty, Some(PriceQty::new("12.34", "0")));

        // reserved trend bits also mean deferred matching
        let limit = LimitFlags::from_byte(0b0000_0011);
        assert_eq!(limit.price_trend, PriceTrend::Reserved);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &limit,
            &StatusFlags::default(),
            "2330",
        )
        .unwrap();
        assert_eq!(quotes.trade_price_qty, Some(PriceQty::new("12.34", "0")));
    }

    #[test]
    fn test_trial_disclosure_is_empty() {
        let reveal = RevealFlags::from_byte(0xFF);
        let status = StatusFlags::from_byte(0x80);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &status,
            "2330",
        )
        .unwrap();
        assert!(quotes.is_empty());
    }

    #[test]
    fn test_trade_only_suppresses_levels() {
        // trade, 1 bid, 1 ask, trade-only
        let reveal = RevealFlags::from_byte(0b1001_0011);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &StatusFlags::default(),
            "2330",
        )
        .unwrap();
        assert!(quotes.trade_price_qty.is_some());
        assert!(quotes.best_bids.is_empty());
        assert!(quotes.best_asks.is_empty());
    }

    #[test]
    fn test_no_trade_starts_at_first_group() {
        // no trade, 2 bids, 1 ask
        let reveal = RevealFlags::from_byte(0b0010_0010);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &StatusFlags::default(),
            "2330",
        )
        .unwrap();
        assert_eq!(quotes.trade_price_qty, None);
        assert_eq!(quotes.best_bids.len(), 2);
        assert_eq!(quotes.best_bids[0], PriceQty::new("12.34", "1212"));
        assert_eq!(quotes.best_asks, vec![PriceQty::new("12.34", "3434")]);
    }

    #[test]
    fn test_central_bond_keeps_one_level_but_skips_all_bids() {
        // no trade, 2 bids, 1 ask
        let reveal = RevealFlags::from_byte(0b0010_0010);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &StatusFlags::default(),
            "A12345",
        )
        .unwrap();
        assert_eq!(quotes.best_bids, vec![PriceQty::new("12.34", "1212")]);
        // asks start after both bid groups
        assert_eq!(quotes.best_asks, vec![PriceQty::new("12.34", "3434")]);
    }

    #[test]
    fn test_counts_beyond_available_groups_stop_silently() {
        let reveal = RevealFlags::from_byte(0b1101_1010);
        let quotes = QuoteReconstructor::reconstruct(
            &groups(),
            &reveal,
            &LimitFlags::default(),
            &StatusFlags::default(),
            "2330",
        )
        .unwrap();
        assert!(quotes.trade_price_qty.is_some());
        assert_eq!(quotes.best_bids.len(), 2);
        assert!(quotes.best_asks.is_empty());
    }

    #[test]
    fn test_extract_groups() {
        let mut record = vec![0u8; QUOTE_OFFSET];
        record.extend_from_slice(&PRICES[0]);
        record.extend_from_slice(&QUANTITIES[0]);
        record.push(0x5A); // check byte
        record.extend_from_slice(&TERMINAL_CODE);

        let groups = extract_groups(&record);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].price, &PRICES[0]);
        assert_eq!(groups[0].quantity, &QUANTITIES[0]);

        assert!(extract_groups(&record[..QUOTE_OFFSET]).is_empty());
        assert!(extract_groups(&[]).is_empty());
    }
}
