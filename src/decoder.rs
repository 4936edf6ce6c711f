/// Record decoder
///
/// Runs one raw record through the pipeline:
///   framing check -> skip filter -> field/flag decode -> quote
///   reconstruction -> checksum
///
/// Records failing the framing check (no ESC, fewer than 19 bytes) are
/// dropped silently; they only show up in `FeedStats`.
///
/// `decode_stream` isolates each record: a malformed field is logged and
/// counted, and decoding continues with the next record. Only read errors
/// end the stream early.

use crate::checksum::record_checksum;
use crate::config::DecoderConfig;
use crate::error::{DecodeError, DecodeResult};
use crate::fields::{
    check_packed_bcd, decode_ascii, decode_hex, decode_packed_bcd, format_matching_time,
    format_number,
};
use crate::filter::SkipFilter;
use crate::flags::{LimitFlags, RevealFlags, StatusFlags};
use crate::gap_detector::{GapDetector, SequenceEvent};
use crate::protocol::*;
use crate::quotes::{extract_groups, QuoteReconstructor};
use crate::reassembler::Reassembler;
use crate::record::{Body, DecodedRecord, Header};
use crate::stats::FeedStats;
use std::io::{ErrorKind, Read};
use std::time::Instant;
use tracing::{debug, warn};

/// Returns true if the record starts with ESC and is long enough to decode
#[inline]
pub fn is_framed(record: &[u8]) -> bool {
    record.len() >= MIN_RECORD_LEN && record[0] == ESC_CODE
}

pub struct RecordDecoder {
    filter: SkipFilter,
    strict_bcd: bool,
    chunk_size: usize,
    max_buffer_size: Option<usize>,
    stats: FeedStats,
    gaps: GapDetector,
}

impl RecordDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        RecordDecoder {
            filter: SkipFilter::new(config.skip_conditions),
            strict_bcd: config.strict_bcd,
            chunk_size: config.chunk_size.max(1),
            max_buffer_size: config.max_buffer_size,
            stats: FeedStats::new(),
            gaps: GapDetector::new(),
        }
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    pub fn gaps(&self) -> &GapDetector {
        &self.gaps
    }

    /// Decode one raw record.
    ///
    /// `Ok(None)` means the record was dropped by framing or skipped by the
    /// filter. Field errors are returned as-is.
    pub fn decode(&mut self, raw: &[u8]) -> DecodeResult<Option<DecodedRecord>> {
        self.stats.record_raw(raw.len());

        if !is_framed(raw) {
            debug!(len = raw.len(), "dropping unframed record");
            self.stats.record_framing_reject();
            return Ok(None);
        }

        self.track_sequence(raw);

        if self.filter.should_skip(raw) {
            self.stats.record_skip();
            return Ok(None);
        }

        let start = Instant::now();
        let result = Self::decode_record(raw, self.strict_bcd);
        self.stats
            .record_decode_latency(start.elapsed().as_nanos() as u64);

        match result {
            Ok(record) => {
                self.stats.record_decoded();
                Ok(Some(record))
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    fn track_sequence(&mut self, raw: &[u8]) {
        let seq = decode_packed_bcd(field(raw, TRANSMISSION_NUMBER)).parse::<u32>();
        let Ok(seq) = seq else {
            return;
        };
        match self.gaps.process(seq) {
            SequenceEvent::Gap { start, end } => {
                warn!(start, end, "transmission number gap");
                self.stats.record_gap(end - start + 1);
            }
            SequenceEvent::Replay => self.stats.record_replay(),
            SequenceEvent::First | SequenceEvent::InOrder => {}
        }
    }

    /// Decode the fields of a framed record. Stateless; no filtering.
    pub fn decode_record(raw: &[u8], strict_bcd: bool) -> DecodeResult<DecodedRecord> {
        if strict_bcd {
            check_bcd_fields(raw)?;
        }

        let header = Header {
            message_length: decode_packed_bcd(field(raw, MESSAGE_LENGTH)),
            business_code: decode_packed_bcd(field(raw, BUSINESS_CODE)),
            format_code: decode_packed_bcd(field(raw, FORMAT_CODE)),
            format_version: decode_packed_bcd(field(raw, FORMAT_VERSION)),
            transmission_number: decode_packed_bcd(field(raw, TRANSMISSION_NUMBER)),
        };

        let stock_code = decode_ascii(field(raw, STOCK_CODE)).map_err(|e| match e {
            DecodeError::Encoding { offset, byte } => DecodeError::Encoding {
                offset: STOCK_CODE.start + offset,
                byte,
            },
            other => other,
        })?;
        let matching_time = format_matching_time(field(raw, MATCHING_TIME))?;

        let reveal = RevealFlags::from_bytes(flag_field(raw, REVEAL_FLAGS))?;
        let limit = LimitFlags::from_bytes(flag_field(raw, LIMIT_FLAGS))?;
        let status = StatusFlags::from_bytes(flag_field(raw, STATUS_FLAGS))?;

        let total_volume = format_number(&decode_packed_bcd(field(raw, TOTAL_VOLUME)), None, 0)?;

        let groups = extract_groups(raw);
        let instant_quotes =
            QuoteReconstructor::reconstruct(&groups, &reveal, &limit, &status, &stock_code)?;

        Ok(DecodedRecord {
            esc_code: decode_ascii(&raw[..1])?,
            header,
            body: Body {
                stock_code,
                matching_time,
                reveal_flags: reveal,
                limit_flags: limit,
                status_flags: status,
                total_volume,
                instant_quotes,
            },
            check_code: record_checksum(raw),
            stored_check_byte: check_byte(raw),
            terminal_code: decode_hex(terminal_bytes(raw)),
        })
    }

    /// Decode one record behind a recovery boundary: failures are logged and
    /// the record dropped
    fn decode_isolated(&mut self, raw: &[u8]) -> Option<DecodedRecord> {
        match self.decode(raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, len = raw.len(), "skipping record that failed to decode");
                None
            }
        }
    }

    /// Read `reader` to exhaustion, handing decoded records to `sink` in
    /// stream order. Returns the number of records delivered.
    pub fn decode_stream<R, F>(&mut self, mut reader: R, mut sink: F) -> DecodeResult<usize>
    where
        R: Read,
        F: FnMut(DecodedRecord),
    {
        let mut reassembler = match self.max_buffer_size {
            Some(max) => Reassembler::new().with_max_buffer_size(max),
            None => Reassembler::new(),
        };
        let mut chunk = vec![0u8; self.chunk_size];
        let mut delivered = 0usize;

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            let fed = reassembler.feed(&chunk[..n], |raw| {
                if let Some(record) = self.decode_isolated(raw) {
                    sink(record);
                    delivered += 1;
                }
            });

            match fed {
                Ok(_) => {}
                Err(e) if e.is_limit() => {
                    warn!(error = %e, "discarding oversized partial record");
                    self.stats.record_oversized();
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(rest) = reassembler.finish() {
            if let Some(record) = self.decode_isolated(&rest) {
                sink(record);
                delivered += 1;
            }
        }

        Ok(delivered)
    }

    /// Decode an in-memory capture
    pub fn decode_all(&mut self, bytes: &[u8]) -> DecodeResult<Vec<DecodedRecord>> {
        let mut out = Vec::new();
        self.decode_stream(bytes, |record| out.push(record))?;
        Ok(out)
    }
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

fn check_bcd_fields(raw: &[u8]) -> DecodeResult<()> {
    check_packed_bcd(field(raw, MESSAGE_LENGTH.start..TRANSMISSION_NUMBER.end))?;
    check_packed_bcd(field(raw, MATCHING_TIME))?;
    check_packed_bcd(field(raw, TOTAL_VOLUME))?;
    for group in extract_groups(raw) {
        check_packed_bcd(group.price)?;
        check_packed_bcd(group.quantity)?;
    }
    Ok(())
}
