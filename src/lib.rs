/// TP03 Feed - Format 6 quote capture decoder
///
/// Decodes back-to-back Format 6 (TP03) market-data records into structured
/// values. Features include:
/// - Stream reassembly on the CR LF terminal code, across arbitrary chunking
/// - Packed BCD, ASCII and bitmap field decoding
/// - Instant quote reconstruction (trade, best five bids/asks)
/// - Raw-byte skip filters applied before field decode
/// - Per-record error isolation, statistics and transmission gap detection

pub mod protocol;
pub mod error;
pub mod fields;
pub mod flags;
pub mod checksum;
pub mod filter;
pub mod quotes;
pub mod reassembler;
pub mod record;
pub mod config;
pub mod decoder;
pub mod gap_detector;
pub mod stats;

pub use error::{DecodeError, DecodeResult};
pub use fields::{decode_ascii, decode_hex, decode_packed_bcd, format_matching_time, format_number};
pub use flags::{LimitFlags, LimitState, MatchingMethod, PriceTrend, RevealFlags, StatusFlags, TrialMark};
pub use checksum::{record_checksum, xor_checksum};
pub use filter::{FilterMode, SkipCondition, SkipFilter};
pub use quotes::{extract_groups, InstantQuotes, PriceQty, QuoteGroup, QuoteReconstructor};
pub use reassembler::Reassembler;
pub use record::{Body, DecodedRecord, Header};
pub use config::{ConfigError, DecoderConfig};
pub use decoder::{is_framed, RecordDecoder};
pub use gap_detector::{GapDetector, SequenceEvent};
pub use stats::{FeedStats, LatencyStats};
