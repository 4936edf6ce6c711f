/// Feed statistics tracking
///
/// Counts what happened to every raw record (decoded, dropped by framing,
/// skipped by the filter, failed) plus decode latency and sequence gaps.
/// Framing drops are silent in the decode path; these counters are the only
/// place they show up.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::info;

const WINDOW_SIZE: usize = 10000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyStats {
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
    pub p50_ns: u64,
    pub p99_ns: u64,
}

#[derive(Debug, Clone)]
pub struct FeedStats {
    start_time: Option<Instant>,
    total_records: u64,
    total_bytes: u64,

    decoded: u64,
    framing_rejects: u64,
    skipped: u64,
    failed: u64,
    oversized: u64,

    // Decode latencies (in nanoseconds)
    decode_latencies: VecDeque<u64>,

    total_gaps: u32,
    gap_events: u32,
    replays: u32,
}

impl FeedStats {
    pub fn new() -> Self {
        FeedStats {
            start_time: None,
            total_records: 0,
            total_bytes: 0,
            decoded: 0,
            framing_rejects: 0,
            skipped: 0,
            failed: 0,
            oversized: 0,
            decode_latencies: VecDeque::with_capacity(WINDOW_SIZE),
            total_gaps: 0,
            gap_events: 0,
            replays: 0,
        }
    }

    /// Record a raw record handed over by the reassembler
    pub fn record_raw(&mut self, size: usize) {
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        self.total_records += 1;
        self.total_bytes += size as u64;
    }

    pub fn record_decoded(&mut self) {
        self.decoded += 1;
    }

    pub fn record_framing_reject(&mut self) {
        self.framing_rejects += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_oversized(&mut self) {
        self.oversized += 1;
    }

    /// Record decode latency in nanoseconds
    pub fn record_decode_latency(&mut self, nanos: u64) {
        if self.decode_latencies.len() >= WINDOW_SIZE {
            self.decode_latencies.pop_front();
        }
        self.decode_latencies.push_back(nanos);
    }

    pub fn record_gap(&mut self, gap_size: u32) {
        self.total_gaps = self.total_gaps.saturating_add(gap_size);
        self.gap_events += 1;
    }

    pub fn record_replay(&mut self) {
        self.replays += 1;
    }

    pub fn records_per_sec(&self) -> f64 {
        self.rate(self.total_records)
    }

    pub fn bytes_per_sec(&self) -> f64 {
        self.rate(self.total_bytes)
    }

    fn rate(&self, count: u64) -> f64 {
        match self.start_time {
            None => 0.0,
            Some(start) => {
                let elapsed = start.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    count as f64 / elapsed
                } else {
                    0.0
                }
            }
        }
    }

    pub fn decode_latency_stats(&self) -> Option<LatencyStats> {
        if self.decode_latencies.is_empty() {
            return None;
        }

        let mut sorted: Vec<u64> = self.decode_latencies.iter().copied().collect();
        sorted.sort_unstable();

        let mean = sorted.iter().sum::<u64>() as f64 / sorted.len() as f64;

        Some(LatencyStats {
            min_ns: sorted[0],
            max_ns: sorted[sorted.len() - 1],
            mean_ns: mean,
            p50_ns: sorted[sorted.len() / 2],
            p99_ns: sorted[(sorted.len() * 99) / 100],
        })
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|st| st.elapsed())
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    pub fn framing_rejects(&self) -> u64 {
        self.framing_rejects
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn oversized(&self) -> u64 {
        self.oversized
    }

    pub fn total_gaps(&self) -> u32 {
        self.total_gaps
    }

    pub fn gap_events(&self) -> u32 {
        self.gap_events
    }

    pub fn replays(&self) -> u32 {
        self.replays
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Emit a summary through `tracing`
    pub fn log_summary(&self) {
        info!(
            records = self.total_records,
            bytes = self.total_bytes,
            decoded = self.decoded,
            framing_rejects = self.framing_rejects,
            skipped = self.skipped,
            failed = self.failed,
            oversized = self.oversized,
            "feed summary"
        );
        info!(
            records_per_sec = self.records_per_sec(),
            bytes_per_sec = self.bytes_per_sec(),
            elapsed = ?self.elapsed(),
            "throughput"
        );

        if let Some(stats) = self.decode_latency_stats() {
            info!(
                min_ns = stats.min_ns,
                max_ns = stats.max_ns,
                mean_ns = stats.mean_ns,
                p50_ns = stats.p50_ns,
                p99_ns = stats.p99_ns,
                "decode latency"
            );
        }

        info!(
            total = self.total_gaps,
            events = self.gap_events,
            replays = self.replays,
            "transmission gaps"
        );
    }
}

impl Default for FeedStats {
    fn default() -> Self {
        Self::new()
    }
}
