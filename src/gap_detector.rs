/// Transmission number gap detection
///
/// Every framed record carries a transmission number that increases by one
/// per record within a format. Gaps mean records were lost upstream; a number
/// at or below the last one seen is a replay (retransmission or file splice).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceEvent {
    First,
    InOrder,
    /// Missing numbers, inclusive
    Gap { start: u32, end: u32 },
    Replay,
}

#[derive(Debug, Clone, Default)]
pub struct GapDetector {
    last_sequence: Option<u32>,
    gaps: Vec<(u32, u32)>,
    total_gap_count: u32,
    replays: u32,
}

impl GapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a transmission number; gaps and replays are recorded
    pub fn process(&mut self, seq_num: u32) -> SequenceEvent {
        let event = match self.last_sequence {
            None => SequenceEvent::First,
            Some(last) if seq_num <= last => {
                self.replays += 1;
                return SequenceEvent::Replay;
            }
            Some(last) if seq_num == last + 1 => SequenceEvent::InOrder,
            Some(last) => {
                let (start, end) = (last + 1, seq_num - 1);
                self.gaps.push((start, end));
                self.total_gap_count = self.total_gap_count.saturating_add(end - start + 1);
                SequenceEvent::Gap { start, end }
            }
        };
        self.last_sequence = Some(seq_num);
        event
    }

    /// All detected gaps as (start, end) tuples (inclusive)
    pub fn gaps(&self) -> &[(u32, u32)] {
        &self.gaps
    }

    /// Total number of missing transmission numbers
    pub fn total_gaps(&self) -> u32 {
        self.total_gap_count
    }

    pub fn gap_count(&self) -> usize {
        self.gaps.len()
    }

    pub fn replays(&self) -> u32 {
        self.replays
    }

    pub fn last_sequence(&self) -> Option<u32> {
        self.last_sequence
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
