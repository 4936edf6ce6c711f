/// Record reassembly from an arbitrary chunked byte stream
///
/// Bytes are appended to an internal buffer and split after every terminal
/// code. A terminal code split across two `feed` calls is still found because
/// the search restarts `TERMINAL_CODE.len() - 1` bytes before the new data.
///
/// The buffer is unbounded unless a maximum is configured; a stream that never
/// contains a terminal code otherwise grows it without limit.

use crate::error::{DecodeError, DecodeResult};
use crate::protocol::TERMINAL_CODE;
use memchr::memmem;

#[derive(Debug, Clone, Default)]
pub struct Reassembler {
    buffer: Vec<u8>,
    max_buffer_size: Option<usize>,
}

impl Reassembler {
    pub fn new() -> Self {
        Reassembler {
            buffer: Vec::new(),
            max_buffer_size: None,
        }
    }

    /// Cap on bytes held while waiting for a terminal code
    pub fn with_max_buffer_size(mut self, max: usize) -> Self {
        self.max_buffer_size = Some(max);
        self
    }

    /// Append `chunk` and hand every complete record (terminal code included)
    /// to `on_record`, in stream order. Returns the number of records emitted.
    ///
    /// If the leftover partial record exceeds the configured maximum it is
    /// discarded and `FrameTooLarge` returned; records already emitted by this
    /// call are unaffected. A trailing CR is kept so that a terminal code split
    /// across the overflow still closes the discarded record.
    pub fn feed<F>(&mut self, chunk: &[u8], mut on_record: F) -> DecodeResult<usize>
    where
        F: FnMut(&[u8]),
    {
        let mut pos = self.buffer.len().saturating_sub(TERMINAL_CODE.len() - 1);
        self.buffer.extend_from_slice(chunk);

        let finder = memmem::Finder::new(&TERMINAL_CODE);
        let mut start = 0;
        let mut count = 0;

        while let Some(idx) = finder.find(&self.buffer[pos..]) {
            let end = pos + idx + TERMINAL_CODE.len();
            on_record(&self.buffer[start..end]);
            start = end;
            pos = end;
            count += 1;
        }
        self.buffer.drain(..start);

        if let Some(max) = self.max_buffer_size {
            if self.buffer.len() > max {
                let size = self.buffer.len();
                let keep = partial_terminal_len(&self.buffer);
                self.buffer.drain(..size - keep);
                return Err(DecodeError::FrameTooLarge { size, max });
            }
        }

        Ok(count)
    }

    /// Flush whatever is left once the input is exhausted, delimiter or not
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Bytes currently waiting for a terminal code
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

/// Length of the longest proper prefix of `TERMINAL_CODE` that `buffer` ends with
fn partial_terminal_len(buffer: &[u8]) -> usize {
    (1..TERMINAL_CODE.len())
        .rev()
        .find(|&k| buffer.ends_with(&TERMINAL_CODE[..k]))
        .unwrap_or(0)
}
