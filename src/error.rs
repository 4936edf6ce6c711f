use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("non-ASCII byte 0x{byte:02X} at offset {offset}")]
    Encoding { offset: usize, byte: u8 },

    #[error("flag field '{field}' must be exactly 1 byte, got {len}")]
    Validation { field: &'static str, len: usize },

    #[error("digit string too short: need {need} digits, have {have}")]
    Format { need: usize, have: usize },

    #[error("invalid packed BCD byte 0x{byte:02X}")]
    InvalidBcd { byte: u8 },

    #[error("frame too large: buffered {size} bytes without a terminal code (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err.to_string())
    }
}

impl DecodeError {
    /// Errors confined to a single record; the stream can continue past them
    #[inline]
    pub fn is_field_error(&self) -> bool {
        matches!(
            self,
            DecodeError::Encoding { .. }
                | DecodeError::Validation { .. }
                | DecodeError::Format { .. }
                | DecodeError::InvalidBcd { .. }
        )
    }

    #[inline]
    pub fn is_limit(&self) -> bool {
        matches!(self, DecodeError::FrameTooLarge { .. })
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
