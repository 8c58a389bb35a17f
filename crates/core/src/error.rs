//! Core error types for the Bancho gateway

#[derive(thiserror::Error, Debug)]
pub enum BanchoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame length mismatch: expected {expected} bytes, got {actual}")]
    FrameLengthMismatch { expected: usize, actual: usize },

    #[error("Payload too large: {length} bytes (max {max})")]
    PayloadTooLarge { length: usize, max: usize },

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Failed to decode {packet}: {reason}")]
    Decode { packet: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl BanchoError {
    /// Wrap a field-level failure as a decode error for the given packet
    pub fn decode(packet: impl Into<String>, source: BanchoError) -> Self {
        Self::Decode {
            packet: packet.into(),
            reason: source.to_string(),
        }
    }

    /// Whether the error was caused by the stream ending early
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }
}

pub type Result<T> = std::result::Result<T, BanchoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wraps_reason() {
        let inner = BanchoError::InvalidData("bad string marker 0x07".into());
        let err = BanchoError::decode("OsuSendUserStatus", inner);

        assert_eq!(
            err.to_string(),
            "Failed to decode OsuSendUserStatus: Invalid data: bad string marker 0x07"
        );
    }

    #[test]
    fn test_is_eof() {
        let eof = BanchoError::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short"));
        let other = BanchoError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"));

        assert!(eof.is_eof());
        assert!(!other.is_eof());
        assert!(!BanchoError::Config("x".into()).is_eof());
    }
}
