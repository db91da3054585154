use std::time::Duration;

/// Errors that can occur while moving frames over the control channel.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// No data became readable within one wait window.
    #[error("timed out after {waited:?} ({received} of {expected} bytes received)")]
    Timeout {
        waited: Duration,
        received: usize,
        expected: usize,
    },

    /// The stream stayed unwritable past the configured write timeout.
    #[error("write timed out after {waited:?} ({written} of {expected} bytes written)")]
    WriteTimeout {
        waited: Duration,
        written: usize,
        expected: usize,
    },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the connection before the declared length arrived.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
