/// Malformed traffic on an otherwise healthy connection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response payload is not well-formed JSON.
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The header announced more bytes than arrived before the read timed out.
    #[error("response truncated: header declared {declared} bytes, {received} arrived")]
    Truncated { declared: usize, received: usize },

    /// The response parsed but does not have the shape the operation needs.
    #[error("unexpected response to {method}: expected {expected}")]
    UnexpectedShape {
        method: String,
        expected: &'static str,
    },
}

/// Errors that can occur while talking to the compositor.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] wst_transport::TransportError),

    /// Frame-level error (timeout, closed connection, oversized frame).
    #[error("frame error: {0}")]
    Frame(#[from] wst_frame::FrameError),

    /// Protocol-level error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The compositor answered with an `"error"` response, after the
    /// fallback namespace failed as well.
    #[error("{method} failed: {message}")]
    Remote {
        method: String,
        message: String,
        response: serde_json::Value,
    },
}

impl IpcError {
    /// Whether this error came from the bounded read wait or the write
    /// timeout expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            IpcError::Frame(
                wst_frame::FrameError::Timeout { .. } | wst_frame::FrameError::WriteTimeout { .. }
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, IpcError>;
