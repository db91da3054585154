use std::path::PathBuf;

/// Errors on the compositor control socket.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The control socket could not be bound (test servers only).
    #[error("cannot bind control socket {path}: {source}")]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The compositor is not reachable at `path`.
    #[error("cannot reach compositor at {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot accept control connection: {0}")]
    Accept(std::io::Error),

    #[error("control socket I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `sun_path` cannot hold the socket path.
    #[error("control socket path is {len} bytes, limit is {max}: {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },
}

impl TransportError {
    /// Whether the socket file does not exist, i.e. no compositor is
    /// listening at that path.
    pub fn is_missing_socket(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
