use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while observing compositor output.
#[derive(Debug, thiserror::Error)]
pub enum ObserveError {
    /// A log expectation did not hold.
    #[error("{process} expected {expected}, got: {actual}")]
    UnexpectedLogLine {
        process: String,
        expected: String,
        actual: String,
    },

    /// A raster file could not be read or decoded.
    #[error("failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A raster file could not be written.
    #[error("failed to write image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The image has a channel layout we cannot compare.
    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),

    /// A spawned process did not exit in time.
    #[error("process {pid} still running after {waited:?}")]
    ProcessTimeout { pid: u32, waited: Duration },

    /// Control channel failure.
    #[error(transparent)]
    Ipc(#[from] wst_ipc::IpcError),

    /// Filesystem I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ObserveError>;
