use std::fmt;
use std::io;

use wst_frame::FrameError;
use wst_ipc::IpcError;
use wst_observe::ObserveError;
use wst_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const IMAGES_DIFFER: i32 = 2;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::NotFound => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    if err.is_missing_socket() {
        return CliError::new(
            TRANSPORT_ERROR,
            format!("{context}: {err} (is the compositor running with the test plugin?)"),
        );
    }
    match err {
        TransportError::Bind { ref source, .. } | TransportError::Connect { ref source, .. }
            if source.kind() == io::ErrorKind::PermissionDenied =>
        {
            CliError::new(PERMISSION_DENIED, format!("{context}: {err}"))
        }
        TransportError::Accept(source) | TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::Timeout { .. } | FrameError::WriteTimeout { .. } => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
        FrameError::ConnectionClosed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
    }
}

pub fn ipc_error(context: &str, err: IpcError) -> CliError {
    match err {
        IpcError::Transport(err) => transport_error(context, err),
        IpcError::Frame(err) => frame_error(context, err),
        IpcError::Protocol(err) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        IpcError::Remote { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn observe_error(context: &str, err: ObserveError) -> CliError {
    match err {
        ObserveError::Ipc(err) => ipc_error(context, err),
        ObserveError::Io(source) => io_error(context, source),
        ObserveError::ImageDecode { .. }
        | ObserveError::ImageEncode { .. }
        | ObserveError::UnsupportedChannels(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ObserveError::ProcessTimeout { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
        ObserveError::UnexpectedLogLine { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}
