//! Local stream transport for the compositor control socket.
//!
//! This is the lowest layer of wst. It connects to (or, for fake
//! compositors in tests, binds) a Unix domain socket and exposes the
//! connected [`IpcStream`] together with [`WaitReadable`], the bounded
//! readiness wait the framing layer is built on.

pub mod error;
pub mod traits;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use traits::{IpcStream, WaitReadable};

#[cfg(unix)]
pub use uds::UnixDomainSocket;
