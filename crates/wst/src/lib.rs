//! Client-side core of a test harness for a Wayland compositor.
//!
//! A test scenario connects to the compositor's control socket, injects
//! input, then checks what the test clients logged and what ended up on
//! screen.
//!
//! # Crate Structure
//!
//! - [`transport`]: Unix domain socket plumbing with bounded read waits
//! - [`frame`]: 4-byte length-prefixed framing over a byte stream
//! - [`ipc`]: JSON request/response client with namespace fallback
//! - [`observe`]: log tailing, screenshots and image comparison

/// Re-export transport types.
pub mod transport {
    pub use wst_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use wst_frame::*;
}

/// Re-export control client types.
pub mod ipc {
    pub use wst_ipc::*;
}

/// Re-export observation types.
pub mod observe {
    pub use wst_observe::*;
}

pub use wst_ipc::{connect, connect_with_config, ClientConfig, IpcError, Request, Response, RpcClient};
pub use wst_observe::{compare_images, ImageDiff, LogTail, LoggedProcess, ObserveError};
