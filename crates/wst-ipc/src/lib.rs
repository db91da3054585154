//! Request/response client for the compositor control socket.
//!
//! Requests are `{"method": "<namespace>/<action>", "data": {...}}` JSON
//! objects, one per frame; the compositor answers each with exactly one JSON
//! frame. [`RpcClient::call`] retries a failed request once under the
//! fallback namespace (`core`) before reporting the first failure.

pub mod client;
pub mod connector;
pub mod error;
pub mod keys;
pub mod message;
pub mod ops;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod views;

pub use client::{ClientConfig, RpcClient, DEFAULT_FALLBACK_NAMESPACE, TEST_NAMESPACE};
pub use connector::{connect, connect_with_config};
pub use error::{IpcError, ProtocolError, Result};
pub use keys::{chord_sequence, ButtonMode, KeyTransition};
pub use message::{Request, Response};
pub use views::{Geometry, ViewInfo, ViewLayout, ViewQuery};
