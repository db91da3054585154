use serde_json::{Map, Value};
use tracing::{debug, warn};
use wst_frame::{FrameConfig, FrameError, FrameReader, FrameWriter};
use wst_transport::IpcStream;

use crate::error::{IpcError, ProtocolError, Result};
use crate::message::{Request, Response};

/// Namespace the compositor's test plugin registers its methods under.
pub const TEST_NAMESPACE: &str = "stipc";

/// Namespace a failed request is retried under.
pub const DEFAULT_FALLBACK_NAMESPACE: &str = "core";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Framing limits and the per-wait read timeout.
    pub frame: FrameConfig,
    /// Namespace tried once when a request comes back with an error.
    pub fallback_namespace: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            fallback_namespace: DEFAULT_FALLBACK_NAMESPACE.to_string(),
        }
    }
}

/// Synchronous request/response client over one control connection.
///
/// Strictly half-duplex: every call writes one request and reads its one
/// response before returning. Calls take `&mut self`; callers that share a
/// client across threads serialize access themselves.
pub struct RpcClient {
    reader: FrameReader<IpcStream>,
    writer: FrameWriter<IpcStream>,
    config: ClientConfig,
}

impl RpcClient {
    /// Wrap an already connected stream.
    pub fn from_stream(stream: IpcStream, config: ClientConfig) -> Result<Self> {
        let read_half = stream.try_clone()?;
        let reader = FrameReader::with_config(read_half, config.frame.clone());
        let writer = FrameWriter::with_config_ipc(stream, config.frame.clone())?;
        Ok(Self {
            reader,
            writer,
            config,
        })
    }

    /// Call `method` with `data`, retrying once under the fallback namespace.
    pub fn call(&mut self, method: &str, data: Map<String, Value>) -> Result<Response> {
        self.send(Request::with_data(method, data))
    }

    /// Send a prepared request, retrying once under the fallback namespace.
    ///
    /// When the first response is an error, the same data is sent again
    /// with the method's namespace replaced. The fallback's response is
    /// returned only if it succeeds; otherwise the first error is returned.
    pub fn send(&mut self, request: Request) -> Result<Response> {
        debug!(method = %request.method, "calling compositor");
        let first = self.exchange(&request)?;
        if !first.is_error() {
            return Ok(first);
        }

        let fallback = request.with_namespace(&self.config.fallback_namespace);

        warn!(
            method = %request.method,
            fallback = %fallback.method,
            error = first.error_message().unwrap_or_default(),
            "request failed, retrying under fallback namespace"
        );
        let second = self.exchange(&fallback)?;
        if second.is_error() {
            debug!(method = %fallback.method, "fallback failed as well");
            return Ok(first);
        }
        Ok(second)
    }

    /// Like [`send`](Self::send), but an error response becomes
    /// [`IpcError::Remote`].
    pub fn send_checked(&mut self, request: Request) -> Result<Response> {
        let method = request.method.clone();
        let response = self.send(request)?;
        match response.error_message() {
            Some(message) if response.is_error() => Err(IpcError::Remote {
                method,
                message,
                response: response.into_value(),
            }),
            _ => Ok(response),
        }
    }

    /// Like [`call`](Self::call), but an error response becomes
    /// [`IpcError::Remote`].
    pub fn call_checked(&mut self, method: &str, data: Map<String, Value>) -> Result<Response> {
        self.send_checked(Request::with_data(method, data))
    }

    fn exchange(&mut self, request: &Request) -> Result<Response> {
        let payload = serde_json::to_vec(request).map_err(ProtocolError::Encode)?;
        self.writer.send(&payload)?;

        let declared = self.reader.read_header()?;
        let body = match self.reader.recv_exact(declared) {
            Ok(body) => body,
            Err(FrameError::Timeout { received, .. }) => {
                return Err(ProtocolError::Truncated { declared, received }.into());
            }
            Err(err) => return Err(err.into()),
        };

        let value: Value = serde_json::from_slice(&body).map_err(ProtocolError::InvalidJson)?;
        Ok(Response::from(value))
    }

    /// Process id of the compositor on the other end, if the platform says.
    pub fn server_pid(&self) -> Option<u32> {
        self.writer
            .get_ref()
            .peer_credentials()
            .map(|(_, _, pid)| pid)
    }

    /// A handle that can close this connection from another thread.
    pub fn shutdown_handle(&self) -> Result<ShutdownHandle> {
        Ok(ShutdownHandle {
            stream: self.writer.get_ref().try_clone()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Closes a client's connection; an in-flight call fails with
/// `ConnectionClosed`.
pub struct ShutdownHandle {
    stream: IpcStream,
}

impl ShutdownHandle {
    pub fn close(&self) -> Result<()> {
        self.stream.shutdown().map_err(Into::into)
    }
}
