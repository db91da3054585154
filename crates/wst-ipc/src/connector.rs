use std::path::Path;

use tracing::info;
#[cfg(unix)]
use wst_transport::UnixDomainSocket;

use crate::client::{ClientConfig, RpcClient};
use crate::error::Result;

/// Connect to the compositor's control socket with default configuration.
pub fn connect(path: impl AsRef<Path>) -> Result<RpcClient> {
    connect_with_config(path, ClientConfig::default())
}

/// Connect with explicit configuration.
pub fn connect_with_config(path: impl AsRef<Path>, config: ClientConfig) -> Result<RpcClient> {
    #[cfg(not(unix))]
    {
        let _ = config;
        return Err(wst_transport::TransportError::Connect {
            path: path.as_ref().to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "the compositor control socket is a Unix domain socket",
            ),
        }
        .into());
    }

    #[cfg(unix)]
    {
        let path = path.as_ref();
        let stream = UnixDomainSocket::connect(path)?;
        let client = RpcClient::from_stream(stream, config)?;
        info!(?path, server_pid = ?client.server_pid(), "control channel open");
        Ok(client)
    }
}
