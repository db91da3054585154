//! Stand-in compositor for tests.
//!
//! [`FakeCompositor`] binds a control socket in a scratch directory and
//! answers every request through a caller-supplied handler, recording what
//! it received.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;
use wst_frame::{encode_header, FrameConfig, FrameReader, FrameWriter};
use wst_transport::{IpcStream, UnixDomainSocket};

use crate::message::Request;

/// What the fake compositor does with one request.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Answer with this JSON value.
    Json(Value),
    /// Answer with an arbitrary framed payload.
    Raw(Vec<u8>),
    /// Send a header declaring `declared` bytes, then only `body`.
    Truncated { declared: u32, body: Vec<u8> },
    /// Do not answer.
    Silence,
    /// Close the connection.
    Hangup,
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

/// Answers `core/*` requests with `{"result": "ok"}` and rejects the rest.
pub fn core_only(request: &Request) -> Reply {
    if request.namespace() == Some("core") {
        json!({"result": "ok"}).into()
    } else {
        json!({"error": "No such method found!"}).into()
    }
}

/// Answers every request with `{"result": "ok"}`.
pub fn always_ok(_request: &Request) -> Reply {
    json!({"result": "ok"}).into()
}

pub struct FakeCompositor {
    dir: PathBuf,
    socket_path: PathBuf,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl FakeCompositor {
    /// Bind a fresh socket and serve connections on a background thread.
    pub fn start<F>(handler: F) -> std::io::Result<Self>
    where
        F: FnMut(&Request) -> Reply + Send + 'static,
    {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "wst-fake-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::create_dir_all(&dir)?;
        let socket_path = dir.join("stipc.sock");

        let listener = UnixDomainSocket::bind(&socket_path).map_err(std::io::Error::other)?;
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        std::thread::spawn(move || {
            let mut handler = handler;
            while let Ok(stream) = listener.accept() {
                serve(stream, &mut handler, &recorded);
            }
        });

        Ok(Self {
            dir,
            socket_path,
            requests,
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// The methods of every request received so far.
    pub fn methods(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.method).collect()
    }
}

impl Drop for FakeCompositor {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn serve<F>(stream: IpcStream, handler: &mut F, recorded: &Mutex<Vec<Request>>)
where
    F: FnMut(&Request) -> Reply,
{
    let config = FrameConfig {
        read_timeout: Duration::from_secs(30),
        ..FrameConfig::default()
    };
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = FrameReader::with_config(read_half, config.clone());
    let mut writer = FrameWriter::with_config(stream, config);

    while let Ok(payload) = reader.read_frame() {
        let reply = match serde_json::from_slice::<Request>(&payload) {
            Ok(request) => {
                let reply = handler(&request);
                if let Ok(mut log) = recorded.lock() {
                    log.push(request);
                }
                reply
            }
            Err(err) => json!({"error": format!("malformed request: {err}")}).into(),
        };

        let sent = match reply {
            Reply::Json(value) => writer.send(value.to_string().as_bytes()),
            Reply::Raw(bytes) => writer.send(&bytes),
            Reply::Truncated { declared, body } => {
                use std::io::Write;
                let stream = writer.get_ref();
                let mut stream = match stream.try_clone() {
                    Ok(s) => s,
                    Err(_) => return,
                };
                let header = encode_header(declared as usize).unwrap_or_default();
                stream
                    .write_all(&header)
                    .and_then(|()| stream.write_all(&body))
                    .map_err(Into::into)
            }
            Reply::Silence => Ok(()),
            Reply::Hangup => {
                debug!("fake compositor hanging up");
                let _ = writer.get_ref().shutdown();
                return;
            }
        };
        if sent.is_err() {
            return;
        }
    }
}
