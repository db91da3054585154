use std::fs::{self, OpenOptions};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;
use wst_ipc::RpcClient;

use crate::error::Result;
use crate::logtail::LogTail;

/// Directory under which each spawned client gets its own log directory.
pub const DEFAULT_LOG_ROOT: &str = "/tmp/wst";

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_root: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_root: PathBuf::from(DEFAULT_LOG_ROOT),
        }
    }
}

/// A test client started through the compositor, with its output captured
/// in a file that is tailed as it runs.
///
/// The client is invoked as `<cmd> <app_id> <log file> [extra]` and is
/// expected to append one line per event it observes. Dereferences to
/// the [`LogTail`] over that file.
#[derive(Debug)]
pub struct LoggedProcess {
    pid: u32,
    app_id: String,
    dir: PathBuf,
    tail: LogTail,
}

impl LoggedProcess {
    pub fn spawn(client: &mut RpcClient, cmd: &str, app_id: &str, extra_arg: &str) -> Result<Self> {
        Self::spawn_with_config(client, cmd, app_id, extra_arg, &LogConfig::default())
    }

    pub fn spawn_with_config(
        client: &mut RpcClient,
        cmd: &str,
        app_id: &str,
        extra_arg: &str,
        config: &LogConfig,
    ) -> Result<Self> {
        let dir = config.log_root.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&dir)?;

        // Create the log before the client starts so nothing it writes is
        // missed by the tail.
        let log_path = dir.join(app_id);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let mut command = format!("{cmd} {app_id} {}", log_path.display());
        if !extra_arg.is_empty() {
            command.push(' ');
            command.push_str(extra_arg);
        }
        let pid = client.spawn(&command)?;
        let tail = LogTail::open(&log_path, app_id)?;
        info!(pid, app_id, log = ?log_path, "client started with captured output");

        Ok(Self {
            pid,
            app_id: app_id.to_string(),
            dir,
            tail,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// The directory holding this client's log.
    pub fn log_dir(&self) -> &Path {
        &self.dir
    }

    pub fn log_path(&self) -> &Path {
        self.tail.path()
    }

    /// Remove the log directory. Logs are kept by default for inspection
    /// after a failed run.
    pub fn remove_logs(self) -> Result<()> {
        fs::remove_dir_all(&self.dir)?;
        Ok(())
    }
}

impl Deref for LoggedProcess {
    type Target = LogTail;

    fn deref(&self) -> &LogTail {
        &self.tail
    }
}

impl DerefMut for LoggedProcess {
    fn deref_mut(&mut self) -> &mut LogTail {
        &mut self.tail
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;

    use serde_json::json;
    use wst_ipc::testing::{FakeCompositor, Reply};

    use super::*;

    fn pid_reply(request: &wst_ipc::Request) -> Reply {
        if request.method.ends_with("/run") {
            json!({"result": "ok", "pid": 4242}).into()
        } else {
            json!({"result": "ok"}).into()
        }
    }

    #[test]
    fn spawn_builds_command_and_tails_log() {
        let root = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_root: root.path().to_path_buf(),
        };
        let server = FakeCompositor::start(pid_reply).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        let mut process =
            LoggedProcess::spawn_with_config(&mut client, "wst-client", "gtk-keyboard", "--x11", &config)
                .unwrap();
        assert_eq!(process.pid(), 4242);
        assert_eq!(process.app_id(), "gtk-keyboard");
        assert!(process.log_dir().starts_with(root.path()));
        assert_eq!(process.log_path(), process.log_dir().join("gtk-keyboard"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].data.get("cmd"),
            Some(&json!(format!(
                "wst-client gtk-keyboard {} --x11",
                process.log_path().display()
            )))
        );

        assert!(process.expect_none().unwrap());
        let mut log = OpenOptions::new()
            .append(true)
            .open(process.log_path())
            .unwrap();
        writeln!(log, "keyboard-enter").unwrap();
        process.expect_line_or_fail("keyboard-enter").unwrap();
        assert_eq!(process.label(), "gtk-keyboard");
    }

    #[test]
    fn empty_extra_arg_is_omitted() {
        let root = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_root: root.path().to_path_buf(),
        };
        let server = FakeCompositor::start(pid_reply).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        let process =
            LoggedProcess::spawn_with_config(&mut client, "wst-client", "xterm", "", &config).unwrap();
        let cmd = server.requests()[0].data["cmd"].as_str().unwrap().to_string();
        assert_eq!(cmd, format!("wst-client xterm {}", process.log_path().display()));

        let dir = process.log_dir().to_path_buf();
        process.remove_logs().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn rejected_spawn_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let config = LogConfig {
            log_root: root.path().to_path_buf(),
        };
        let server =
            FakeCompositor::start(|_: &wst_ipc::Request| json!({"error": "spawn failed"}).into()).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        let err = LoggedProcess::spawn_with_config(&mut client, "missing", "app", "", &config)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::ObserveError::Ipc(wst_ipc::IpcError::Remote { .. })
        ));
    }

    #[test]
    fn default_log_root() {
        assert_eq!(LogConfig::default().log_root, PathBuf::from("/tmp/wst"));
    }
}
