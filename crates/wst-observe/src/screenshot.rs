use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use wst_ipc::{IpcError, ProtocolError, RpcClient};

use crate::error::{ObserveError, Result};

#[derive(Debug, Clone)]
pub struct ScreenshotConfig {
    /// Capture program, invoked as `<command> <path>`.
    pub command: String,
    pub poll_interval: Duration,
    /// How long the capture may take before giving up.
    pub timeout: Duration,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            command: "grim".to_string(),
            poll_interval: Duration::from_millis(100),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Capture the screen to `path` and return once the capture has exited.
pub fn take_screenshot(
    client: &mut RpcClient,
    path: impl AsRef<Path>,
    config: &ScreenshotConfig,
) -> Result<()> {
    let path = path.as_ref();
    let response = client.run(&format!("{} {}", config.command, path.display()))?;
    if !response.is_ok() {
        warn!(?path, "screenshot command was not started");
        return Err(IpcError::Remote {
            method: "stipc/run".to_string(),
            message: response
                .error_message()
                .unwrap_or_else(|| "capture did not start".to_string()),
            response: response.into_value(),
        }
        .into());
    }
    let pid = response.pid().ok_or_else(|| {
        IpcError::from(ProtocolError::UnexpectedShape {
            method: "stipc/run".to_string(),
            expected: "a pid",
        })
    })?;

    debug!(pid, ?path, "waiting for capture");
    wait_for_exit(pid, config.poll_interval, config.timeout)
}

/// Poll until `pid` no longer exists.
pub fn wait_for_exit(pid: u32, poll_interval: Duration, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    while pid_exists(pid) {
        let waited = start.elapsed();
        if waited >= timeout {
            return Err(ObserveError::ProcessTimeout { pid, waited });
        }
        std::thread::sleep(poll_interval);
    }
    Ok(())
}

/// Whether a process with this pid exists, including ones we may not signal.
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    if pid <= 0 {
        return false;
    }
    // SAFETY: signal 0 performs only the existence and permission check.
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use std::process::Command;

    use serde_json::json;
    use wst_ipc::testing::{FakeCompositor, Reply};
    use wst_ipc::Request;

    use super::*;

    /// Runs `cmd` through `sh` and reports its pid, reaping it in the
    /// background like a compositor would.
    fn shell_runner(request: &Request) -> Reply {
        let Some(cmd) = request.data.get("cmd").and_then(|c| c.as_str()) else {
            return json!({"error": "missing cmd"}).into();
        };
        match Command::new("sh").arg("-c").arg(cmd).spawn() {
            Ok(mut child) => {
                let pid = child.id();
                std::thread::spawn(move || child.wait());
                json!({"result": "ok", "pid": pid}).into()
            }
            Err(err) => json!({"error": err.to_string()}).into(),
        }
    }

    fn quick() -> ScreenshotConfig {
        ScreenshotConfig {
            command: "touch".to_string(),
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn own_pid_exists() {
        assert!(pid_exists(std::process::id()));
    }

    #[test]
    fn out_of_range_pid_does_not_exist() {
        assert!(!pid_exists(u32::MAX));
        assert!(!pid_exists(0));
    }

    #[test]
    fn wait_for_reaped_child() {
        let mut child = Command::new("sleep").arg("0.1").spawn().unwrap();
        let pid = child.id();
        let reaper = std::thread::spawn(move || child.wait());

        wait_for_exit(pid, Duration::from_millis(10), Duration::from_secs(10)).unwrap();
        assert!(!pid_exists(pid));
        reaper.join().unwrap().unwrap();
    }

    #[test]
    fn wait_times_out_on_live_process() {
        let err = wait_for_exit(
            std::process::id(),
            Duration::from_millis(5),
            Duration::from_millis(20),
        )
        .unwrap_err();
        assert!(matches!(err, ObserveError::ProcessTimeout { .. }));
    }

    #[test]
    fn screenshot_runs_capture_and_waits() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("shot.png");
        let server = FakeCompositor::start(shell_runner).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        take_screenshot(&mut client, &target, &quick()).unwrap();
        assert!(target.exists());
        assert_eq!(server.methods(), vec!["stipc/run"]);
    }

    #[test]
    fn rejected_capture_is_an_error() {
        let server =
            FakeCompositor::start(|_: &Request| json!({"error": "grim not found"}).into()).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        let err = take_screenshot(&mut client, "/tmp/unused.png", &quick()).unwrap_err();
        match err {
            ObserveError::Ipc(IpcError::Remote { message, .. }) => {
                assert_eq!(message, "grim not found")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn reply_without_pid_is_a_protocol_error() {
        let server =
            FakeCompositor::start(|_: &Request| json!({"result": "ok"}).into()).unwrap();
        let mut client = wst_ipc::connect(server.socket_path()).unwrap();

        let err = take_screenshot(&mut client, "/tmp/unused.png", &quick()).unwrap_err();
        assert!(matches!(
            err,
            ObserveError::Ipc(IpcError::Protocol(ProtocolError::UnexpectedShape { .. }))
        ));
    }
}
