#![cfg(all(unix, feature = "cli"))]

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use wst::observe::Raster;
use wst_ipc::testing::{core_only, FakeCompositor};
use wst_ipc::Request;

fn wst(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wst"))
        .env_remove("WAYFIRE_SOCKET")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("wst should run")
}

fn wst_at(socket: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wst"))
        .env("WAYFIRE_SOCKET", socket)
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("wst should run")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

fn solid(path: &Path, width: u32, value: u8) {
    Raster::from_samples(width, 2, 3, vec![value; width as usize * 2 * 3])
        .unwrap()
        .save(path)
        .unwrap();
}

#[test]
fn version_reports_package_version() {
    let output = wst(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("wst {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_lists_protocol_defaults() {
    let output = wst(&["version", "--extended"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|line| line == "fallback_namespace: core"));
    assert!(stdout.lines().any(|line| line == format!("max_payload: {}", 16 * 1024 * 1024)));
    assert!(stdout.lines().any(|line| line.starts_with("target: ")));
}

#[test]
fn ping_through_fallback_namespace() {
    let server = FakeCompositor::start(core_only).unwrap();
    let output = wst_at(server.socket_path(), &["ping"]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["ok"], json!(true));
    assert_eq!(server.methods(), vec!["stipc/ping", "core/ping"]);
}

#[test]
fn ping_without_socket_is_usage_error() {
    let output = wst(&["ping"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn ping_missing_socket_is_transport_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = wst_at(&dir.path().join("absent.sock"), &["ping"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn views_filtered_by_app_id() {
    let server = FakeCompositor::start(|request: &Request| {
        if request.method.ends_with("list_views") {
            json!([
                {"id": 1, "title": "Terminal", "app-id": "weston-terminal"},
                {"id": 2, "title": "Untitled", "app-id": "gedit"}
            ])
            .into()
        } else {
            json!({"error": "No such method found!"}).into()
        }
    })
    .unwrap();

    let output = wst_at(server.socket_path(), &["views", "--app-id", "gedit"]);
    assert!(output.status.success());
    let views = stdout_json(&output);
    assert_eq!(views.as_array().map(Vec::len), Some(1));
    assert_eq!(views[0]["id"], json!(2));
}

#[test]
fn checked_call_with_error_response_fails() {
    let server = FakeCompositor::start(|_: &Request| json!({"error": "bad key"}).into()).unwrap();

    let output = wst_at(
        server.socket_path(),
        &["call", "stipc/feed_key", "--json", r#"{"key":"KEY_NOPE","state":true}"#, "--checked"],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad key"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].method, "core/feed_key");
    assert_eq!(requests[1].data, requests[0].data);
}

#[test]
fn press_key_sends_chord() {
    let server = FakeCompositor::start(|_: &Request| json!({"result": "ok"}).into()).unwrap();
    let output = wst_at(server.socket_path(), &["press-key", "S-KEY_E"]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["transitions"], json!(4));
    assert_eq!(server.methods().len(), 4);
}

#[test]
fn compare_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let (a, b, wide, diff) = (
        dir.path().join("a.png"),
        dir.path().join("b.png"),
        dir.path().join("wide.png"),
        dir.path().join("diff.png"),
    );
    solid(&a, 2, 10);
    solid(&b, 2, 40);
    solid(&wide, 3, 10);
    let diff_arg = diff.to_str().unwrap();

    let same = wst(&["--format", "json", "compare", a.to_str().unwrap(), a.to_str().unwrap(), "--diff", diff_arg]);
    assert_eq!(same.status.code(), Some(0));
    assert_eq!(stdout_json(&same)["outcome"], json!("same"));
    assert!(!diff.exists());

    let mismatch = wst(&["compare", a.to_str().unwrap(), wide.to_str().unwrap(), "--diff", diff_arg]);
    assert_eq!(mismatch.status.code(), Some(60));
    assert!(!diff.exists());

    let different = wst(&[
        "--format",
        "json",
        "compare",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--diff",
        diff_arg,
        "--sensitivity",
        "0.1",
    ]);
    assert_eq!(different.status.code(), Some(2));
    assert_eq!(stdout_json(&different)["outcome"], json!("different"));
    let written = Raster::open(&diff).unwrap();
    assert!(written.samples().iter().all(|&s| s == 30));
}

#[test]
fn compare_unreadable_image_is_data_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let junk = dir.path().join("junk.png");
    std::fs::write(&junk, b"junk").unwrap();
    let junk = junk.to_str().unwrap();

    let output = wst(&["compare", junk, junk]);
    assert_eq!(output.status.code(), Some(60));
}
