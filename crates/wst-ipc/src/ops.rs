//! Typed wrappers for the compositor's test methods.
//!
//! Each wrapper is one `(method, data)` pair sent through
//! [`RpcClient::send`], so every one of them gets the namespace fallback.

use serde_json::{Map, Value};
use tracing::debug;

use crate::client::RpcClient;
use crate::error::{IpcError, ProtocolError, Result};
use crate::keys::{chord_sequence, ButtonMode};
use crate::message::{Request, Response};
use crate::views::{ViewInfo, ViewLayout, ViewQuery};

impl RpcClient {
    /// Whether the compositor answers `ping` with `"result": "ok"`.
    pub fn ping(&mut self) -> Result<bool> {
        Ok(self.send(Request::new("stipc/ping"))?.is_ok())
    }

    pub fn create_wayland_output(&mut self) -> Result<Response> {
        self.send(Request::new("stipc/create_wayland_output"))
    }

    pub fn destroy_wayland_output(&mut self, output: &str) -> Result<Response> {
        self.send(Request::new("stipc/destroy_wayland_output").arg("output", output))
    }

    /// Every view the compositor knows about.
    pub fn list_views(&mut self) -> Result<Vec<ViewInfo>> {
        const METHOD: &str = "stipc/list_views";
        match self.send_checked(Request::new(METHOD))? {
            Response::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(ProtocolError::InvalidJson))
                .collect::<std::result::Result<_, _>>()
                .map_err(Into::into),
            _ => Err(ProtocolError::UnexpectedShape {
                method: METHOD.to_string(),
                expected: "an array of views",
            }
            .into()),
        }
    }

    /// First view matching `query`, filtered client-side.
    pub fn find_view(&mut self, query: ViewQuery<'_>) -> Result<Option<ViewInfo>> {
        Ok(self
            .list_views()?
            .into_iter()
            .find(|view| query.matches(view)))
    }

    pub fn view_by_app_id(&mut self, app_id: &str) -> Result<Option<ViewInfo>> {
        self.find_view(ViewQuery::AppId(app_id))
    }

    pub fn view_by_title(&mut self, title: &str) -> Result<Option<ViewInfo>> {
        self.find_view(ViewQuery::Title(title))
    }

    /// Move and resize views.
    ///
    /// Each identifier is matched against app-id, title and id; every view
    /// it matches gets the placement. Identifiers matching nothing are
    /// skipped.
    pub fn layout_views(&mut self, layout: &[(&str, ViewLayout)]) -> Result<Response> {
        let views = self.list_views()?;
        let placements: Vec<Value> = layout
            .iter()
            .flat_map(|&(ident, ref placement)| {
                views
                    .iter()
                    .filter(move |view| ViewQuery::Any(ident).matches(view))
                    .map(move |view| placement.placement(view.id))
            })
            .collect();

        debug!(count = placements.len(), "laying out views");
        self.send(Request::new("stipc/layout_views").arg("views", placements))
    }

    /// Ask the compositor to run a shell command.
    pub fn run(&mut self, cmd: &str) -> Result<Response> {
        self.send(Request::new("stipc/run").arg("cmd", cmd))
    }

    /// Run a shell command and return its pid.
    pub fn spawn(&mut self, cmd: &str) -> Result<u32> {
        let response = self.send_checked(Request::new("stipc/run").arg("cmd", cmd))?;
        let pid = response.pid().ok_or_else(|| ProtocolError::UnexpectedShape {
            method: "stipc/run".to_string(),
            expected: "a pid",
        })?;
        debug!(cmd, pid, "spawned client");
        Ok(pid)
    }

    pub fn move_cursor(&mut self, x: i64, y: i64) -> Result<Response> {
        self.send(Request::new("stipc/move_cursor").arg("x", x).arg("y", y))
    }

    pub fn set_touch(&mut self, finger: u32, x: i64, y: i64) -> Result<Response> {
        self.send(
            Request::new("stipc/touch")
                .arg("finger", finger)
                .arg("x", x)
                .arg("y", y),
        )
    }

    pub fn release_touch(&mut self, finger: u32) -> Result<Response> {
        self.send(Request::new("stipc/touch_release").arg("finger", finger))
    }

    /// Drive a button; `combo` is e.g. `BTN_LEFT`, or `S-BTN_LEFT` to hold
    /// super as well.
    pub fn click_button(&mut self, combo: &str, mode: ButtonMode) -> Result<Response> {
        self.send(
            Request::new("stipc/feed_button")
                .arg("mode", mode.as_str())
                .arg("combo", combo),
        )
    }

    pub fn set_key_state(&mut self, key: &str, pressed: bool) -> Result<Response> {
        self.send(
            Request::new("stipc/feed_key")
                .arg("key", key)
                .arg("state", pressed),
        )
    }

    /// Press and release a key chord, see [`chord_sequence`].
    ///
    /// Every transition is sent even when one is rejected, so no modifier
    /// stays held. The first rejection is returned afterwards.
    pub fn press_key(&mut self, combo: &str) -> Result<()> {
        let mut rejected = None;
        for transition in chord_sequence(combo) {
            let response = self.set_key_state(&transition.key, transition.pressed)?;
            if rejected.is_some() {
                continue;
            }
            if let Some(message) = response.error_message() {
                debug!(key = %transition.key, %message, "key transition rejected");
                rejected = Some(IpcError::Remote {
                    method: "stipc/feed_key".to_string(),
                    message,
                    response: response.into_value(),
                });
            }
        }
        match rejected {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn tablet_tool_proximity(
        &mut self,
        x: f64,
        y: f64,
        proximity_in: bool,
    ) -> Result<Response> {
        self.send(
            Request::new("stipc/tablet/tool_proximity")
                .arg("x", x)
                .arg("y", y)
                .arg("proximity_in", proximity_in),
        )
    }

    pub fn tablet_tool_tip(&mut self, x: f64, y: f64, state: bool) -> Result<Response> {
        self.send(
            Request::new("stipc/tablet/tool_tip")
                .arg("x", x)
                .arg("y", y)
                .arg("state", state),
        )
    }

    pub fn tablet_tool_axis(&mut self, x: f64, y: f64, pressure: f64) -> Result<Response> {
        self.send(
            Request::new("stipc/tablet/tool_axis")
                .arg("x", x)
                .arg("y", y)
                .arg("pressure", pressure),
        )
    }

    pub fn tablet_tool_button(&mut self, button: &str, state: bool) -> Result<Response> {
        self.send(
            Request::new("stipc/tablet/tool_button")
                .arg("button", button)
                .arg("state", state),
        )
    }

    pub fn tablet_pad_button(&mut self, button: u32, state: bool) -> Result<Response> {
        self.send(
            Request::new("stipc/tablet/pad_button")
                .arg("button", button)
                .arg("state", state),
        )
    }

    /// Hold back the next configure/commit cycle of the focused client.
    pub fn delay_next_tx(&mut self) -> Result<Response> {
        self.send(Request::new("stipc/delay_next_tx"))
    }

    /// Pid of the Xwayland server, or `None` when Xwayland is not running.
    pub fn xwayland_pid(&mut self) -> Result<Option<u32>> {
        let response = self.send_checked(Request::new("stipc/get_xwayland_pid"))?;
        Ok(response.pid().filter(|&pid| pid > 0))
    }
}

/// Request data from a JSON value; anything but an object yields empty data.
pub fn data(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
