use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the compositor's view list.
///
/// Only the identifying fields are typed; everything else the compositor
/// reports is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewInfo {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "app-id", default)]
    pub app_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewInfo {
    /// The view's `geometry` field, if present and well-formed.
    pub fn geometry(&self) -> Option<Geometry> {
        self.extra
            .get("geometry")
            .and_then(|value| Geometry::deserialize(value).ok())
    }
}

/// How to pick a view out of the view list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewQuery<'a> {
    Id(u64),
    Title(&'a str),
    AppId(&'a str),
    /// Matches the app-id, the title, or the decimal id.
    Any(&'a str),
}

impl ViewQuery<'_> {
    pub fn matches(&self, view: &ViewInfo) -> bool {
        match *self {
            ViewQuery::Id(id) => view.id == id,
            ViewQuery::Title(title) => view.title == title,
            ViewQuery::AppId(app_id) => view.app_id == app_id,
            ViewQuery::Any(ident) => {
                view.app_id == ident || view.title == ident || view.id.to_string() == ident
            }
        }
    }
}

/// A rectangle as the compositor reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Geometry {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `obj` has exactly these `x`, `y`, `width` and `height` fields.
    pub fn matches(&self, obj: &Value) -> bool {
        let field = |name: &str| obj.get(name).and_then(Value::as_i64);
        field("x") == Some(self.x)
            && field("y") == Some(self.y)
            && field("width") == Some(self.width)
            && field("height") == Some(self.height)
    }
}

/// Target placement for one view in a `layout_views` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewLayout {
    pub geometry: Geometry,
    /// Output to move the view to, e.g. `"WL-1"`.
    pub output: Option<String>,
}

impl ViewLayout {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            geometry: Geometry::new(x, y, width, height),
            output: None,
        }
    }

    pub fn on_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// The wire entry for `view_id`.
    pub(crate) fn placement(&self, view_id: u64) -> Value {
        let mut entry = Map::new();
        entry.insert("id".into(), view_id.into());
        entry.insert("x".into(), self.geometry.x.into());
        entry.insert("y".into(), self.geometry.y.into());
        entry.insert("width".into(), self.geometry.width.into());
        entry.insert("height".into(), self.geometry.height.into());
        if let Some(output) = &self.output {
            entry.insert("output".into(), output.clone().into());
        }
        Value::Object(entry)
    }
}
