use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One control request: a namespaced method and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// `"<namespace>/<action>"`, e.g. `"stipc/ping"`.
    pub method: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl Request {
    /// Create a request with empty data.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            data: Map::new(),
        }
    }

    /// Create a request with the given data.
    pub fn with_data(method: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            method: method.into(),
            data,
        }
    }

    /// Add one argument.
    pub fn arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    /// The namespace segment: everything before the first `/`.
    pub fn namespace(&self) -> Option<&str> {
        self.method.split_once('/').map(|(namespace, _)| namespace)
    }

    /// The same request addressed to `namespace` instead.
    ///
    /// A method without a namespace is prefixed. A request already in
    /// `namespace` comes back unchanged.
    pub fn with_namespace(&self, namespace: &str) -> Request {
        let method = match self.method.split_once('/') {
            Some((_, action)) => format!("{namespace}/{action}"),
            None => format!("{namespace}/{}", self.method),
        };
        Request {
            method,
            data: self.data.clone(),
        }
    }
}

/// A decoded response.
///
/// Any object carrying an `"error"` key is an [`Response::Error`], whatever
/// else it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Response {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    Scalar(Value),
    Error(Map<String, Value>),
}

impl From<Value> for Response {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("error") => Response::Error(map),
            Value::Object(map) => Response::Object(map),
            Value::Array(items) => Response::Array(items),
            other => Response::Scalar(other),
        }
    }
}

impl From<Response> for Value {
    fn from(response: Response) -> Self {
        match response {
            Response::Object(map) | Response::Error(map) => Value::Object(map),
            Response::Array(items) => Value::Array(items),
            Response::Scalar(value) => value,
        }
    }
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// The `"error"` field rendered as text, for error responses.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Response::Error(map) => map.get("error").map(|error| match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            }),
            _ => None,
        }
    }

    /// Look up a field of an object (or error) response.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Response::Object(map) | Response::Error(map) => map.get(key),
            _ => None,
        }
    }

    /// Whether the response carries `"result": "ok"`.
    pub fn is_ok(&self) -> bool {
        self.get("result").and_then(Value::as_str) == Some("ok")
    }

    /// The `pid` field, when present and representable.
    pub fn pid(&self) -> Option<u32> {
        self.get("pid")
            .and_then(Value::as_u64)
            .and_then(|pid| u32::try_from(pid).ok())
    }

    pub fn into_value(self) -> Value {
        self.into()
    }
}
