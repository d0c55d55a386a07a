use crate::errors::ToolError;
use serde_json::Value;

/// One parameter value before it is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
    Json(Value),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        QueryValue::List(value)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(value: &[&str]) -> Self {
        QueryValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        QueryValue::Json(value)
    }
}

/// How a declared field is written to the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `key=value`; lists still expand to one pair per element.
    Scalar,
    /// One `key=value` pair per list element, in list order.
    Repeated,
    /// Present as `key=true` only when the value is `true`.
    Flag,
    /// The whole value serialized as one JSON string.
    Json,
    /// Like `Scalar`, but a zero number is treated as absent.
    NonZero,
}

/// A field declaration: the name callers use, the name the upstream API
/// expects, and the encoding strategy.
#[derive(Debug, Clone, Copy)]
pub struct QueryField {
    pub semantic: &'static str,
    pub wire: &'static str,
    pub encoding: Encoding,
}

impl QueryField {
    pub const fn new(semantic: &'static str, wire: &'static str, encoding: Encoding) -> Self {
        Self {
            semantic,
            wire,
            encoding,
        }
    }

    pub const fn same(name: &'static str, encoding: Encoding) -> Self {
        Self::new(name, name, encoding)
    }
}

/// Ordered parameter map keyed by semantic name. `None` entries are kept so
/// callers can set optional fields unconditionally; they never reach the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, Option<QueryValue>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<V: Into<QueryValue>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        let value = value.map(Into::into);
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
        self
    }

    pub fn insert<V: Into<QueryValue>>(&mut self, key: &str, value: V) -> &mut Self {
        self.set(key, Some(value))
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_ref())
    }
}

fn render(value: &QueryValue, encoding: Encoding) -> Result<Vec<String>, ToolError> {
    let rendered = match (encoding, value) {
        (Encoding::Json, value) => {
            let json = match value {
                QueryValue::Json(inner) => serde_json::to_string(inner)?,
                QueryValue::Text(text) => serde_json::to_string(text)?,
                QueryValue::Int(n) => n.to_string(),
                QueryValue::Bool(b) => b.to_string(),
                QueryValue::List(items) => serde_json::to_string(items)?,
            };
            vec![json]
        }
        (_, QueryValue::List(items)) => items.clone(),
        (_, QueryValue::Bool(true)) => vec!["true".to_string()],
        (_, QueryValue::Bool(false)) => Vec::new(),
        (Encoding::Flag, _) => Vec::new(),
        (Encoding::NonZero, QueryValue::Int(0)) => Vec::new(),
        (_, QueryValue::Int(n)) => vec![n.to_string()],
        (_, QueryValue::Text(text)) => vec![text.clone()],
        (_, QueryValue::Json(inner)) => vec![serde_json::to_string(inner)?],
    };
    Ok(rendered)
}

fn serialize_pairs(pairs: &[(&str, String)]) -> Result<String, ToolError> {
    serde_urlencoded::to_string(pairs)
        .map_err(|err| ToolError::internal(format!("Failed to encode query: {}", err)))
}

/// Encodes only the declared fields, in declaration order, each under its
/// wire name with its declared strategy. Unset and undeclared entries never
/// reach the output.
pub fn encode(params: &QueryParams, fields: &[QueryField]) -> Result<String, ToolError> {
    let mut pairs = Vec::new();
    for field in fields {
        let Some(value) = params.get(field.semantic) else {
            continue;
        };
        for item in render(value, field.encoding)? {
            pairs.push((field.wire, item));
        }
    }
    serialize_pairs(&pairs)
}
