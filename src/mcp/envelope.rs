use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Outcome of one tool call as the caller sees it: exactly one of `data`
/// or `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Blank messages collapse to "Unknown error" so the caller always
    /// gets something to show.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self {
            data: None,
            error: Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

/// `tools/call` result: the envelope twice, once as pretty-printed text for
/// clients that only read `content` and once structured.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub is_error: bool,
    pub content: Vec<TextContent>,
    pub structured_content: ResultEnvelope,
}

impl From<ResultEnvelope> for ToolCallResult {
    fn from(envelope: ResultEnvelope) -> Self {
        let text = serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string());
        Self {
            is_error: envelope.is_error(),
            content: vec![TextContent { kind: "text", text }],
            structured_content: envelope,
        }
    }
}

impl ToolCallResult {
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Wraps a tool's data schema the way results are shaped: an object with
/// optional `data` and `error`, open to extra keys.
pub fn wrap_output_schema(data_schema: &Value) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "data": data_schema,
            "error": {"type": "string"},
        },
        "additionalProperties": true,
    })
}
