use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::ToolError;
use crate::mcp::envelope::{ResultEnvelope, ToolCallResult};
use crate::services::logger::Logger;

use serde_json::Value;

/// One API family's tools. `tool` is the registered name being invoked.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn tool_names(&self) -> &'static [&'static str];

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError>;
}

/// Routes a tool call to its handler and turns every outcome into an
/// envelope. `execute` never fails.
#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: Vec<Arc<dyn ToolHandler>>) -> Self {
        let mut map: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        for handler in handlers {
            for name in handler.tool_names() {
                map.insert((*name).to_string(), handler.clone());
            }
        }
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(map),
        }
    }

    pub fn has_tool(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn execute(&self, tool: &str, args: Value) -> ToolCallResult {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        let outcome = match self.handlers.get(tool) {
            Some(handler) => handler.handle(tool, args).await,
            None => Err(ToolError::not_found(format!("Unknown tool: {}", tool))),
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        let envelope = match outcome {
            Ok(data) => {
                self.logger.debug(
                    "tool call succeeded",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "trace_id": trace_id,
                        "duration_ms": duration_ms,
                    })),
                );
                ResultEnvelope::success(data)
            }
            Err(err) => {
                self.logger.warn(
                    "tool call failed",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "trace_id": trace_id,
                        "duration_ms": duration_ms,
                        "kind": format!("{:?}", err.kind),
                        "status": err.status,
                    })),
                );
                ResultEnvelope::failure(err.message)
            }
        };
        ToolCallResult::from(envelope)
    }
}
