use crate::errors::ToolError;
use crate::models::code_defender::{CodeDefenderParams, InventoryParams};
use crate::models::{into_data, parse_params};
use crate::services::code_defender::CodeDefenderService;
use crate::services::tool_executor::ToolHandler;
use crate::utils::tool_errors::unknown_tool_error;
use async_trait::async_trait;
use serde_json::Value;

pub const INCIDENTS: &str = "human_code_defender_get_incidents";
pub const SCRIPT_INVENTORY: &str = "human_pci_get_script_inventory";
pub const HEADER_INVENTORY: &str = "human_pci_get_header_inventory";

pub const CODE_DEFENDER_TOOLS: &[&str] = &[INCIDENTS, SCRIPT_INVENTORY, HEADER_INVENTORY];

pub struct CodeDefenderManager {
    service: CodeDefenderService,
}

impl CodeDefenderManager {
    pub fn new(service: CodeDefenderService) -> Self {
        Self { service }
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            INCIDENTS => {
                let params: CodeDefenderParams = parse_params(tool, args)?;
                into_data(self.service.get_incidents(&params).await?)
            }
            SCRIPT_INVENTORY => {
                let params: InventoryParams = parse_params(tool, args)?;
                into_data(self.service.get_script_inventory(&params).await?)
            }
            HEADER_INVENTORY => {
                let params: InventoryParams = parse_params(tool, args)?;
                into_data(self.service.get_header_inventory(&params).await?)
            }
            _ => Err(unknown_tool_error(tool, CODE_DEFENDER_TOOLS)),
        }
    }
}

#[async_trait]
impl ToolHandler for CodeDefenderManager {
    fn tool_names(&self) -> &'static [&'static str] {
        CODE_DEFENDER_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.handle_tool(tool, args).await
    }
}
