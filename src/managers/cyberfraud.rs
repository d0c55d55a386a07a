use crate::errors::ToolError;
use crate::models::cyberfraud::{
    AccountInfoParams, AttackReportingParams, OverviewParams, TrafficDataParams,
};
use crate::models::{into_data, parse_params};
use crate::services::cyberfraud::CyberfraudService;
use crate::services::tool_executor::ToolHandler;
use crate::utils::tool_errors::unknown_tool_error;
use async_trait::async_trait;
use serde_json::Value;

pub const ATTACK_REPORTING_OVERTIME: &str = "human_get_attack_reporting_overtime";
pub const ATTACK_REPORTING_OVERVIEW: &str = "human_get_attack_reporting_overview";
pub const CUSTOM_RULES: &str = "human_get_custom_rules";
pub const ACCOUNT_INFO: &str = "human_get_account_info";
pub const TRAFFIC_DATA: &str = "human_get_traffic_data";

pub const CYBERFRAUD_TOOLS: &[&str] = &[
    ATTACK_REPORTING_OVERTIME,
    ATTACK_REPORTING_OVERVIEW,
    CUSTOM_RULES,
    ACCOUNT_INFO,
    TRAFFIC_DATA,
];

pub struct CyberfraudManager {
    service: CyberfraudService,
}

impl CyberfraudManager {
    pub fn new(service: CyberfraudService) -> Self {
        Self { service }
    }

    pub async fn handle_tool(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        match tool {
            ATTACK_REPORTING_OVERTIME => {
                let params: AttackReportingParams = parse_params(tool, args)?;
                into_data(self.service.get_attack_reporting_overtime(&params).await?)
            }
            ATTACK_REPORTING_OVERVIEW => {
                let params: OverviewParams = parse_params(tool, args)?;
                into_data(self.service.get_attack_reporting_overview(&params).await?)
            }
            CUSTOM_RULES => into_data(self.service.get_custom_rules().await?),
            ACCOUNT_INFO => {
                let params: AccountInfoParams = parse_params(tool, args)?;
                into_data(self.service.get_account_info(&params).await?)
            }
            TRAFFIC_DATA => {
                let params: TrafficDataParams = parse_params(tool, args)?;
                into_data(self.service.get_traffic_data(&params).await?)
            }
            _ => Err(unknown_tool_error(tool, CYBERFRAUD_TOOLS)),
        }
    }
}

#[async_trait]
impl ToolHandler for CyberfraudManager {
    fn tool_names(&self) -> &'static [&'static str] {
        CYBERFRAUD_TOOLS
    }

    async fn handle(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        self.handle_tool(tool, args).await
    }
}
