use crate::config::Config;
use crate::errors::ToolError;
use crate::managers::code_defender::CodeDefenderManager;
use crate::managers::cyberfraud::CyberfraudManager;
use crate::mcp::catalog::{list_tools, tool_by_name, ListedTool};
use crate::services::code_defender::CodeDefenderService;
use crate::services::cyberfraud::CyberfraudService;
use crate::services::http_client::{build_shared_client, HttpClient, Transport};
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: Config,
    pub tool_executor: Arc<ToolExecutor>,
}

/// Transports per API family. A family without one is not registered.
#[derive(Default)]
pub struct FamilyTransports {
    pub cyberfraud: Option<Arc<dyn Transport>>,
    pub code_defender: Option<Arc<dyn Transport>>,
}

impl App {
    fn validate_tool_wiring(handlers: &[Arc<dyn ToolHandler>]) -> Result<(), ToolError> {
        let mut missing: Vec<&str> = handlers
            .iter()
            .flat_map(|handler| handler.tool_names().iter().copied())
            .filter(|name| tool_by_name(name).is_none())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_details(serde_json::json!({ "missing_from_catalog": missing })))
    }

    /// Builds one authenticated client per configured token over a shared
    /// connection pool.
    pub fn initialize(config: Config) -> Result<Self, ToolError> {
        let logger = Logger::new("human-mcp", config.log_level);
        let client = build_shared_client(&config)?;
        let transport = |token: &Option<String>| -> Option<Arc<dyn Transport>> {
            token.as_ref().map(|token| {
                Arc::new(HttpClient::new(
                    logger.clone(),
                    client.clone(),
                    Some(token.clone()),
                )) as Arc<dyn Transport>
            })
        };
        let transports = FamilyTransports {
            cyberfraud: transport(&config.cyberfraud_token),
            code_defender: transport(&config.code_defender_token),
        };
        Self::with_transports(config, logger, transports)
    }

    pub fn with_transports(
        config: Config,
        logger: Logger,
        transports: FamilyTransports,
    ) -> Result<Self, ToolError> {
        let mut handlers: Vec<Arc<dyn ToolHandler>> = Vec::new();

        if let Some(http) = transports.cyberfraud {
            let service = CyberfraudService::new(logger.clone(), http, &config);
            handlers.push(Arc::new(CyberfraudManager::new(service)));
            logger.info("Cyberfraud service initialized", None);
        }
        if let Some(http) = transports.code_defender {
            let service = CodeDefenderService::new(logger.clone(), http, &config);
            handlers.push(Arc::new(CodeDefenderManager::new(service)));
            logger.info("Code Defender service initialized", None);
        }
        if handlers.is_empty() {
            logger.warn(
                "No API tokens found. No services will be available.",
                None,
            );
        }

        Self::validate_tool_wiring(&handlers)?;
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));

        Ok(Self {
            logger,
            config,
            tool_executor,
        })
    }

    pub fn list_tools(&self) -> Vec<ListedTool> {
        list_tools(|name| self.tool_executor.has_tool(name))
    }
}
