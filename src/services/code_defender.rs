use crate::config::Config;
use crate::errors::ToolError;
use crate::models::code_defender::{
    CodeDefenderParams, HeaderInventoryResponse, IncidentsResponse, InventoryParams,
    ScriptInventoryResponse,
};
use crate::services::endpoint::Endpoint;
use crate::services::http_client::{get_json, Transport};
use crate::services::logger::Logger;
use crate::services::query::{encode, Encoding, QueryField, QueryParams};
use std::sync::Arc;

/// Code Defender keys go out under their own names; lists repeat the key.
const LISTING_FIELDS: &[QueryField] = &[
    QueryField::same("appId", Encoding::Repeated),
    QueryField::same("tld", Encoding::Repeated),
    QueryField::same("from", Encoding::Scalar),
    QueryField::same("to", Encoding::Scalar),
    QueryField::same("take", Encoding::Scalar),
    QueryField::same("skip", Encoding::Scalar),
    QueryField::same("excludedStatuses", Encoding::Repeated),
];

fn listing_query(filter: &CodeDefenderParams) -> Result<QueryParams, ToolError> {
    if filter.app_id.is_empty() {
        return Err(ToolError::invalid_input("At least one appId is required."));
    }
    if filter.tld.is_empty() {
        return Err(ToolError::invalid_input(
            "At least one top-level domain is required.",
        ));
    }
    let mut query = QueryParams::new();
    query
        .insert("appId", filter.app_id.clone())
        .insert("tld", filter.tld.clone())
        .set("from", filter.from)
        .set("to", filter.to)
        .set("take", filter.take)
        .set("skip", filter.skip);
    Ok(query)
}

/// Client-side script incidents and the PCI script/header inventories.
#[derive(Clone)]
pub struct CodeDefenderService {
    logger: Logger,
    http: Arc<dyn Transport>,
    base: String,
}

impl CodeDefenderService {
    pub fn new(logger: Logger, http: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            logger: logger.child("code-defender"),
            http,
            base: config.code_defender_base(),
        }
    }

    pub fn incidents_url(&self, params: &CodeDefenderParams) -> Result<String, ToolError> {
        let query = listing_query(params)?;
        Endpoint::flat(
            format!("{}/defense/incidents", self.base),
            encode(&query, LISTING_FIELDS)?,
        )
        .url()
    }

    fn inventory_url(&self, path: &str, params: &InventoryParams) -> Result<String, ToolError> {
        let mut query = listing_query(&params.filter)?;
        query.set("excludedStatuses", params.excluded_statuses.clone());
        Endpoint::flat(
            format!("{}/pci/inventory/{}", self.base, path),
            encode(&query, LISTING_FIELDS)?,
        )
        .url()
    }

    pub fn script_inventory_url(&self, params: &InventoryParams) -> Result<String, ToolError> {
        self.inventory_url("scripts", params)
    }

    pub fn header_inventory_url(&self, params: &InventoryParams) -> Result<String, ToolError> {
        self.inventory_url("headers", params)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        url: String,
    ) -> Result<T, ToolError> {
        self.logger.debug(
            "calling upstream",
            Some(&serde_json::json!({"operation": operation, "url": url})),
        );
        get_json(self.http.as_ref(), &url).await
    }

    pub async fn get_incidents(
        &self,
        params: &CodeDefenderParams,
    ) -> Result<IncidentsResponse, ToolError> {
        let url = self.incidents_url(params)?;
        self.fetch("incidents", url).await
    }

    pub async fn get_script_inventory(
        &self,
        params: &InventoryParams,
    ) -> Result<ScriptInventoryResponse, ToolError> {
        let url = self.script_inventory_url(params)?;
        self.fetch("script_inventory", url).await
    }

    pub async fn get_header_inventory(
        &self,
        params: &InventoryParams,
    ) -> Result<HeaderInventoryResponse, ToolError> {
        let url = self.header_inventory_url(params)?;
        self.fetch("header_inventory", url).await
    }
}
