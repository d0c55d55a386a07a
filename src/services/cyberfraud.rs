use crate::config::Config;
use crate::constants::cyberfraud as defaults;
use crate::errors::ToolError;
use crate::models::cyberfraud::{
    AccountInfo, AccountInfoParams, AttackReportingParams, CustomRulesResponse, OvertimeResponse,
    OverviewParams, OverviewResponse, TrafficDataParams, TrafficDataResponse,
};
use crate::services::endpoint::Endpoint;
use crate::services::http_client::{get_json, Transport};
use crate::services::logger::Logger;
use crate::services::query::{encode, Encoding, QueryField, QueryParams, QueryValue};
use crate::services::time_window::{clamp_time_range, Clock, SystemClock, TimeRange};
use std::sync::Arc;

/// Attack reporting wire layout. Threat types go out as `treatTypes[]`,
/// which is the spelling the API accepts.
const ATTACK_REPORTING_FIELDS: &[QueryField] = &[
    QueryField::same("from", Encoding::Scalar),
    QueryField::same("to", Encoding::Scalar),
    QueryField::same("page", Encoding::NonZero),
    QueryField::same("pageSize", Encoding::NonZero),
    QueryField::new("trafficTypes", "trafficTypes[]", Encoding::Repeated),
    QueryField::new("threatTypes", "treatTypes[]", Encoding::Repeated),
    QueryField::new("trafficSources", "trafficSources[]", Encoding::Repeated),
];

const ACCOUNT_FIELDS: &[QueryField] = &[QueryField::same("daysRange", Encoding::Scalar)];

const TRAFFIC_DATA_FIELDS: &[QueryField] = &[
    QueryField::same("from", Encoding::Scalar),
    QueryField::same("to", Encoding::Scalar),
    QueryField::new("source", "source[]", Encoding::Repeated),
    QueryField::new("appId", "appId[]", Encoding::Repeated),
    QueryField::new("overtime", "overtime[]", Encoding::Repeated),
    QueryField::new("tops", "tops[]", Encoding::Repeated),
    QueryField::new("traffic", "traffic[]", Encoding::Repeated),
    QueryField::new("pageType", "pageType[]", Encoding::Repeated),
    QueryField::new("count", "count[]", Encoding::Repeated),
    QueryField::same("withoutTotals", Encoding::Flag),
    QueryField::same("metricsEnrichment", Encoding::Json),
];

fn list_or_default(value: &Option<Vec<String>>, fallback: &[&str]) -> QueryValue {
    match value {
        Some(items) => QueryValue::List(items.clone()),
        None => QueryValue::from(fallback),
    }
}

fn non_empty_or_default(value: &Option<Vec<String>>, fallback: &[&str]) -> QueryValue {
    match value {
        Some(items) if !items.is_empty() => QueryValue::List(items.clone()),
        _ => QueryValue::from(fallback),
    }
}

fn attack_reporting_query(range: &TimeRange, window: &AttackReportingParams) -> QueryParams {
    let mut query = QueryParams::new();
    query
        .insert("from", range.start_epoch_seconds())
        .insert("to", range.end_epoch_seconds())
        .insert(
            "trafficTypes",
            list_or_default(&window.traffic_types, defaults::TRAFFIC_TYPES),
        )
        .insert(
            "threatTypes",
            list_or_default(&window.threat_types, defaults::THREAT_TYPES),
        )
        .insert(
            "trafficSources",
            list_or_default(&window.traffic_sources, defaults::TRAFFIC_SOURCES),
        );
    query
}

/// Attack reporting, account intelligence, custom rules and traffic data.
#[derive(Clone)]
pub struct CyberfraudService {
    logger: Logger,
    http: Arc<dyn Transport>,
    base: String,
    clock: Arc<dyn Clock>,
}

impl CyberfraudService {
    pub fn new(logger: Logger, http: Arc<dyn Transport>, config: &Config) -> Self {
        Self {
            logger: logger.child("cyberfraud"),
            http,
            base: config.cyberfraud_base(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn clamp(&self, start_time: &str, end_time: &str) -> Result<TimeRange, ToolError> {
        clamp_time_range(start_time, end_time, self.clock.now())
    }

    pub fn overtime_url(&self, params: &AttackReportingParams) -> Result<String, ToolError> {
        let range = self.clamp(&params.start_time, &params.end_time)?;
        let query = attack_reporting_query(&range, params);
        Endpoint::flat(
            format!("{}/attack-reporting/overtime", self.base),
            encode(&query, ATTACK_REPORTING_FIELDS)?,
        )
        .url()
    }

    /// With a cluster id the lookup targets that one cluster and any
    /// `page`/`pageSize` the caller sent is dropped without complaint.
    pub fn overview_url(&self, params: &OverviewParams) -> Result<String, ToolError> {
        let range = self.clamp(&params.window.start_time, &params.window.end_time)?;
        let mut query = attack_reporting_query(&range, &params.window);
        let cluster_id = params
            .cluster_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());
        if cluster_id.is_none() {
            query
                .insert("page", params.page.unwrap_or(defaults::DEFAULT_PAGE))
                .insert(
                    "pageSize",
                    params.page_size.unwrap_or(defaults::DEFAULT_PAGE_SIZE),
                );
        }
        Endpoint::scoped(
            format!("{}/attack-reporting/overview", self.base),
            cluster_id,
            encode(&query, ATTACK_REPORTING_FIELDS)?,
        )
        .url()
    }

    pub fn account_info_url(&self, params: &AccountInfoParams) -> Result<String, ToolError> {
        let account_id = params.account_id.as_str();
        if account_id.trim().is_empty() {
            return Err(ToolError::invalid_input("accountId is required"));
        }
        let mut query = QueryParams::new();
        query.set("daysRange", params.days_range);
        Endpoint::scoped(
            format!("{}/account", self.base),
            Some(account_id),
            encode(&query, ACCOUNT_FIELDS)?,
        )
        .url()
    }

    pub fn custom_rules_url(&self) -> Result<String, ToolError> {
        Endpoint::flat(format!("{}/custom-rules", self.base), "").url()
    }

    /// The traffic endpoint wants whole epoch seconds, taken from the window
    /// only after it has been clamped.
    pub fn traffic_data_url(&self, params: &TrafficDataParams) -> Result<String, ToolError> {
        let range = self.clamp(&params.start_time, &params.end_time)?;
        let mut query = QueryParams::new();
        query
            .insert("from", range.start_epoch_seconds())
            .insert("to", range.end_epoch_seconds())
            .insert(
                "source",
                non_empty_or_default(&params.source, defaults::TRAFFIC_SOURCES),
            )
            .set("appId", params.app_id.clone())
            .insert(
                "overtime",
                non_empty_or_default(&params.overtime, defaults::TRAFFIC_DATA_OVERTIME),
            )
            .set("tops", params.tops.clone())
            .set("traffic", params.traffic.clone())
            .set("pageType", params.page_type.clone())
            .set("count", params.count.clone())
            .set("withoutTotals", params.without_totals);
        if let Some(enrichment) = &params.metrics_enrichment {
            query.insert("metricsEnrichment", serde_json::to_value(enrichment)?);
        }
        Endpoint::flat(
            format!("{}/traffic-data", self.base),
            encode(&query, TRAFFIC_DATA_FIELDS)?,
        )
        .url()
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

    pub async fn get_attack_reporting_overtime(
        &self,
        params: &AttackReportingParams,
    ) -> Result<OvertimeResponse, ToolError> {
        let url = self.overtime_url(params)?;
        self.fetch("attack_reporting_overtime", url).await
    }

    pub async fn get_attack_reporting_overview(
        &self,
        params: &OverviewParams,
    ) -> Result<OverviewResponse, ToolError> {
        let url = self.overview_url(params)?;
        self.fetch("attack_reporting_overview", url).await
    }

    pub async fn get_account_info(
        &self,
        params: &AccountInfoParams,
    ) -> Result<AccountInfo, ToolError> {
        let url = self.account_info_url(params)?;
        self.fetch("account_info", url).await
    }

    pub async fn get_custom_rules(&self) -> Result<CustomRulesResponse, ToolError> {
        let url = self.custom_rules_url()?;
        self.fetch("custom_rules", url).await
    }

    pub async fn get_traffic_data(
        &self,
        params: &TrafficDataParams,
    ) -> Result<TrafficDataResponse, ToolError> {
        let url = self.traffic_data_url(params)?;
        self.fetch("traffic_data", url).await
    }
}
