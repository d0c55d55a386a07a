mod common;
use common::{quiet_logger, RecordingTransport};

use chrono::{TimeZone, Utc};
use human_mcp::config::Config;
use human_mcp::errors::{ToolError, ToolErrorKind};
use human_mcp::models::code_defender::{CodeDefenderParams, InventoryParams};
use human_mcp::models::cyberfraud::{
    AccountInfoParams, AttackReportingParams, OverviewParams, TrafficDataParams,
};
use human_mcp::services::code_defender::CodeDefenderService;
use human_mcp::services::cyberfraud::CyberfraudService;
use human_mcp::services::http_client::Transport;
use human_mcp::services::time_window::FixedClock;
use serde_json::json;
use std::sync::Arc;

fn cyberfraud(transport: Arc<RecordingTransport>) -> CyberfraudService {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
    CyberfraudService::new(
        quiet_logger(),
        transport as Arc<dyn Transport>,
        &Config::default(),
    )
    .with_clock(Arc::new(FixedClock(now)))
}

fn code_defender(transport: Arc<RecordingTransport>) -> CodeDefenderService {
    CodeDefenderService::new(
        quiet_logger(),
        transport as Arc<dyn Transport>,
        &Config::default(),
    )
}

fn window() -> AttackReportingParams {
    AttackReportingParams {
        start_time: "2024-06-14T00:00:00Z".to_string(),
        end_time: "2024-06-14T06:00:00Z".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn overtime_sends_epoch_seconds_and_threat_type_override() {
    let transport = RecordingTransport::replying(json!({
        "result": true,
        "message": "ok",
        "content": {
            "results": [{"timestamp": "2024-06-14T00:00:00Z", "legitimateRequests": 10, "bots": 2}],
            "dataLags": []
        }
    }));
    let mut params = window();
    params.threat_types = Some(vec!["scraping".to_string()]);

    let response = cyberfraud(transport.clone())
        .get_attack_reporting_overtime(&params)
        .await
        .unwrap();

    let url = transport.last_url();
    assert!(url.starts_with("https://api.humansecurity.com/v1/cyberfraud/attack-reporting/overtime?"));
    assert!(url.contains("from=1718323200&to=1718344800"));
    assert!(url.contains("treatTypes%5B%5D=scraping"));
    assert!(!url.contains("threatTypes"));
    assert_eq!(response.result, Some(Some(true)));
    let results = response.content.flatten().unwrap().results.flatten().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].legitimate_requests,
        Some(Some(serde_json::Number::from(10u64)))
    );
    assert_eq!(results[0].extra["bots"], json!(2));
}

#[tokio::test]
async fn overtime_clamps_before_converting() {
    let transport = RecordingTransport::replying(json!({}));
    let params = AttackReportingParams {
        start_time: "2024-05-01T00:00:00Z".to_string(),
        end_time: "2024-06-20T00:00:00Z".to_string(),
        ..Default::default()
    };
    cyberfraud(transport.clone())
        .get_attack_reporting_overtime(&params)
        .await
        .unwrap();
    // now - 14d and now, in seconds
    assert!(transport
        .last_url()
        .contains("from=1717243200&to=1718452800"));
}

#[tokio::test]
async fn invalid_window_never_reaches_the_transport() {
    let transport = RecordingTransport::replying(json!({}));
    let params = AttackReportingParams {
        start_time: "yesterday".to_string(),
        end_time: "2024-06-15T00:00:00Z".to_string(),
        ..Default::default()
    };
    let err = cyberfraud(transport.clone())
        .get_attack_reporting_overtime(&params)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::InvalidInput);
    assert!(err.message.starts_with("Invalid startTime."));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn overview_with_cluster_targets_the_cluster_without_paging() {
    let transport = RecordingTransport::replying(json!({"result": true, "content": {"clusters": []}}));
    let params = OverviewParams {
        window: window(),
        page: Some(2),
        page_size: Some(25),
        cluster_id: Some("cid123".to_string()),
    };
    cyberfraud(transport.clone())
        .get_attack_reporting_overview(&params)
        .await
        .unwrap();
    let url = transport.last_url();
    assert!(url.contains("/attack-reporting/overview/cid123?"));
    assert!(!url.contains("page="));
    assert!(!url.contains("pageSize="));
}

#[tokio::test]
async fn overview_without_cluster_pages() {
    let transport = RecordingTransport::replying(json!({
        "result": true,
        "content": {"clusters": [{"clusterId": "c1", "type": "scraping", "total": 5}], "total": 1}
    }));
    let params = OverviewParams {
        window: window(),
        page: Some(2),
        ..Default::default()
    };
    let response = cyberfraud(transport.clone())
        .get_attack_reporting_overview(&params)
        .await
        .unwrap();
    let url = transport.last_url();
    assert!(url.contains("/attack-reporting/overview?"));
    assert!(url.contains("page=2&pageSize=10"));
    let clusters = response.content.flatten().unwrap().clusters.flatten().unwrap();
    assert_eq!(clusters[0].kind, Some(Some("scraping".to_string())));
}

#[tokio::test]
async fn account_info_path_and_days_range() {
    let transport = RecordingTransport::replying(json!({
        "account_id": "abc123",
        "exists": true,
        "is_under_attack": false,
        "registration_date": "2024-01-01"
    }));
    let info = cyberfraud(transport.clone())
        .get_account_info(&AccountInfoParams {
            account_id: "abc123".to_string(),
            days_range: Some(5),
        })
        .await
        .unwrap();
    let url = transport.last_url();
    assert!(url.contains("/account/abc123"));
    assert!(url.contains("daysRange=5"));
    assert_eq!(info.exists, Some(Some(true)));
    assert_eq!(info.extra["registration_date"], json!("2024-01-01"));
}

#[tokio::test]
async fn custom_rules_pass_through_unknown_fields() {
    let transport = RecordingTransport::replying(json!({
        "result": true,
        "content": [{"ruleId": 7, "name": "block bad bots", "status": "active", "conditions": []}]
    }));
    let rules = cyberfraud(transport.clone())
        .get_custom_rules()
        .await
        .unwrap();
    assert_eq!(
        transport.last_url(),
        "https://api.humansecurity.com/v1/cyberfraud/custom-rules"
    );
    let rules = rules.content.flatten().unwrap();
    assert_eq!(rules[0].name, Some(Some("block bad bots".to_string())));
    assert_eq!(rules[0].extra["conditions"], json!([]));
}

#[tokio::test]
async fn traffic_data_defaults() {
    let transport = RecordingTransport::replying(json!({"result": true, "content": {}}));
    let params = TrafficDataParams {
        start_time: "2024-06-14T00:00:00Z".to_string(),
        end_time: "2024-06-14T06:00:00Z".to_string(),
        overtime: Some(Vec::new()),
        ..Default::default()
    };
    cyberfraud(transport.clone())
        .get_traffic_data(&params)
        .await
        .unwrap();
    let url = transport.last_url();
    assert!(url.contains("/traffic-data?from=1718323200&to=1718344800"));
    assert!(url.contains("source%5B%5D=web&source%5B%5D=mobile"));
    assert!(url.contains("overtime%5B%5D=legitimate"));
    assert!(url.contains("overtime%5B%5D=captchaSolved"));
    assert!(!url.contains("appId"));
}

#[tokio::test]
async fn code_defender_repeats_arrays_and_skips_absent_values() {
    let transport = RecordingTransport::replying(json!({
        "paging": {"count": 1},
        "data": [{"category": "pci", "host_domain": "example.com"}]
    }));
    let params = CodeDefenderParams {
        app_id: vec!["PX1".to_string(), "PX2".to_string()],
        tld: vec!["example.com".to_string()],
        from: Some(1_749_409_759_000),
        to: Some(1_749_496_159_000),
        take: None,
        skip: None,
    };
    let incidents = code_defender(transport.clone())
        .get_incidents(&params)
        .await
        .unwrap();
    assert_eq!(
        transport.last_url(),
        "https://api.humansecurity.com/v1/code-defender/defense/incidents?appId=PX1&appId=PX2&tld=example.com&from=1749409759000&to=1749496159000"
    );
    let data = incidents.data.flatten().unwrap();
    assert_eq!(data[0].host_domain, Some(Some("example.com".to_string())));
}

#[tokio::test]
async fn inventories_hit_their_own_paths() {
    let transport = RecordingTransport::replying(json!({"data": []}));
    let service = code_defender(transport.clone());
    let params = InventoryParams {
        filter: CodeDefenderParams {
            app_id: vec!["PX1".to_string()],
            tld: vec!["example.com".to_string()],
            take: Some(10),
            ..Default::default()
        },
        excluded_statuses: Some(vec!["inactive".to_string()]),
    };
    service.get_script_inventory(&params).await.unwrap();
    service.get_header_inventory(&params).await.unwrap();
    let urls = transport.urls();
    assert!(urls[0].contains("/pci/inventory/scripts?appId=PX1&tld=example.com&take=10&excludedStatuses=inactive"));
    assert!(urls[1].contains("/pci/inventory/headers?"));
}

#[tokio::test]
async fn transport_errors_propagate_unchanged() {
    let transport = RecordingTransport::failing(ToolError::network("network fail"));
    let err = cyberfraud(transport.clone())
        .get_account_info(&AccountInfoParams {
            account_id: "abc123".to_string(),
            days_range: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ToolErrorKind::Network);
    assert_eq!(err.message, "network fail");

    let transport = RecordingTransport::failing(ToolError::http(404, "missing"));
    let err = code_defender(transport)
        .get_incidents(&CodeDefenderParams {
            app_id: vec!["PX1".to_string()],
            tld: vec!["example.com".to_string()],
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.message, "API error: 404: missing");
}
