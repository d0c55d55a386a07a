pub mod network {
    pub const DEFAULT_API_HOST: &str = "api.humansecurity.com";
    pub const DEFAULT_API_VERSION: &str = "v1";
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const POOL_IDLE_TIMEOUT_MS: u64 = 1_000;
    pub const POOL_MAX_IDLE_PER_HOST: usize = 256;
    pub const TCP_KEEPALIVE_MS: u64 = 1_000;
    pub const VERSION_HEADER: &str = "x-px-mcp-version";
}

pub mod env {
    pub const API_HOST: &str = "HUMAN_API_HOST";
    pub const API_VERSION: &str = "HUMAN_API_VERSION";
    pub const CYBERFRAUD_TOKEN: &str = "HUMAN_CYBERFRAUD_API_TOKEN";
    pub const CODE_DEFENDER_TOKEN: &str = "HUMAN_CODE_DEFENDER_API_TOKEN";
    pub const HTTP_TIMEOUT_MS: &str = "HTTP_TIMEOUT_MS";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}

pub mod retention {
    pub const ATTACK_REPORTING_DAYS: i64 = 14;
}

pub mod cyberfraud {
    pub const TRAFFIC_TYPES: &[&str] = &["paid", "organic"];
    pub const THREAT_TYPES: &[&str] = &["account-takeover", "scraping", "transaction-abuse", "other"];
    pub const TRAFFIC_SOURCES: &[&str] = &["web", "mobile"];
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    pub const TRAFFIC_DATA_OVERTIME: &[&str] = &[
        "legitimate",
        "blocked",
        "potentialBlock",
        "whitelist",
        "blacklist",
        "goodKnownBots",
        "captchaSolved",
    ];
}

pub mod server {
    pub const NAME: &str = "HUMAN Security MCP Server";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
}
