use crate::config::Config;
use crate::constants::network;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_str(&self.body)
            .map_err(|err| ToolError::decode(format!("Invalid JSON response: {}", err)))
    }
}

/// The single outbound call a façade operation makes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, ToolError>;
}

/// Issues one GET and hands the body back typed. The payload is not
/// inspected beyond deserialization.
pub async fn get_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    url: &str,
) -> Result<T, ToolError> {
    let response = transport.request(url, RequestOptions::get()).await?;
    response.json()
}

/// Builds the pooled client shared by every API family. Keep-alive sockets
/// are reused across tool calls; the timeout bounds each whole request.
pub fn build_shared_client(config: &Config) -> Result<Client, ToolError> {
    Client::builder()
        .timeout(config.http_timeout())
        .pool_idle_timeout(Duration::from_millis(network::POOL_IDLE_TIMEOUT_MS))
        .pool_max_idle_per_host(network::POOL_MAX_IDLE_PER_HOST)
        .tcp_keepalive(Duration::from_millis(network::TCP_KEEPALIVE_MS))
        .build()
        .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))
}

#[derive(Clone)]
pub struct HttpClient {
    logger: Logger,
    client: Client,
    token: Option<String>,
    client_version: String,
}

impl HttpClient {
    pub fn new(logger: Logger, client: Client, token: Option<String>) -> Self {
        Self {
            logger: logger.child("http"),
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            client_version: crate::constants::server::VERSION.to_string(),
        }
    }

    fn build_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, ToolError> {
        let mut headers = HeaderMap::new();
        for (key, value) in extra {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ToolError::invalid_input(format!("Invalid header name: {}", key)))?;
            let val = HeaderValue::from_str(value)
                .map_err(|_| ToolError::invalid_input(format!("Invalid header value for {}", key)))?;
            headers.insert(name, val);
        }
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ToolError::internal("API token contains invalid header characters"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let version = HeaderValue::from_str(&self.client_version)
            .map_err(|_| ToolError::internal("Client version is not a valid header value"))?;
        headers.insert(HeaderName::from_static(network::VERSION_HEADER), version);
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn request(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, ToolError> {
        let mut headers = self.build_headers(&options.headers)?;
        let mut req = self.client.request(options.method.clone(), url);
        if let Some(body) = &options.body {
            let text = serde_json::to_string(body)?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            req = req.body(text);
        }
        req = req.headers(headers);

        let started = Instant::now();
        let response = req.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        self.logger.debug(
            "upstream response",
            Some(&serde_json::json!({
                "method": options.method.as_str(),
                "url": url,
                "status": status.as_u16(),
                "duration_ms": started.elapsed().as_millis() as u64,
                "authenticated": self.token.is_some(),
            })),
        );

        if !status.is_success() {
            return Err(ToolError::http(status.as_u16(), &body));
        }
        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        return ToolError::timeout("HTTP request timed out");
    }
    ToolError::network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::logger::LogLevel;

    fn client(token: Option<&str>) -> HttpClient {
        HttpClient::new(
            Logger::new("test", LogLevel::Error),
            Client::new(),
            token.map(|s| s.to_string()),
        )
    }

    #[test]
    fn bearer_header_is_attached_when_token_is_configured() {
        let headers = client(Some("test-token")).build_headers(&[]).expect("headers");
        assert_eq!(
            headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
            Some("Bearer test-token")
        );
    }

    #[test]
    fn anonymous_client_omits_authorization() {
        let headers = client(Some("  ")).build_headers(&[]).expect("headers");
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn version_header_is_always_present() {
        let headers = client(None)
            .build_headers(&[("x-px-mcp-version".to_string(), "spoofed".to_string())])
            .expect("headers");
        assert_eq!(
            headers.get("x-px-mcp-version").and_then(|v| v.to_str().ok()),
            Some(env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn json_decode_failure_is_a_decode_error() {
        let response = HttpResponse {
            status: 200,
            body: "not json".to_string(),
        };
        let err = response.json::<Value>().expect_err("decode");
        assert_eq!(err.kind, crate::errors::ToolErrorKind::Decode);
    }
}
