#![allow(dead_code)]

use async_trait::async_trait;
use human_mcp::errors::ToolError;
use human_mcp::services::http_client::{HttpResponse, RequestOptions, Transport};
use human_mcp::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn quiet_logger() -> Logger {
    Logger::new("test", LogLevel::Error)
}

/// In-memory transport: remembers every URL and answers each call the same way.
pub struct RecordingTransport {
    urls: std::sync::Mutex<Vec<String>>,
    reply: Result<String, ToolError>,
}

impl RecordingTransport {
    pub fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            urls: std::sync::Mutex::new(Vec::new()),
            reply: Ok(body.to_string()),
        })
    }

    pub fn failing(err: ToolError) -> Arc<Self> {
        Arc::new(Self {
            urls: std::sync::Mutex::new(Vec::new()),
            reply: Err(err),
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> String {
        self.urls().last().cloned().expect("no request was made")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(&self, url: &str, options: RequestOptions) -> Result<HttpResponse, ToolError> {
        assert_eq!(options.method, reqwest::Method::GET);
        self.urls.lock().unwrap().push(url.to_string());
        match &self.reply {
            Ok(body) => Ok(HttpResponse {
                status: 200,
                body: body.clone(),
            }),
            Err(err) => Err(err.clone()),
        }
    }
}

fn header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Accepts one connection, answers it with `status` and `body`, and yields
/// the raw request it received.
pub async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = header_end(&buf) {
                let head = String::from_utf8_lossy(&buf[..end]).to_string();
                if buf.len() >= end + content_length(&head) {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {} Status\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).to_string()
    });
    (format!("http://{}", addr), handle)
}
