//! Mock Clash controller for integration tests.
//!
//! Serves canned JSON responses per route and records every request it
//! receives so tests can assert on method, path and body.

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// A request received by the mock controller
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    /// Path including the query string, as sent on the request line
    pub target: String,
    pub body: String,
}

impl MockRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
}

/// Mock controller bound to an ephemeral localhost port
pub struct MockController {
    pub port: u16,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockController {
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind mock controller")?;
        let port = listener.local_addr()?.port();
        let routes = Arc::new(Mutex::new(Vec::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (routes_task, requests_task) = (routes.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes_task.clone();
                let requests = requests_task.clone();
                tokio::spawn(async move {
                    let _ = handle_connection(stream, routes, requests).await;
                });
            }
        });

        Ok(Self { port, routes, requests })
    }

    /// Register a canned response; later registrations for the same route win
    pub fn route(&self, method: &str, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.route_raw(method, path, status, &body.to_string())
    }

    pub fn route_raw(&self, method: &str, path: &str, status: u16, body: &str) -> &Self {
        self.routes.lock().unwrap().insert(
            0,
            Route {
                method: method.to_string(),
                path: path.to_string(),
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> Vec<MockRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path() == path)
            .collect()
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<MockRequest>>>,
) -> Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();

    let request = MockRequest { method, target, body };
    let route = routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.method == request.method && r.path == request.path())
        .cloned();
    requests.lock().unwrap().push(request);

    let (status, body) = match route {
        Some(r) => (r.status, r.body),
        None => (404, r#"{"message":"Resource not found"}"#.to_string()),
    };
    let response = if status == 204 {
        "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string()
    } else {
        format!(
            "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            reason(status),
            body.len()
        )
    };
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
