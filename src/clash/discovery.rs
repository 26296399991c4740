use std::io::Write;
use tracing::debug;

use crate::clash::api::ClashClient;
use crate::config::Scheme;
use crate::error::{ClashError, Result};

/// 未指定端口时依次尝试的候选端口
pub const CANDIDATE_PORTS: [u16; 4] = [9090, 9091, 19090, 19091];

/// 确定控制器端口
///
/// 指定了端口时直接返回, 不做任何探测; 否则按 [`CANDIDATE_PORTS`] 顺序探测
pub async fn decide_port<W: Write>(
    explicit: Option<u16>,
    addr: &str,
    scheme: Scheme,
    out: &mut W,
) -> Result<u16> {
    decide_port_among(explicit, addr, scheme, &CANDIDATE_PORTS, out).await
}

/// 在给定候选端口中探测第一个返回 `{"hello": "clash"}` 的端口
pub async fn decide_port_among<W: Write>(
    explicit: Option<u16>,
    addr: &str,
    scheme: Scheme,
    candidates: &[u16],
    out: &mut W,
) -> Result<u16> {
    if let Some(port) = explicit {
        return Ok(port);
    }

    for &port in candidates {
        write!(out, "Trying port {port}...")?;
        out.flush()?;

        let client = ClashClient::new(format!("{scheme}://{addr}:{port}"))?;
        match client.hello().await {
            Ok(body) if is_clash_identity(&body) => {
                writeln!(out, "OK")?;
                writeln!(out)?;
                return Ok(port);
            }
            Ok(_) => {
                debug!(port, "identity field missing or mismatched");
                writeln!(out, "FAIL: not a Clash controller instance")?;
            }
            Err(ClashError::Decode(e)) => {
                debug!(port, error = %e, "probe response is not a JSON object");
                writeln!(out, "FAIL(Decoding): {e}")?;
            }
            Err(e) => {
                debug!(port, error = %e, "probe request failed");
                writeln!(out, "FAIL(Response): {e}")?;
            }
        }
    }

    Err(ClashError::PortNotFound)
}

fn is_clash_identity(body: &serde_json::Map<String, serde_json::Value>) -> bool {
    body.get("hello").and_then(|v| v.as_str()) == Some("clash")
}
