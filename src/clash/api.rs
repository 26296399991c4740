use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::{ClashError, Result};

/// 端口探测的超时时间
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(300);
/// 获取代理列表、切换节点的超时时间
pub const API_TIMEOUT: Duration = Duration::from_secs(5);
/// 延迟测试请求的超时时间, 控制器本身会阻塞等待被测链路
pub const DELAY_TEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Clash API 客户端
///
/// 用于与 Clash 外部控制 API 进行交互
pub struct ClashClient {
    client: Client,
    base_url: String,
}

impl ClashClient {
    /// 以给定的控制器地址 (如 `http://127.0.0.1:9090`) 创建客户端
    ///
    /// 控制器通常在本机, 不经过环境变量中配置的代理
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder().no_proxy().build()?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 请求控制器根路径, 返回身份信息对象
    pub async fn hello(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let url = format!("{}/", self.base_url);
        debug!(%url, "probing controller");
        let resp = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;
        decode_body(resp).await
    }

    /// 获取所有代理组和节点信息
    pub async fn get_proxies(&self) -> Result<HashMap<String, ProxyItem>> {
        let url = format!("{}/proxies", self.base_url);
        debug!(%url, "fetching proxies");
        let resp = self.client.get(&url).timeout(API_TIMEOUT).send().await?;
        if resp.status() != StatusCode::OK {
            return Err(ClashError::HttpStatus {
                status: resp.status().as_u16(),
                context: "in get_proxies, expected 200".to_string(),
                message: None,
            });
        }
        let body: ProxiesResponse = decode_body(resp).await?;
        Ok(body.proxies)
    }

    /// 切换指定代理组的选中节点
    ///
    /// 控制器以 204 表示成功, 其余状态码均视为失败
    pub async fn select_proxy(&self, group_name: &str, proxy_name: &str) -> Result<()> {
        let url = format!("{}/proxies/{}", self.base_url, urlencoding::encode(group_name));
        debug!(%url, proxy_name, "selecting proxy");
        let payload = SelectRequest { name: proxy_name };
        let resp = self
            .client
            .put(&url)
            .timeout(API_TIMEOUT)
            .json(&payload)
            .send()
            .await?;
        if resp.status() == StatusCode::NO_CONTENT {
            Ok(())
        } else {
            Err(ClashError::HttpStatus {
                status: resp.status().as_u16(),
                context: "in select_proxy, return status should be 204".to_string(),
                message: None,
            })
        }
    }

    /// 测试指定节点的延迟, 返回毫秒数
    pub async fn delay_test(
        &self,
        proxy_name: &str,
        test_url: &str,
        timeout_ms: u64,
    ) -> Result<u64> {
        let url = format!(
            "{}/proxies/{}/delay",
            self.base_url,
            urlencoding::encode(proxy_name)
        );
        debug!(%url, test_url, timeout_ms, "testing delay");
        let resp = self
            .client
            .get(&url)
            .timeout(DELAY_TEST_TIMEOUT)
            .query(&[("timeout", timeout_ms.to_string()), ("url", test_url.to_string())])
            .send()
            .await?;
        let status = resp.status();
        let body: DelayResponse = decode_body(resp).await?;
        if status == StatusCode::OK {
            Ok(body.delay)
        } else {
            Err(ClashError::HttpStatus {
                status: status.as_u16(),
                context: "delay test error".to_string(),
                message: Some(body.message),
            })
        }
    }
}

/// 读取响应体并按 JSON 解析, 解析失败归为 `Decode`
async fn decode_body<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClashError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ProxiesResponse {
    proxies: HashMap<String, ProxyItem>,
}

/// 代理节点/组信息
#[derive(Debug, Deserialize, Clone)]
pub struct ProxyItem {
    /// 代理名称
    #[serde(default)]
    pub name: String,
    /// 代理类型 (Selector, URLTest, Direct, etc.)
    #[serde(rename = "type")]
    pub proxy_type: String,
    /// 包含的子节点列表 (仅代理组有效)
    pub all: Option<Vec<String>>,
    /// 当前选中的节点 (仅 Selector 有效)
    pub now: Option<String>,
}

#[derive(Debug, Serialize)]
struct SelectRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct DelayResponse {
    #[serde(default)]
    delay: u64,
    #[serde(default)]
    message: String,
}
