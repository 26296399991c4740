//! 代理组目录
//!
//! 每次运行从控制器获取一次快照, 本地从不修改;
//! 切换节点只在服务端生效, 不会回写到快照中。

use std::collections::HashMap;

use crate::clash::api::{ClashClient, ProxyItem};
use crate::error::Result;

/// 可切换节点的代理组类型
pub const SELECTOR_TYPE: &str = "Selector";
/// 聚合所有顶层代理组的根分组
pub const ROOT_GROUP: &str = "GLOBAL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOrGroup {
    pub name: String,
    /// 成员名称, 叶子节点为空
    pub all: Vec<String>,
    pub now: String,
    pub proxy_type: String,
}

impl ProxyOrGroup {
    pub fn is_group(&self) -> bool {
        self.proxy_type == SELECTOR_TYPE
    }

    /// 当前选中节点在成员中的序号
    pub fn now_index(&self) -> Option<usize> {
        self.all.iter().position(|n| *n == self.now)
    }
}

impl From<ProxyItem> for ProxyOrGroup {
    fn from(item: ProxyItem) -> Self {
        Self {
            name: item.name,
            all: item.all.unwrap_or_default(),
            now: item.now.unwrap_or_default(),
            proxy_type: item.proxy_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// 可供选择的代理组, 有根分组时按其成员顺序, 否则顺序不确定
    pub selectable: Vec<ProxyOrGroup>,
    pub by_name: HashMap<String, ProxyOrGroup>,
}

impl Catalog {
    /// 从 `/proxies` 响应构造目录
    ///
    /// 以响应的键作为名称。存在 [`ROOT_GROUP`] 时, 可选代理组为其成员中
    /// 存在且为代理组的条目; 否则为所有代理组, 顺序取决于 map 迭代。
    pub fn from_proxies(proxies: HashMap<String, ProxyItem>) -> Self {
        let by_name: HashMap<String, ProxyOrGroup> = proxies
            .into_iter()
            .map(|(name, item)| {
                let entry = ProxyOrGroup {
                    name: name.clone(),
                    ..ProxyOrGroup::from(item)
                };
                (name, entry)
            })
            .collect();

        let selectable = match by_name.get(ROOT_GROUP) {
            Some(root) => root
                .all
                .iter()
                .filter_map(|member| by_name.get(member))
                .filter(|p| p.is_group())
                .cloned()
                .collect(),
            None => by_name.values().filter(|p| p.is_group()).cloned().collect(),
        };

        Self { selectable, by_name }
    }

    /// 按名称查找代理组, 叶子节点不算
    pub fn group(&self, name: &str) -> Option<&ProxyOrGroup> {
        self.by_name.get(name).filter(|p| p.is_group())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

/// 从控制器获取最新的目录快照
pub async fn fetch_catalog(client: &ClashClient) -> Result<Catalog> {
    let proxies = client.get_proxies().await?;
    Ok(Catalog::from_proxies(proxies))
}
