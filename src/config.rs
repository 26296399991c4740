use std::fmt;

use crate::cli::Cli;
use crate::error::{ClashError, Result};

pub const PORT_ENV: &str = "CLASH_PORT";
pub const ADDR_ENV: &str = "CLASH_ADDR";
pub const SCHEME_ENV: &str = "CLASH_SCHEME";
pub const TEST_URL_ENV: &str = "CLASH_TEST_URL";
/// 以逗号分隔的代理组环境变量, 仅在命令行未给出代理组时使用
pub const GROUPS_ENV: &str = "CLASH_GROUPS";

pub const DEFAULT_ADDR: &str = "127.0.0.1";
pub const DEFAULT_TEST_URL: &str = "http://connectivitycheck.gstatic.com/generate_204";

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// 大小写不敏感地解析, 仅支持 http/https
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(ClashError::Config(format!("unsupported scheme: {s}"))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// 本次运行执行的功能
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Feature {
    Select,
    DelayTest,
}

/// 启动时构造的只读运行配置
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// 为 None 时需要探测端口
    pub port: Option<u16>,
    pub addr: String,
    pub scheme: Scheme,
    /// 代理组名称或序号
    pub groups: Vec<String>,
    pub test_url: String,
    pub feature: Feature,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::build(cli, |key| std::env::var(key).ok())
    }

    /// 按 命令行 > 环境变量 > 默认值 的顺序确定配置, 空值视为未设置
    fn build(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let feature = match (cli.select, cli.delay_test) {
            (true, true) => {
                return Err(ClashError::Config(
                    "can't select more than one feature".to_string(),
                ))
            }
            (_, true) => Feature::DelayTest,
            _ => Feature::Select,
        };

        let port = match cli.port {
            Some(p) => Some(p),
            None => env(PORT_ENV).map(|raw| parse_port(&raw)).transpose()?,
        };

        let addr = non_empty(cli.addr)
            .or_else(|| env(ADDR_ENV))
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let scheme = match non_empty(cli.scheme).or_else(|| env(SCHEME_ENV)) {
            Some(raw) => Scheme::parse(&raw)?,
            None => Scheme::Http,
        };

        let test_url = non_empty(cli.test_url)
            .or_else(|| env(TEST_URL_ENV))
            .unwrap_or_else(|| DEFAULT_TEST_URL.to_string());

        let groups = if cli.groups.is_empty() {
            env(GROUPS_ENV).map(|raw| split_groups(&raw)).unwrap_or_default()
        } else {
            cli.groups
        };

        Ok(Self {
            port,
            addr,
            scheme,
            groups,
            test_url,
            feature,
        })
    }

    pub fn base_url(&self, port: u16) -> String {
        format!("{}://{}:{}", self.scheme, self.addr, port)
    }

    /// 启动时打印的配置概览
    pub fn banner(&self) -> String {
        let port = match self.port {
            Some(p) => p.to_string(),
            None => "<Not decided>".to_string(),
        };
        format!(
            "Using:\n    Clash external controller: {}://{}:{}\n    Groups: {:?}\n    TestURL: {}\n",
            self.scheme, self.addr, port, self.groups, self.test_url
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ClashError::Config(format!("bad port: {raw}"))),
    }
}

/// 拆分逗号分隔的代理组列表, 去除首尾空白并丢弃空项
pub fn split_groups(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
