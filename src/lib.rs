//! 通过 Clash 外部控制器 API 选择代理组节点、测试节点延迟的命令行工具

pub mod catalog;
pub mod clash;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prompt;
pub mod resolve;

pub use cli::Cli;
pub use config::{Feature, RunConfig};
pub use error::{ClashError, Result};
