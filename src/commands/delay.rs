use colored::*;
use std::io::{BufRead, Write};
use tracing::{info, warn};

use crate::catalog::fetch_catalog;
use crate::clash::api::ClashClient;
use crate::clash::discovery::decide_port;
use crate::config::RunConfig;
use crate::error::{ClashError, Result};
use crate::prompt::Terminal;
use crate::resolve::{resolve_groups, resolve_node};

/// 交给控制器的单次测速超时 (毫秒)
pub const DELAY_TIMEOUT_MS: u64 = 5000;

/// 延迟测试命令入口
///
/// 只处理一个代理组, 多个时取第一个
pub async fn run<R: BufRead, W: Write>(
    config: &RunConfig,
    term: &mut Terminal<R, W>,
) -> Result<()> {
    let port = decide_port(config.port, &config.addr, config.scheme, &mut term.out).await?;
    let client = ClashClient::new(config.base_url(port))?;
    let catalog = fetch_catalog(&client).await?;
    info!(base_url = client.base_url(), groups = catalog.selectable.len(), "catalog fetched");

    let group_names = resolve_groups(&config.groups, &catalog, term)?;
    if group_names.len() > 1 {
        writeln!(
            term.out,
            "Only one group allowed when you are doing delay test. Picking the first one"
        )?;
    }
    writeln!(term.out)?;

    let name = group_names.first().ok_or(ClashError::NoMatchingGroups)?;
    let group = catalog.group(name).ok_or(ClashError::NoMatchingGroups)?;
    writeln!(term.out, "[Group {name}]")?;
    for (i, node) in group.all.iter().enumerate() {
        writeln!(term.out, "{i}.\t{node}")?;
    }

    let selected = resolve_node("\nSelect a node to test", group, &catalog, false, term)?;

    write!(term.out, "Testing {selected}...")?;
    term.out.flush()?;
    match client.delay_test(&selected, &config.test_url, DELAY_TIMEOUT_MS).await {
        Ok(delay) => {
            let status = format!("{delay} ms");
            let status = if delay < 200 {
                status.green()
            } else if delay < 500 {
                status.yellow()
            } else {
                status.red()
            };
            writeln!(term.out, "{status}")?;
            Ok(())
        }
        Err(e) => {
            writeln!(term.out, "{} {}", "FAIL:".red(), e)?;
            warn!(node = %selected, error = %e, "stop, because error encountered");
            Err(e)
        }
    }
}
