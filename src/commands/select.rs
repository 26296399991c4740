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

/// 节点选择命令入口
///
/// 逐个处理解析出的代理组; 任一组切换失败即停止, 不再处理后续代理组
pub async fn run<R: BufRead, W: Write>(
    config: &RunConfig,
    term: &mut Terminal<R, W>,
) -> Result<()> {
    let port = decide_port(config.port, &config.addr, config.scheme, &mut term.out).await?;
    let client = ClashClient::new(config.base_url(port))?;
    let catalog = fetch_catalog(&client).await?;
    info!(base_url = client.base_url(), groups = catalog.selectable.len(), "catalog fetched");

    let group_names = resolve_groups(&config.groups, &catalog, term)?;

    for name in &group_names {
        let group = catalog.group(name).ok_or(ClashError::NoMatchingGroups)?;

        writeln!(term.out, "[Group {name}]")?;
        for (i, node) in group.all.iter().enumerate() {
            if *node == group.now {
                writeln!(term.out, "{}.\t{}", i, node.green())?;
            } else {
                writeln!(term.out, "{i}.\t{node}")?;
            }
        }
        writeln!(term.out, "\nCurrent group: {name}")?;
        let now_index = group.now_index().map_or(-1, |i| i as i64);
        writeln!(term.out, "Currently selected: {}. {}\n", now_index, group.now)?;

        let selected = resolve_node("Select a node", group, &catalog, true, term)?;
        if selected.is_empty() {
            writeln!(term.out, "Not selecting for this group.")?;
            continue;
        }

        write!(term.out, "Selecting {selected} for group {name}...")?;
        term.out.flush()?;
        if let Err(e) = client.select_proxy(name, &selected).await {
            writeln!(term.out, "{} {}", "FAIL:".red(), e)?;
            warn!(group = %name, node = %selected, error = %e, "stop, because error encountered");
            return Err(e);
        }
        writeln!(term.out, "{}", "OK".green())?;
        writeln!(term.out)?;
    }

    Ok(())
}
