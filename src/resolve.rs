//! 将用户输入 (名称或序号) 解析为代理组 / 节点
//!
//! 名称匹配总是优先于序号: 一个既是组名又能解析为序号的输入按名称处理。

use colored::*;
use std::io::{BufRead, Write};

use crate::catalog::{Catalog, ProxyOrGroup};
use crate::error::{ClashError, Result};
use crate::prompt::Terminal;

/// 按名称或可选代理组序号匹配单个输入
pub fn match_group<'a>(token: &str, catalog: &'a Catalog) -> Option<&'a str> {
    if let Some(group) = catalog.group(token) {
        return Some(group.name.as_str());
    }
    parse_index(token, catalog.selectable.len()).map(|i| catalog.selectable[i].name.as_str())
}

/// 按目录中任意条目名称或组内成员序号匹配单个输入
pub fn match_node<'a>(
    token: &'a str,
    group: &'a ProxyOrGroup,
    catalog: &Catalog,
) -> Option<&'a str> {
    if catalog.contains(token) {
        return Some(token);
    }
    parse_index(token, group.all.len()).map(|i| group.all[i].as_str())
}

fn parse_index(token: &str, len: usize) -> Option<usize> {
    token.parse::<usize>().ok().filter(|&i| i < len)
}

/// 解析用户给出的代理组列表
///
/// 无法匹配的输入被静默丢弃, 重复输入不去重。全部无效时返回
/// [`ClashError::NoMatchingGroups`]; 没有任何输入时进入交互式选择。
pub fn resolve_groups<R: BufRead, W: Write>(
    tokens: &[String],
    catalog: &Catalog,
    term: &mut Terminal<R, W>,
) -> Result<Vec<String>> {
    let resolved: Vec<String> = tokens
        .iter()
        .filter_map(|t| match_group(t, catalog))
        .map(String::from)
        .collect();

    if !resolved.is_empty() {
        return Ok(resolved);
    }
    if !tokens.is_empty() {
        return Err(ClashError::NoMatchingGroups);
    }

    for (i, g) in catalog.selectable.iter().enumerate() {
        writeln!(term.out, "{}.\t{} Now: [{}]", i, g.name, g.now.cyan())?;
    }
    loop {
        let line = term.read_line("\nSelect group: [Group name/Index] ")?;
        if line.is_empty() {
            writeln!(term.out, "You must specify a group.")?;
            continue;
        }
        match match_group(&line, catalog) {
            Some(name) => return Ok(vec![name.to_string()]),
            None => writeln!(term.out, "Bad input.")?,
        }
    }
}

/// 在代理组内交互式选择一个节点
///
/// `optional` 为 true 时空输入返回空字符串表示跳过; 否则反复提示直到输入有效。
pub fn resolve_node<R: BufRead, W: Write>(
    prompt: &str,
    group: &ProxyOrGroup,
    catalog: &Catalog,
    optional: bool,
    term: &mut Terminal<R, W>,
) -> Result<String> {
    loop {
        let line = term.read_line(&format!("{prompt}: [Node name/Index] "))?;
        if line.is_empty() {
            if optional {
                return Ok(String::new());
            }
            writeln!(term.out, "You must specify a node.")?;
            continue;
        }
        match match_node(&line, group, catalog) {
            Some(node) => return Ok(node.to_string()),
            None => writeln!(term.out, "Bad input.")?,
        }
    }
}
