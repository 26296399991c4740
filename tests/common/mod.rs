//! Shared harness for clash-select integration tests.

#![allow(dead_code)]

pub mod mock_controller;

use clash_select::config::{Feature, RunConfig, Scheme};
use clash_select::prompt::Terminal;
use serde_json::{json, Value};
use std::io::Cursor;

pub use mock_controller::MockController;

pub type ScriptedTerminal = Terminal<Cursor<Vec<u8>>, Vec<u8>>;

/// Terminal fed from a fixed input script, output captured in memory
pub fn scripted(input: &str) -> ScriptedTerminal {
    Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

pub fn output(term: ScriptedTerminal) -> String {
    String::from_utf8(term.into_output()).expect("terminal output is UTF-8")
}

pub fn run_config(port: u16, groups: &[&str], feature: Feature) -> RunConfig {
    RunConfig {
        port: Some(port),
        addr: "127.0.0.1".to_string(),
        scheme: Scheme::Http,
        groups: groups.iter().map(|s| s.to_string()).collect(),
        test_url: "http://connectivitycheck.gstatic.com/generate_204".to_string(),
        feature,
    }
}

pub fn group(name: &str, all: &[&str], now: &str) -> Value {
    json!({ "name": name, "type": "Selector", "all": all, "now": now, "history": [] })
}

pub fn leaf(name: &str, kind: &str) -> Value {
    json!({ "name": name, "type": kind, "history": [] })
}

/// `/proxies` response body built from a list of entries
pub fn proxies(entries: Vec<Value>) -> Value {
    let map: serde_json::Map<String, Value> = entries
        .into_iter()
        .map(|e| (e["name"].as_str().unwrap_or_default().to_string(), e))
        .collect();
    json!({ "proxies": map })
}
