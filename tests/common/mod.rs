//! Shared fixtures for the pipeline integration tests

#![allow(dead_code)]

use std::path::Path;

use etherscan_fetcher::{Config, ErrorPolicy, EtherscanConfig, PathsConfig, ServiceConfig};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

pub const API_KEY: &str = "TESTKEY";

pub fn test_config(server: &ServerGuard, data_dir: &Path, on_error: ErrorPolicy) -> Config {
    Config {
        etherscan: EtherscanConfig {
            api_key: API_KEY.to_string(),
            api_url: format!("{}/api", server.url()),
            chain_id: Some(1),
            requests_per_second: 1000.0,
            request_timeout_seconds: 5,
        },
        paths: PathsConfig {
            data_dir: data_dir.to_path_buf(),
            input_file: "addresses.csv".into(),
            output_file: Some("proxies.csv".into()),
            output_dir: Some(data_dir.join("contracts")),
        },
        service: ServiceConfig {
            log_level: "debug".to_string(),
            on_error,
        },
    }
}

pub fn write_addresses(data_dir: &Path, addresses: &[&str]) {
    let mut content = addresses.join("\n");
    content.push('\n');
    std::fs::write(data_dir.join("addresses.csv"), content).unwrap();
}

fn query(action: &str, address: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("module".into(), "contract".into()),
        Matcher::UrlEncoded("action".into(), action.into()),
        Matcher::UrlEncoded("address".into(), address.into()),
        Matcher::UrlEncoded("chainid".into(), "1".into()),
        Matcher::UrlEncoded("apikey".into(), API_KEY.into()),
    ])
}

/// Unregistered mock, finish with `.create_async().await`
pub fn envelope_mock(server: &mut ServerGuard, action: &str, address: &str, envelope: Value) -> Mock {
    server
        .mock("GET", "/api")
        .match_query(query(action, address))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope.to_string())
}

pub fn abi_mock(server: &mut ServerGuard, address: &str, abi: &str) -> Mock {
    envelope_mock(server, "getabi", address, json!({"status": "1", "message": "OK", "result": abi}))
}

pub fn sources_mock(server: &mut ServerGuard, address: &str, results: Value) -> Mock {
    envelope_mock(server, "getsourcecode", address, json!({"status": "1", "message": "OK", "result": results}))
}

pub fn rejection_mock(server: &mut ServerGuard, action: &str, address: &str, reason: &str) -> Mock {
    envelope_mock(server, action, address, json!({"status": "0", "message": "NOTOK", "result": reason}))
}

pub const PROXY_ABI: &str = r#"[
    {"type":"event","name":"ProxyUpdated","anonymous":false,"inputs":[
        {"name":"_new","type":"address","indexed":true},
        {"name":"_old","type":"address","indexed":true}]},
    {"type":"event","name":"Upgraded","anonymous":false,"inputs":[
        {"name":"implementation","type":"address","indexed":true}]},
    {"type":"function","name":"implementation","inputs":[],"outputs":[{"name":"","type":"address"}]}
]"#;

pub const UPGRADED_ONLY_ABI: &str = r#"[
    {"type":"event","name":"Upgraded","anonymous":false,"inputs":[
        {"name":"implementation","type":"address","indexed":true}]}
]"#;

pub const TOKEN_ABI: &str = r#"[
    {"type":"event","name":"Transfer","anonymous":false,"inputs":[
        {"name":"from","type":"address","indexed":true},
        {"name":"to","type":"address","indexed":true},
        {"name":"value","type":"uint256","indexed":false}]},
    {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}]}
]"#;
