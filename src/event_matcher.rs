//! Detection of proxy-upgrade events in contract ABIs

use std::io::Write;

use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::error::{FetcherError, Result};
use crate::types::{AbiEntry, AbiParam};

/// Event name plus the exact ordered input types it must declare.
#[derive(Debug, Clone, Copy)]
pub struct EventRule {
    pub name: &'static str,
    pub input_types: &'static [&'static str],
}

pub const UPGRADE_EVENT_RULES: [EventRule; 2] = [
    EventRule {
        name: "ProxyUpdated",
        input_types: &["address", "address"],
    },
    EventRule {
        name: "Upgraded",
        input_types: &["address"],
    },
];

impl EventRule {
    pub fn matches(&self, entry: &AbiEntry) -> bool {
        if !entry.is_event() || entry.name.as_deref() != Some(self.name) {
            return false;
        }

        let inputs = entry.inputs();
        inputs.len() == self.input_types.len()
            && inputs
                .iter()
                .zip(self.input_types)
                .all(|(input, expected)| input.param_type == *expected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventMatch {
    pub signature: String,
    pub topic_hash: String,
    /// Solidity-style declaration with parameter names and `indexed` flags
    pub declaration: String,
}

/// Parse the raw `getabi` result. A malformed ABI counts as an upstream failure.
pub fn parse_abi(raw: &str) -> Result<Vec<AbiEntry>> {
    serde_json::from_str(raw)
        .map_err(|e| FetcherError::Upstream(format!("Failed to parse ABI JSON: {}", e)))
}

/// One match per ABI entry satisfying a rule, in ABI order. Nothing is deduplicated.
pub fn find_upgrade_events(abi: &[AbiEntry]) -> Vec<EventMatch> {
    abi.iter()
        .filter(|entry| entry.is_event())
        .filter(|entry| UPGRADE_EVENT_RULES.iter().any(|rule| rule.matches(entry)))
        .map(|entry| {
            let signature = generate_event_signature(entry.name.as_deref().unwrap_or_default(), entry.inputs());
            let topic_hash = generate_topic_hash(&signature);
            let declaration = generate_event_declaration(entry);
            EventMatch { signature, topic_hash, declaration }
        })
        .collect()
}

/// Append the address once per match and flush, so the list survives an aborted run.
pub fn write_matches<W: Write>(out: &mut W, contract_address: &str, matches: &[EventMatch]) -> Result<()> {
    for event in matches {
        debug!("{} emits {} (topic {})", contract_address, event.declaration, event.topic_hash);
        writeln!(out, "{}", contract_address)?;
        out.flush()?;
    }
    Ok(())
}

fn generate_event_signature(name: &str, inputs: &[AbiParam]) -> String {
    let param_types: Vec<&str> = inputs.iter().map(|input| input.param_type.as_str()).collect();
    format!("{}({})", name, param_types.join(","))
}

// `event Upgraded(address indexed implementation)`
fn generate_event_declaration(entry: &AbiEntry) -> String {
    let params: Vec<String> = entry
        .inputs()
        .iter()
        .map(|input| {
            let mut param = input.param_type.clone();
            if input.indexed.unwrap_or(false) {
                param.push_str(" indexed");
            }
            if !input.name.is_empty() {
                param.push(' ');
                param.push_str(&input.name);
            }
            param
        })
        .collect();

    let anonymous = if entry.anonymous.unwrap_or(false) { " anonymous" } else { "" };
    format!("event {}({}){}", entry.name.as_deref().unwrap_or_default(), params.join(", "), anonymous)
}

fn generate_topic_hash(signature: &str) -> String {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}
