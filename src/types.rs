use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Explorer API envelope: {"status": "1", "message": "OK", "result": ...}
#[derive(Debug, Deserialize)]
pub struct EtherscanResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Value,
}

// ABI structures, only what event matching needs
#[derive(Debug, Clone, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub entry_type: String,
    pub name: Option<String>,
    pub inputs: Option<Vec<AbiParam>>,
    pub anonymous: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub indexed: Option<bool>,
}

impl AbiEntry {
    pub fn is_event(&self) -> bool {
        self.entry_type == "event"
    }

    pub fn inputs(&self) -> &[AbiParam] {
        self.inputs.as_deref().unwrap_or_default()
    }
}

/// One entry of a `getsourcecode` result.
///
/// Fields the processor does not use are carried in `extra` so the whole
/// object can be written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceResult {
    #[serde(rename = "SourceCode", default)]
    pub source_code: String,
    #[serde(rename = "ABI", default)]
    pub abi: String,
    #[serde(rename = "CompilerVersion", default)]
    pub compiler_version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
