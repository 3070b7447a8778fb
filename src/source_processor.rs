//! Writes verified contract sources to per-address directories
//!
//! Layout for result `index` of contract `address`:
//!
//! ```text
//! <root>/<address>/<index>.sol            single-file source, verbatim
//! <root>/<address>/<index>_<Name>.sol     one per bundle file, imports stripped
//! <root>/<address>/<index>.abi
//! <root>/<address>/<index>.version
//! <root>/<address>/<index>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FetcherError, Result};
use crate::types::SourceResult;

static IMPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^import.*\n?").expect("valid import pattern"));
static SOL_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)([^/]+\.sol)").expect("valid file name pattern"));
static COMPILER_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d.*)\+").expect("valid version pattern"));

#[derive(Debug, Deserialize)]
struct BundleFile {
    content: String,
}

#[derive(Debug, Deserialize)]
struct StandardJsonInput {
    sources: Map<String, Value>,
}

/// Shape of a `SourceCode` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBundle {
    Single(String),
    /// (virtual path, file content) in provider order
    Multi(Vec<(String, String)>),
}

impl SourceBundle {
    /// Accepts the `{{ standard json }}` wrapper, a plain standard-json object, or a
    /// bare `path -> {content}` object. Anything else is one raw source file.
    pub fn parse(source_code: &str) -> Self {
        let trimmed = source_code.trim();

        if let Some(inner) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if let Some(bundle) = serde_json::from_str::<StandardJsonInput>(inner)
                .ok()
                .and_then(|input| Self::from_files(input.sources))
            {
                return bundle;
            }
        }

        if trimmed.starts_with('{') {
            if let Some(bundle) = serde_json::from_str::<StandardJsonInput>(trimmed)
                .ok()
                .and_then(|input| Self::from_files(input.sources))
            {
                return bundle;
            }
            if let Some(bundle) = serde_json::from_str::<Map<String, Value>>(trimmed)
                .ok()
                .and_then(Self::from_files)
            {
                return bundle;
            }
        }

        Self::Single(source_code.to_string())
    }

    /// `None` unless every entry is a `{content}` object
    fn from_files(files: Map<String, Value>) -> Option<Self> {
        files
            .into_iter()
            .map(|(path, file)| {
                serde_json::from_value::<BundleFile>(file)
                    .ok()
                    .map(|file| (path, file.content))
            })
            .collect::<Option<Vec<_>>>()
            .map(Self::Multi)
    }
}

/// Result of processing one source entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Contract not verified, nothing written
    Skipped,
    Written { directory: PathBuf, files: Vec<PathBuf> },
}

pub fn strip_imports(content: &str) -> String {
    IMPORT_LINE.replace_all(content, "").into_owned()
}

/// Last path segment ending in `.sol`
pub fn simple_file_name(virtual_path: &str) -> Result<&str> {
    SOL_FILE_NAME
        .captures_iter(virtual_path)
        .last()
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| FetcherError::SourceNameExtraction(virtual_path.to_string()))
}

/// `v0.8.19+commit.7dd6d404` -> `0.8.19`
pub fn extract_compiler_version(compiler_version: &str) -> Result<&str> {
    COMPILER_VERSION
        .captures(compiler_version)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| FetcherError::VersionExtraction(compiler_version.to_string()))
}

pub fn process_source_result(
    result: &SourceResult,
    contract_address: &str,
    output_root: &Path,
    index: usize,
) -> Result<SourceOutcome> {
    if result.source_code.is_empty() {
        debug!("No verified source for {} (result {})", contract_address, index);
        return Ok(SourceOutcome::Skipped);
    }

    let directory = output_root.join(contract_address);
    fs::create_dir_all(&directory)?;

    let mut files = Vec::new();

    match SourceBundle::parse(&result.source_code) {
        SourceBundle::Multi(sources) => {
            for (virtual_path, content) in &sources {
                let name = simple_file_name(virtual_path)?;
                files.push(write_file(&directory, format!("{}_{}", index, name), &strip_imports(content))?);
            }
        }
        SourceBundle::Single(content) => {
            files.push(write_file(&directory, format!("{}.sol", index), &content)?);
        }
    }

    files.push(write_file(&directory, format!("{}.abi", index), &result.abi)?);

    let version = extract_compiler_version(&result.compiler_version)?;
    files.push(write_file(&directory, format!("{}.version", index), version)?);

    let raw = serde_json::to_string(result)?;
    files.push(write_file(&directory, format!("{}.json", index), &raw)?);

    debug!("Wrote {} files for {} into {:?}", files.len(), contract_address, directory);
    Ok(SourceOutcome::Written { directory, files })
}

fn write_file(directory: &Path, file_name: String, content: &str) -> Result<PathBuf> {
    let path = directory.join(file_name);
    fs::write(&path, content)?;
    Ok(path)
}
