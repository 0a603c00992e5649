//! Dataset manifest: where each bundled dataset came from and which file holds it.
//! Read by `validate_data` and surfaced in the catalog summary.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSetEntry {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Path relative to the data directory.
    pub path: String,
}

pub type Registry = BTreeMap<String, DataSetEntry>;

pub const DEFAULT_REGISTRY_FILE: &str = "registry.json";

/// Load the manifest from `<data_dir>/registry.json`. Returns None if missing or unreadable.
pub fn load_registry(data_dir: &Path) -> Option<Registry> {
    let raw = fs::read_to_string(data_dir.join(DEFAULT_REGISTRY_FILE)).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Check every manifest entry: the file exists and is valid JSON.
/// Returns one message per broken entry.
pub fn check_registry(data_dir: &Path, registry: &Registry) -> Vec<String> {
    let mut problems = Vec::new();
    for (name, entry) in registry {
        let path = data_dir.join(&entry.path);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                problems.push(format!("[{name}] read failed: {} - {err}", path.display()));
                continue;
            }
        };
        if let Err(err) = serde_json::from_str::<serde_json::Value>(&content) {
            problems.push(format!("[{name}] invalid JSON: {} - {err}", path.display()));
        }
    }
    problems
}
