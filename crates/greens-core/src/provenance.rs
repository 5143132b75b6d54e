//! Provenance and schema descriptors attached to serialized reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every spectrum report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the enclosing payload.
    pub schema_version: SchemaVersion,
    /// Source commit when known, otherwise the package version.
    pub commit: String,
    /// Input report paths in the order they were scanned.
    pub inputs: Vec<String>,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Creates provenance for the given inputs, stamping `tool` at `version`.
    pub fn new(inputs: Vec<String>, tool: &str, version: &str) -> Self {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(tool.to_string(), version.to_string());
        Self {
            schema_version: SchemaVersion::default(),
            commit: commit_string(),
            inputs,
            tool_versions,
        }
    }
}

fn commit_string() -> String {
    option_env!("GIT_COMMIT_HASH")
        .or_else(|| option_env!("VERGEN_GIT_SHA"))
        .map(|value| value.to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}
