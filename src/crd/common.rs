//! # Common Spec
//!
//! Fields shared by `SyncSet` and `SelectorSyncSet`.

use crate::manifest::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Spec fields common to both generated document kinds
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetCommonSpec {
    /// Ordered resources to apply on the target clusters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    /// Whether the target controller deletes resources that disappear from the list
    #[serde(default)]
    pub resource_apply_mode: ResourceApplyMode,
    /// Patches applied after the resources, in discovery order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<SyncObjectPatch>,
    /// Secrets copied from the central store into the target clusters
    #[serde(rename = "secretMappings", default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<SecretMapping>,
}

/// How the target controller applies the resource list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ResourceApplyMode {
    /// Create or update listed resources, never delete
    #[default]
    Upsert,
    /// Create, update and delete so the cluster matches the list
    Sync,
}

impl ResourceApplyMode {
    /// Get the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceApplyMode::Upsert => "Upsert",
            ResourceApplyMode::Sync => "Sync",
        }
    }
}

impl fmt::Display for ResourceApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceApplyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("upsert") {
            Ok(ResourceApplyMode::Upsert)
        } else if s.eq_ignore_ascii_case("sync") {
            Ok(ResourceApplyMode::Sync)
        } else {
            Err(format!(
                "unsupported apply mode '{s}' (expected 'Upsert' or 'Sync')"
            ))
        }
    }
}

/// Maps a Secret in the central store onto a Secret in the target cluster
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretMapping {
    /// Centrally stored copy
    pub source_ref: SecretReference,
    /// In-cluster identity the copy is written to
    pub target_ref: SecretReference,
}

/// Namespaced reference to a Secret
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecretReference {
    pub name: String,
    pub namespace: String,
}

/// A patch applied to an object on the target cluster
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncObjectPatch {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Patch body, interpreted according to `patch_type`
    pub patch: String,
    /// One of `json`, `merge` or `strategic`; the target controller defaults to strategic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<String>,
}
