//! # SyncSet / SelectorSyncSet
//!
//! The two document shapes the generator can emit.
//!
//! Both are declared as custom resources so that serialization produces the same
//! `apiVersion` / `kind` / `metadata` / `spec` envelope the fleet controller reads.

use crate::crd::SyncSetCommonSpec;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::{Deserialize, Serialize};

/// SyncSet: resources applied to a single cluster, addressed by name
///
/// # Example
///
/// ```yaml
/// apiVersion: hive.openshift.io/v1
/// kind: SyncSet
/// metadata:
///   name: my-app
///   labels:
///     generated: "true"
/// spec:
///   clusterDeploymentRefs:
///     - name: prod-eu-1
///   resourceApplyMode: Upsert
///   resources: []
/// ```
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[kube(
    kind = "SyncSet",
    group = "hive.openshift.io",
    version = "v1",
    namespaced,
    schema = "disabled",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct SyncSetSpec {
    #[serde(flatten)]
    pub common: SyncSetCommonSpec,
    /// Clusters the resources are applied to
    pub cluster_deployment_refs: Vec<ClusterDeploymentRef>,
}

/// SelectorSyncSet: resources applied to every cluster matching a label selector
#[derive(kube::CustomResource, Debug, Clone, PartialEq, Deserialize, Serialize)]
#[kube(
    kind = "SelectorSyncSet",
    group = "hive.openshift.io",
    version = "v1",
    schema = "disabled",
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSyncSetSpec {
    #[serde(flatten)]
    pub common: SyncSetCommonSpec,
    /// Selects the ClusterDeployments the resources are applied to
    pub cluster_deployment_selector: LabelSelector,
}

/// Reference to a ClusterDeployment in the document's namespace
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClusterDeploymentRef {
    pub name: String,
}

/// One generated document, addressed either by cluster name or by selector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SyncDocument {
    SyncSet(SyncSet),
    SelectorSyncSet(SelectorSyncSet),
}

impl SyncDocument {
    /// Spec fields shared by both variants
    #[must_use]
    pub fn common(&self) -> &SyncSetCommonSpec {
        match self {
            SyncDocument::SyncSet(doc) => &doc.spec.common,
            SyncDocument::SelectorSyncSet(doc) => &doc.spec.common,
        }
    }

    /// Document name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            SyncDocument::SyncSet(doc) => doc.metadata.name.as_deref(),
            SyncDocument::SelectorSyncSet(doc) => doc.metadata.name.as_deref(),
        }
    }

    /// Kind of the document as it appears on the wire
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SyncDocument::SyncSet(_) => "SyncSet",
            SyncDocument::SelectorSyncSet(_) => "SelectorSyncSet",
        }
    }
}
