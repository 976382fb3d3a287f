//! # Resource Ordering
//!
//! Orders resources so that the objects others depend on are applied first.
//!
//! This is a heuristic, not a topological sort. Each kind gets a fixed rank:
//! kinds in [`ORDER_FIRST`] sort before every other kind, kinds in [`ORDER_LAST`]
//! after, and everything else sits in between at rank 0. Resources of equal rank
//! are ordered by their group/version/kind string, then namespace, then name.
//! The kind lists follow kustomize's legacy resource ordering.

use crate::manifest::types::Resource;
use kube::core::GroupVersionKind;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Kinds applied before everything else, in this order
pub const ORDER_FIRST: [&str; 26] = [
    "Namespace",
    "ResourceQuota",
    "StorageClass",
    "CustomResourceDefinition",
    "ServiceAccount",
    "PodSecurityPolicy",
    "SecurityContextConstraints",
    "Role",
    "ClusterRole",
    "RoleBinding",
    "ClusterRoleBinding",
    "ConfigMap",
    "Secret",
    "Endpoints",
    "Service",
    "LimitRange",
    "PriorityClass",
    "PersistentVolume",
    "PersistentVolumeClaim",
    "Deployment",
    "StatefulSet",
    "CronJob",
    "PodDisruptionBudget",
    "CatalogSource",
    "OperatorGroup",
    "Subscription",
];

/// Kinds applied after everything else, in this order
pub const ORDER_LAST: [&str; 2] = [
    "MutatingWebhookConfiguration",
    "ValidatingWebhookConfiguration",
];

/// Kind -> rank. First-kinds are negative, last-kinds positive.
static KIND_RANKS: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| {
    let mut ranks = HashMap::with_capacity(ORDER_FIRST.len() + ORDER_LAST.len());
    for (kind, rank) in ORDER_FIRST.iter().rev().zip((i32::MIN..0).rev()) {
        ranks.insert(*kind, rank);
    }
    for (kind, rank) in ORDER_LAST.iter().zip(1..) {
        ranks.insert(*kind, rank);
    }
    ranks
});

/// Rank of a kind; 0 for kinds in neither list
#[must_use]
pub fn kind_rank(kind: &str) -> i32 {
    KIND_RANKS.get(kind).copied().unwrap_or(0)
}

/// `group/version, Kind=kind`, the tie-break key between equal ranks
///
/// Core-group kinds render with an empty group, e.g. `/v1, Kind=Service`.
#[must_use]
pub fn gvk_string(gvk: &GroupVersionKind) -> String {
    format!("{}/{}, Kind={}", gvk.group, gvk.version, gvk.kind)
}

/// Total order over resources: rank, then GVK string, then namespace, then name
#[must_use]
pub fn compare_resources(a: &Resource, b: &Resource) -> Ordering {
    kind_rank(a.kind())
        .cmp(&kind_rank(b.kind()))
        .then_with(|| gvk_string(a.gvk()).cmp(&gvk_string(b.gvk())))
        .then_with(|| a.namespace().cmp(&b.namespace()))
        .then_with(|| a.name().cmp(&b.name()))
}

/// Sort resources in place
///
/// The sort is stable: resources with identical keys keep their discovery order.
pub fn sort_resources(resources: &mut [Resource]) {
    resources.sort_by(compare_resources);
}
