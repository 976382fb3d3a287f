//! # Custom Resource Definitions
//!
//! Hive API types emitted by the generator.
//!
//! ## Module Structure
//!
//! - `sync_set.rs` - `SyncSet` and `SelectorSyncSet` custom resources
//! - `common.rs` - Spec fields shared by both documents (resources, patches, secret mappings)

mod common;
mod sync_set;

// Re-export all public types
pub use common::{
    ResourceApplyMode, SecretMapping, SecretReference, SyncObjectPatch, SyncSetCommonSpec,
};
pub use sync_set::{
    ClusterDeploymentRef, SelectorSyncSet, SelectorSyncSetSpec, SyncDocument, SyncSet,
    SyncSetSpec,
};
