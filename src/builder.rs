//! # Document Builder
//!
//! Runs the manifest pipeline and assembles a `SyncSet` or `SelectorSyncSet`.
//!
//! Addressing is validated by [`Target::from_flags`] before any file is read.
//! Loader failures are fatal; roots that do not exist only produce a warning.

use crate::constants::{
    GENERATED_LABEL_KEY, GENERATED_LABEL_VALUE, SELECTOR_SYNC_SET_PREFIX, SYNC_SET_PREFIX,
};
use crate::crd::{
    ClusterDeploymentRef, ResourceApplyMode, SelectorSyncSet, SelectorSyncSetSpec, SyncDocument,
    SyncSet, SyncSetCommonSpec, SyncSetSpec,
};
use crate::manifest::types::display_roots;
use crate::manifest::{
    load_patches, load_resources, load_secret_mappings, transform_secrets, Loaded, ManifestError,
    PathSet,
};
use crate::selector::{resolve_label_selector, SelectorError, SelectorPolicy};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Error type for building a document
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("one of --selector or --cluster-name must be specified")]
    MissingTarget,
    #[error("only one of --selector or --cluster-name can be specified")]
    ConflictingTargets,
    #[error("document name must not be empty")]
    MissingName,
    #[error("failed to load {input}: {source}")]
    Load {
        input: &'static str,
        source: ManifestError,
    },
    #[error("invalid label selector: {0}")]
    Selector(#[from] SelectorError),
}

/// How the generated document addresses clusters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A single cluster, by ClusterDeployment name
    ClusterName(String),
    /// Every cluster matching a label selector
    Selector(String),
}

impl Target {
    /// Pick the addressing mode from the two mutually exclusive inputs
    ///
    /// Blank strings count as absent.
    ///
    /// # Errors
    ///
    /// `BuildError::MissingTarget` when neither is given, `BuildError::ConflictingTargets`
    /// when both are.
    pub fn from_flags(
        cluster_name: Option<&str>,
        selector: Option<&str>,
    ) -> Result<Self, BuildError> {
        let cluster_name = cluster_name.map(str::trim).filter(|s| !s.is_empty());
        let selector = selector.map(str::trim).filter(|s| !s.is_empty());
        match (cluster_name, selector) {
            (Some(_), Some(_)) => Err(BuildError::ConflictingTargets),
            (None, None) => Err(BuildError::MissingTarget),
            (Some(name), None) => Ok(Target::ClusterName(name.to_string())),
            (None, Some(selector)) => Ok(Target::Selector(selector.to_string())),
        }
    }

    /// Prefix of central Secret names and of the provenance label
    #[must_use]
    pub fn secret_prefix(&self) -> &'static str {
        match self {
            Target::ClusterName(_) => SYNC_SET_PREFIX,
            Target::Selector(_) => SELECTOR_SYNC_SET_PREFIX,
        }
    }
}

/// Resolved addressing, checked before any manifest is loaded
enum Addressing {
    ClusterName(String),
    Selector(LabelSelector),
}

/// Everything needed to build one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    /// Name of the generated document; also part of every central Secret name
    pub name: String,
    pub target: Target,
    /// Resource manifests; Secrets found here are mapped, not embedded
    pub resources: PathSet,
    pub patches: PathSet,
    pub apply_mode: ResourceApplyMode,
}

/// A document plus the central Secret copies it refers to
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Central copies, to be stored in the secret namespace separately
    pub secrets: Vec<Secret>,
    pub document: SyncDocument,
}

/// Build the document for a request
///
/// # Errors
///
/// Fails when any path-set contains a malformed manifest, when a Secret lacks
/// `metadata.name`/`metadata.namespace`, and, under [`SelectorPolicy::Strict`], when
/// the selector does not parse.
pub fn build_sync_document(
    request: &DocumentRequest,
    policy: SelectorPolicy,
) -> Result<SyncDocument, BuildError> {
    if request.name.trim().is_empty() {
        return Err(BuildError::MissingName);
    }
    let prefix = request.target.secret_prefix();
    let addressing = match &request.target {
        Target::ClusterName(cluster_name) => Addressing::ClusterName(cluster_name.clone()),
        Target::Selector(selector) => {
            Addressing::Selector(resolve_label_selector(selector, policy)?)
        }
    };

    let resources = warn_absent("resources", load_resources(&request.resources))?;
    let secrets = warn_absent(
        "secrets",
        load_secret_mappings(&request.name, prefix, &request.resources),
    )?;
    let patches = warn_absent("patches", load_patches(&request.patches))?;

    let common = SyncSetCommonSpec {
        resources,
        resource_apply_mode: request.apply_mode,
        patches,
        secrets,
    };

    let document = match addressing {
        Addressing::Selector(cluster_deployment_selector) => {
            let mut doc = SelectorSyncSet::new(
                &request.name,
                SelectorSyncSetSpec {
                    common,
                    cluster_deployment_selector,
                },
            );
            doc.metadata.labels = Some(generated_labels());
            SyncDocument::SelectorSyncSet(doc)
        }
        Addressing::ClusterName(cluster_name) => {
            let mut doc = SyncSet::new(
                &request.name,
                SyncSetSpec {
                    common,
                    cluster_deployment_refs: vec![ClusterDeploymentRef { name: cluster_name }],
                },
            );
            doc.metadata.labels = Some(generated_labels());
            SyncDocument::SyncSet(doc)
        }
    };

    let spec = document.common();
    info!(
        "Built {} '{}' with {} resource(s), {} secret mapping(s), {} patch(es)",
        document.kind(),
        document.name().unwrap_or_default(),
        spec.resources.len(),
        spec.secrets.len(),
        spec.patches.len()
    );
    Ok(document)
}

/// Build the document and the central Secret copies for a request
///
/// Secret copies come from a separate pass over the resources path-set.
///
/// # Errors
///
/// Everything [`build_sync_document`] fails on, plus Secrets that do not decode as
/// core/v1 Secrets.
pub fn generate(
    request: &DocumentRequest,
    policy: SelectorPolicy,
) -> Result<Generated, BuildError> {
    let document = build_sync_document(request, policy)?;
    let secrets = warn_absent(
        "secrets",
        transform_secrets(
            &request.name,
            request.target.secret_prefix(),
            &request.resources,
        ),
    )?;
    Ok(Generated { secrets, document })
}

fn generated_labels() -> BTreeMap<String, String> {
    BTreeMap::from([(
        GENERATED_LABEL_KEY.to_string(),
        GENERATED_LABEL_VALUE.to_string(),
    )])
}

/// Unwrap a loader outcome, logging absent roots and tagging fatal errors
fn warn_absent<T>(
    input: &'static str,
    outcome: Result<Loaded<T>, ManifestError>,
) -> Result<Vec<T>, BuildError> {
    let loaded = outcome.map_err(|source| BuildError::Load { input, source })?;
    if !loaded.absent_roots.is_empty() {
        warn!(
            "Skipping missing {} path(s): {}",
            input,
            display_roots(&loaded.absent_roots)
        );
    }
    Ok(loaded.items)
}
