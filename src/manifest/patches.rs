//! # Patch Loader
//!
//! Loads every document of the patches path-set as a [`SyncObjectPatch`].

use crate::crd::SyncObjectPatch;
use crate::manifest::classifier::load_documents;
use crate::manifest::error::ManifestError;
use crate::manifest::types::{Loaded, PathSet};
use tracing::info;

/// Load the patches under a path-set, in discovery order
///
/// Every document is treated as a patch whatever its `kind` field says.
///
/// # Errors
///
/// Fails on any load error and on a document missing a required patch field.
pub fn load_patches(paths: &PathSet) -> Result<Loaded<SyncObjectPatch>, ManifestError> {
    let loaded = load_documents(paths)?;
    let patches = loaded.try_map_items(|documents| {
        documents
            .iter()
            .map(|doc| doc.decode::<SyncObjectPatch>("SyncObjectPatch"))
            .collect::<Result<Vec<_>, _>>()
    })?;
    info!("Loaded {} patch(es)", patches.items.len());
    Ok(patches)
}
