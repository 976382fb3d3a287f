//! # File Finder
//!
//! Discovers manifest files under the roots of a path-set.

use crate::manifest::error::ManifestError;
use crate::manifest::types::{has_manifest_suffix, PathSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Manifest files found under a path-set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Files in walk order: roots in the order given, entries sorted by file name
    pub files: Vec<PathBuf>,
    /// Roots that do not exist
    pub absent_roots: Vec<PathBuf>,
}

/// Find every `.yaml` file under each root, recursively
///
/// A root that does not exist contributes no files and is reported in
/// `absent_roots`. An empty path-set yields an empty result.
///
/// # Errors
///
/// A root whose existence cannot be determined (symlink loop, permission denied on
/// a parent) is `ManifestError::Root`. Any other walk failure aborts discovery and
/// is returned.
pub fn find_manifest_files(paths: &PathSet) -> Result<Discovered, ManifestError> {
    let mut discovered = Discovered::default();

    for root in paths.roots() {
        let exists = root.try_exists().map_err(|source| ManifestError::Root {
            root: root.clone(),
            source,
        })?;
        if !exists {
            warn!("Manifest path does not exist: {}", root.display());
            discovered.absent_roots.push(root.clone());
            continue;
        }
        let files = find_in_root(root)?;
        debug!("Found {} manifest(s) under {}", files.len(), root.display());
        discovered.files.extend(files);
    }

    Ok(discovered)
}

fn find_in_root(root: &Path) -> Result<Vec<PathBuf>, ManifestError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ManifestError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if has_manifest_suffix(entry.path()) && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
