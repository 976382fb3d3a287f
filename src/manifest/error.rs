//! # Manifest Errors
//!
//! Fatal failures of the load pipeline.
//!
//! A root directory that does not exist is not an error: discovery reports it as
//! absent and the caller decides what to do with it. Everything here aborts the
//! load of the enclosing path-set.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for loading a path-set
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to stat root {}: {source}", .root.display())]
    Root {
        root: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to decode {target} from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        target: &'static str,
        source: serde_json::Error,
    },
    #[error("invalid manifest {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: ShapeError,
    },
}

impl ManifestError {
    /// File or root the error refers to
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            ManifestError::Root { root, .. } | ManifestError::Walk { root, .. } => root,
            ManifestError::Read { path, .. }
            | ManifestError::Parse { path, .. }
            | ManifestError::Decode { path, .. }
            | ManifestError::Invalid { path, .. } => path,
        }
    }

    /// Check if this is a Secret missing `metadata.name` or `metadata.namespace`
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            ManifestError::Invalid {
                source: ShapeError::MissingField(_),
                ..
            }
        )
    }
}

/// A document that parsed but lacks what the pipeline needs from it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("missing 'kind'")]
    MissingKind,
    #[error("invalid apiVersion '{0}'")]
    InvalidApiVersion(String),
    #[error("could not read {0}")]
    MissingField(&'static str),
}
