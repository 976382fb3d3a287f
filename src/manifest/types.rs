//! # Types
//!
//! Data structures shared by the load pipeline.

use crate::constants::PATH_SET_SEPARATOR;
use crate::manifest::error::ShapeError;
use kube::core::GroupVersionKind;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Comma-separated list of root directories
///
/// Blank segments are dropped, so `""` and `","` both mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSet {
    roots: Vec<PathBuf>,
}

impl PathSet {
    /// Parse a comma-separated list of roots
    #[must_use]
    pub fn parse(paths: &str) -> Self {
        let roots = paths
            .split(PATH_SET_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PathSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A manifest file read from disk
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Items loaded from a path-set, plus the roots that did not exist
///
/// Absent roots are the recoverable outcome: the caller logs them and carries on.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub items: Vec<T>,
    pub absent_roots: Vec<PathBuf>,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            absent_roots: Vec::new(),
        }
    }
}

impl<T> Loaded<T> {
    /// Replace the items, keeping the absent roots
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` returns.
    pub fn try_map_items<U, E, F>(self, f: F) -> Result<Loaded<U>, E>
    where
        F: FnOnce(Vec<T>) -> Result<Vec<U>, E>,
    {
        Ok(Loaded {
            items: f(self.items)?,
            absent_roots: self.absent_roots,
        })
    }
}

/// One non-Secret manifest, carried verbatim into the generated document
///
/// The object is never modified; the group/version/kind is extracted once so that
/// ordering does not have to re-read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    gvk: GroupVersionKind,
    object: Value,
}

impl Resource {
    /// Wrap a decoded manifest
    ///
    /// # Errors
    ///
    /// Fails when `kind` is missing or empty, or when `apiVersion` has more than one `/`.
    pub fn from_object(object: Value) -> Result<Self, ShapeError> {
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or(ShapeError::MissingKind)?;
        let api_version = object
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let (group, version) = split_api_version(api_version)?;
        Ok(Self {
            gvk: GroupVersionKind::gvk(group, version, kind),
            object,
        })
    }

    #[must_use]
    pub fn gvk(&self) -> &GroupVersionKind {
        &self.gvk
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.gvk.kind
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.metadata_str("name")
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.metadata_str("namespace")
    }

    #[must_use]
    pub fn object(&self) -> &Value {
        &self.object
    }

    fn metadata_str(&self, field: &str) -> Option<&str> {
        self.object
            .get("metadata")
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
    }
}

impl TryFrom<Value> for Resource {
    type Error = ShapeError;

    fn try_from(object: Value) -> Result<Self, Self::Error> {
        Self::from_object(object)
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        resource.object
    }
}

impl serde::Serialize for Resource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.object.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Resource {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Value::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

/// Split `apiVersion` into group and version
///
/// `v1` belongs to the core group (empty string); `apps/v1` to `apps`.
///
/// # Errors
///
/// Returns `ShapeError::InvalidApiVersion` when there is more than one `/`.
pub fn split_api_version(api_version: &str) -> Result<(&str, &str), ShapeError> {
    match api_version.split_once('/') {
        None => Ok(("", api_version)),
        Some((_, version)) if version.contains('/') => Err(ShapeError::InvalidApiVersion(
            api_version.to_string(),
        )),
        Some((group, version)) => Ok((group, version)),
    }
}

/// Display form of a path inside log messages
pub(crate) fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether a path names a manifest by suffix alone
///
/// Compares raw bytes, so file names that are not valid UTF-8 still match.
pub(crate) fn has_manifest_suffix(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .ends_with(crate::constants::MANIFEST_SUFFIX.as_bytes())
}
