//! # Manifest Classifier
//!
//! Parses manifest files and routes each document by its `kind`.
//!
//! Parsing happens in two phases. Every document is first decoded into a
//! schema-agnostic JSON value and a small [`ManifestHeader`] holding only the
//! fields routing needs. The full target shape (Secret, resource, patch) is decoded
//! by the loader that receives the document.

use crate::manifest::error::{ManifestError, ShapeError};
use crate::manifest::file_finder::find_manifest_files;
use crate::manifest::types::{Loaded, ManifestFile, PathSet};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Kind that routes a document to the Secret transformer
pub const SECRET_KIND: &str = "Secret";

/// The fields read before a document is routed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestHeader {
    #[serde(default)]
    pub api_version: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: Option<HeaderMetadata>,
}

/// Identity fields of `metadata`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HeaderMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Where a document goes when loading a resources path-set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentClass {
    Secret,
    Resource,
}

/// One parsed document with the header already extracted
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedDocument {
    /// File the document came from
    pub path: PathBuf,
    pub header: ManifestHeader,
    /// The whole document in JSON-compatible form
    pub body: Value,
}

impl ClassifiedDocument {
    #[must_use]
    pub fn class(&self) -> DocumentClass {
        if self.header.kind.as_deref() == Some(SECRET_KIND) {
            DocumentClass::Secret
        } else {
            DocumentClass::Resource
        }
    }

    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.class() == DocumentClass::Secret
    }

    /// Original `(namespace, name)` of a Secret
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::MissingField` naming the first absent field, wrapped with
    /// the file path.
    pub fn secret_identity(&self) -> Result<(&str, &str), ManifestError> {
        let missing = |field| ManifestError::Invalid {
            path: self.path.clone(),
            source: ShapeError::MissingField(field),
        };
        let metadata = self.header.metadata.as_ref().ok_or_else(|| missing("metadata"))?;
        let name = metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("metadata.name"))?;
        let namespace = metadata
            .namespace
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| missing("metadata.namespace"))?;
        Ok((namespace, name))
    }

    /// Decode the body into its full target shape
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Decode` naming `target` and the file.
    pub fn decode<T: serde::de::DeserializeOwned>(
        &self,
        target: &'static str,
    ) -> Result<T, ManifestError> {
        T::deserialize(&self.body).map_err(|source| ManifestError::Decode {
            path: self.path.clone(),
            target,
            source,
        })
    }
}

/// Read one manifest file
///
/// # Errors
///
/// Returns `ManifestError::Read` when the file cannot be read as UTF-8 text.
pub fn read_manifest(path: &Path) -> Result<ManifestFile, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ManifestFile {
        path: path.to_path_buf(),
        contents,
    })
}

/// Parse every document in a manifest file
///
/// Documents are separated by `---`; empty and `null` documents are skipped.
/// Anchors are resolved and `<<` merge keys expanded before the document is
/// converted to JSON.
///
/// # Errors
///
/// Malformed YAML, a document that is not representable as JSON (e.g. a non-string
/// mapping key), or a header field of the wrong type fails the whole file.
pub fn classify_file(file: &ManifestFile) -> Result<Vec<ClassifiedDocument>, ManifestError> {
    let mut documents = Vec::new();

    for document in serde_yaml::Deserializer::from_str(&file.contents) {
        let parse_error = |source| ManifestError::Parse {
            path: file.path.clone(),
            source,
        };
        let mut yaml = serde_yaml::Value::deserialize(document).map_err(parse_error)?;
        if yaml.is_null() {
            continue;
        }
        yaml.apply_merge().map_err(parse_error)?;
        let body = serde_json::to_value(&yaml).map_err(|source| ManifestError::Decode {
            path: file.path.clone(),
            target: "JSON document",
            source,
        })?;
        let header = ManifestHeader::deserialize(&body).map_err(|source| {
            ManifestError::Decode {
                path: file.path.clone(),
                target: "manifest header",
                source,
            }
        })?;
        debug!(
            "Classified {} document in {}",
            header.kind.as_deref().unwrap_or("<no kind>"),
            file.path.display()
        );
        documents.push(ClassifiedDocument {
            path: file.path.clone(),
            header,
            body,
        });
    }

    Ok(documents)
}

/// Discover, read and classify every document under a path-set
///
/// # Errors
///
/// The first discovery, read or parse failure aborts the load; nothing loaded so far
/// is returned.
pub fn load_documents(paths: &PathSet) -> Result<Loaded<ClassifiedDocument>, ManifestError> {
    if paths.is_empty() {
        return Ok(Loaded::default());
    }

    let discovered = find_manifest_files(paths)?;
    let mut documents = Vec::new();
    for path in &discovered.files {
        let file = read_manifest(path)?;
        documents.extend(classify_file(&file)?);
    }

    info!(
        "Loaded {} document(s) from {} file(s)",
        documents.len(),
        discovered.files.len()
    );
    Ok(Loaded {
        items: documents,
        absent_roots: discovered.absent_roots,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(contents: &str) -> ManifestFile {
        ManifestFile {
            path: PathBuf::from("test.yaml"),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_classify_secret_and_resource() {
        let docs = classify_file(&manifest(
            r"apiVersion: v1
kind: Secret
metadata:
  name: db-pass
  namespace: app-ns
---
apiVersion: v1
kind: Service
metadata:
  name: web
",
        ))
        .unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].class(), DocumentClass::Secret);
        assert_eq!(docs[0].secret_identity().unwrap(), ("app-ns", "db-pass"));
        assert_eq!(docs[1].class(), DocumentClass::Resource);
        assert_eq!(docs[1].header.kind.as_deref(), Some("Service"));
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        let docs = classify_file(&manifest("---\n# only a comment\n---\nkind: Namespace\n")).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(classify_file(&manifest("")).unwrap().is_empty());
    }

    #[test]
    fn test_merge_keys_are_expanded() {
        let docs = classify_file(&manifest(
            r"apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  labels: &labels
    app: web
data:
  <<: *labels
  x: '2'
",
        ))
        .unwrap();

        assert_eq!(
            docs[0].body["data"],
            serde_json::json!({ "app": "web", "x": "2" })
        );
        assert_eq!(docs[0].body["metadata"]["labels"]["app"], "web");
    }

    #[test]
    fn test_non_string_keys_are_fatal() {
        let err = classify_file(&manifest("kind: ConfigMap
data:
  [a, b]: c
")).unwrap_err();
        assert!(matches!(err, ManifestError::Decode { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_fatal() {
        let err = classify_file(&manifest("kind: Service\nmetadata: [unclosed\n")).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert_eq!(err.path(), Path::new("test.yaml"));
    }

    #[test]
    fn test_wrongly_typed_header_is_fatal() {
        let err = classify_file(&manifest("kind:\n  nested: true\n")).unwrap_err();
        assert!(matches!(err, ManifestError::Decode { .. }));
    }

    #[test]
    fn test_secret_identity_requires_name_and_namespace() {
        let no_metadata = classify_file(&manifest("kind: Secret\n")).unwrap();
        let err = no_metadata[0].secret_identity().unwrap_err();
        assert!(err.is_missing_field());
        assert!(err.to_string().contains("metadata"));

        let no_namespace = classify_file(&manifest("kind: Secret\nmetadata:\n  name: a\n")).unwrap();
        let err = no_namespace[0].secret_identity().unwrap_err();
        assert!(err.to_string().contains("metadata.namespace"));
        assert!(err.to_string().contains("test.yaml"));

        let no_name =
            classify_file(&manifest("kind: Secret\nmetadata:\n  namespace: a\n")).unwrap();
        let err = no_name[0].secret_identity().unwrap_err();
        assert!(err.to_string().contains("metadata.name"));
    }

    #[test]
    fn test_load_documents_empty_path_set() {
        let loaded = load_documents(&PathSet::default()).unwrap();
        assert!(loaded.items.is_empty());
        assert!(loaded.absent_roots.is_empty());
    }

    #[test]
    fn test_load_documents_fails_fast_on_bad_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.yaml"), "kind: Namespace\n").unwrap();
        fs::write(temp_dir.path().join("b.yaml"), "kind: [\n").unwrap();

        let result = load_documents(&PathSet::parse(temp_dir.path().to_str().unwrap()));
        let err = result.unwrap_err();
        assert_eq!(err.path(), temp_dir.path().join("b.yaml"));
    }
}
