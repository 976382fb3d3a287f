//! # Secret Transformer
//!
//! Re-targets Secret manifests at the central secret store.
//!
//! Secrets never travel inside a generated document. Instead each Secret is copied
//! into [`REMOTE_SECRETS_NAMESPACE`] under a name derived from the document, and the
//! document carries a [`SecretMapping`] telling the fleet controller to copy it back
//! to its original identity on the target cluster.
//!
//! Mappings and copies are produced by two separate passes over the same files.
//! They agree because both derive the central name from [`central_secret_name`].

use crate::constants::{PROVENANCE_LABEL_PREFIX, REMOTE_SECRETS_NAMESPACE};
use crate::crd::{SecretMapping, SecretReference};
use crate::manifest::classifier::load_documents;
use crate::manifest::error::ManifestError;
use crate::manifest::types::{Loaded, PathSet};
use k8s_openapi::api::core::v1::Secret;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Name of the centrally stored copy of a Secret
///
/// `<prefix>-<document_name>-<namespace>-<name>`; unique across documents sharing
/// the store as long as the four inputs are.
#[must_use]
pub fn central_secret_name(
    prefix: &str,
    document_name: &str,
    namespace: &str,
    name: &str,
) -> String {
    format!("{prefix}-{document_name}-{namespace}-{name}")
}

/// Label key recording which document a central copy belongs to
#[must_use]
pub fn provenance_label_key(prefix: &str) -> String {
    format!("{PROVENANCE_LABEL_PREFIX}{prefix}")
}

/// Mapping from the central copy back to the original Secret
#[must_use]
pub fn secret_mapping(
    document_name: &str,
    prefix: &str,
    namespace: &str,
    name: &str,
) -> SecretMapping {
    SecretMapping {
        source_ref: SecretReference {
            namespace: REMOTE_SECRETS_NAMESPACE.to_string(),
            name: central_secret_name(prefix, document_name, namespace, name),
        },
        target_ref: SecretReference {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
    }
}

/// Turn a Secret into its central copy
///
/// Rewrites namespace and name, and merges the provenance label into the existing
/// labels. Every other field is left untouched.
#[must_use]
pub fn transform_secret(
    document_name: &str,
    prefix: &str,
    namespace: &str,
    name: &str,
    mut secret: Secret,
) -> Secret {
    let labels = secret.metadata.labels.get_or_insert_with(BTreeMap::new);
    labels.insert(provenance_label_key(prefix), document_name.to_string());
    secret.metadata.namespace = Some(REMOTE_SECRETS_NAMESPACE.to_string());
    secret.metadata.name = Some(central_secret_name(prefix, document_name, namespace, name));
    secret
}

/// Collect a mapping for every Secret under a path-set
///
/// # Errors
///
/// Fails on any load error, and on a Secret without `metadata.name` or
/// `metadata.namespace`.
pub fn load_secret_mappings(
    document_name: &str,
    prefix: &str,
    paths: &PathSet,
) -> Result<Loaded<SecretMapping>, ManifestError> {
    let loaded = load_documents(paths)?;
    let mappings = loaded.try_map_items(|documents| {
        documents
            .iter()
            .filter(|doc| doc.is_secret())
            .map(|doc| -> Result<SecretMapping, ManifestError> {
                let (namespace, name) = doc.secret_identity()?;
                debug!("Mapping secret {namespace}/{name} from {}", doc.path.display());
                Ok(secret_mapping(document_name, prefix, namespace, name))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    info!("Loaded {} secret mapping(s)", mappings.items.len());
    Ok(mappings)
}

/// Produce the central copy of every Secret under a path-set
///
/// # Errors
///
/// Fails on any load error, on a Secret without `metadata.name` or
/// `metadata.namespace`, and on a Secret that does not decode as a core/v1 Secret
/// (wrong `apiVersion`, invalid base64 in `data`, ...).
pub fn transform_secrets(
    document_name: &str,
    prefix: &str,
    paths: &PathSet,
) -> Result<Loaded<Secret>, ManifestError> {
    let loaded = load_documents(paths)?;
    let secrets = loaded.try_map_items(|documents| {
        documents
            .iter()
            .filter(|doc| doc.is_secret())
            .map(|doc| -> Result<Secret, ManifestError> {
                let (namespace, name) = doc.secret_identity()?;
                let secret: Secret = doc.decode("Secret")?;
                Ok(transform_secret(document_name, prefix, namespace, name, secret))
            })
            .collect::<Result<Vec<_>, _>>()
    })?;
    info!("Transformed {} secret(s)", secrets.items.len());
    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::fs;
    use tempfile::TempDir;

    fn secret(namespace: &str, name: &str, labels: Option<BTreeMap<String, String>>) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                labels,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_central_secret_name() {
        assert_eq!(
            central_secret_name("ss", "mydoc", "app-ns", "db-pass"),
            "ss-mydoc-app-ns-db-pass"
        );
        assert_eq!(
            central_secret_name("sss", "mydoc", "app-ns", "db-pass"),
            "sss-mydoc-app-ns-db-pass"
        );
    }

    #[test]
    fn test_secret_mapping() {
        let mapping = secret_mapping("mydoc", "ss", "app-ns", "db-pass");
        assert_eq!(mapping.source_ref.namespace, "remote-secrets");
        assert_eq!(mapping.source_ref.name, "ss-mydoc-app-ns-db-pass");
        assert_eq!(mapping.target_ref.namespace, "app-ns");
        assert_eq!(mapping.target_ref.name, "db-pass");
    }

    #[test]
    fn test_transform_secret_creates_labels() {
        let original = secret("app-ns", "db-pass", None);
        let transformed = transform_secret("mydoc", "sss", "app-ns", "db-pass", original);
        assert_eq!(
            transformed.metadata.namespace.as_deref(),
            Some("remote-secrets")
        );
        assert_eq!(
            transformed.metadata.name.as_deref(),
            Some("sss-mydoc-app-ns-db-pass")
        );
        let labels = transformed.metadata.labels.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(
            labels.get("atlas.worldpay.com/sss").map(String::as_str),
            Some("mydoc")
        );
    }

    #[test]
    fn test_transform_secret_preserves_existing_labels() {
        let labels = BTreeMap::from([
            ("app".to_string(), "db".to_string()),
            ("atlas.worldpay.com/ss".to_string(), "stale".to_string()),
        ]);
        let original = secret("app-ns", "db-pass", Some(labels));
        let transformed = transform_secret("mydoc", "ss", "app-ns", "db-pass", original);
        let labels = transformed.metadata.labels.unwrap();
        assert_eq!(labels.get("app").map(String::as_str), Some("db"));
        assert_eq!(
            labels.get("atlas.worldpay.com/ss").map(String::as_str),
            Some("mydoc")
        );
    }

    #[test]
    fn test_passes_agree_on_central_identity() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("secrets.yaml"),
            r"apiVersion: v1
kind: Secret
metadata:
  name: db-pass
  namespace: app-ns
stringData:
  password: hunter2
---
apiVersion: v1
kind: Secret
metadata:
  name: api-key
  namespace: edge
data:
  key: c2VjcmV0
",
        )
        .unwrap();
        fs::write(
            temp_dir.path().join("svc.yaml"),
            "apiVersion: v1\nkind: Service\nmetadata:\n  name: web\n",
        )
        .unwrap();
        let paths = PathSet::parse(temp_dir.path().to_str().unwrap());

        let mappings = load_secret_mappings("mydoc", "ss", &paths).unwrap().items;
        let secrets = transform_secrets("mydoc", "ss", &paths).unwrap().items;

        assert_eq!(mappings.len(), 2);
        assert_eq!(secrets.len(), 2);
        for (mapping, secret) in mappings.iter().zip(&secrets) {
            assert_eq!(
                secret.metadata.namespace.as_deref(),
                Some(mapping.source_ref.namespace.as_str())
            );
            assert_eq!(
                secret.metadata.name.as_deref(),
                Some(mapping.source_ref.name.as_str())
            );
        }
        let password = secrets[0]
            .string_data
            .as_ref()
            .and_then(|d| d.get("password"));
        assert_eq!(password.map(String::as_str), Some("hunter2"));
    }

    #[test]
    fn test_secret_without_namespace_is_fatal_in_both_passes() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("bad.yaml"),
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: orphan\n",
        )
        .unwrap();
        let paths = PathSet::parse(temp_dir.path().to_str().unwrap());

        let err = load_secret_mappings("mydoc", "ss", &paths).unwrap_err();
        assert!(err.is_missing_field());
        assert_eq!(err.path(), temp_dir.path().join("bad.yaml"));

        let err = transform_secrets("mydoc", "ss", &paths).unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_empty_path_set_has_no_secrets() {
        let mappings = load_secret_mappings("mydoc", "ss", &PathSet::default()).unwrap();
        assert!(mappings.items.is_empty());
        let secrets = transform_secrets("mydoc", "ss", &PathSet::default()).unwrap();
        assert!(secrets.items.is_empty());
    }
}
