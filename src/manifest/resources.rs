//! # Resource Aggregator
//!
//! Collects every non-Secret document of a path-set into an ordered resource list.

use crate::manifest::classifier::load_documents;
use crate::manifest::error::ManifestError;
use crate::manifest::ordering::sort_resources;
use crate::manifest::types::{Loaded, PathSet, Resource};
use tracing::info;

/// Load and order the resources under a path-set
///
/// Secrets are skipped here; they are handled by the secret transformer.
///
/// # Errors
///
/// Fails on any load error and on a document without a `kind`.
pub fn load_resources(paths: &PathSet) -> Result<Loaded<Resource>, ManifestError> {
    let loaded = load_documents(paths)?;
    let mut resources = loaded.try_map_items(|documents| {
        documents
            .into_iter()
            .filter(|doc| !doc.is_secret())
            .map(|doc| {
                Resource::from_object(doc.body).map_err(|source| ManifestError::Invalid {
                    path: doc.path,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()
    })?;

    sort_resources(&mut resources.items);
    info!("Loaded {} resource(s)", resources.items.len());
    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::error::ShapeError;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_secrets_are_excluded() {
        let temp_dir = TempDir::new().unwrap();
        write(
            &temp_dir,
            "all.yaml",
            "apiVersion: v1\nkind: Secret\nmetadata:\n  name: s\n  namespace: n\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n",
        );

        let loaded = load_resources(&PathSet::parse(temp_dir.path().to_str().unwrap())).unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].kind(), "ConfigMap");
    }

    #[test]
    fn test_document_without_kind_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir, "nokind.yaml", "apiVersion: v1\nmetadata:\n  name: x\n");

        let err = load_resources(&PathSet::parse(temp_dir.path().to_str().unwrap())).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Invalid {
                source: ShapeError::MissingKind,
                ..
            }
        ));
        assert_eq!(err.path(), temp_dir.path().join("nokind.yaml"));
    }

    #[test]
    fn test_invalid_api_version_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir, "bad.yaml", "apiVersion: a/b/c\nkind: Widget\n");

        let err = load_resources(&PathSet::parse(temp_dir.path().to_str().unwrap())).unwrap_err();
        assert!(err.to_string().contains("a/b/c"));
    }

    #[test]
    fn test_resources_are_ordered() {
        let temp_dir = TempDir::new().unwrap();
        write(&temp_dir, "a-deploy.yaml", "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: web\n");
        write(&temp_dir, "b-ns.yaml", "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: shop\n");
        write(&temp_dir, "c-hook.yaml", "apiVersion: admissionregistration.k8s.io/v1\nkind: ValidatingWebhookConfiguration\nmetadata:\n  name: hook\n");
        write(&temp_dir, "d-ingress.yaml", "apiVersion: networking.k8s.io/v1\nkind: Ingress\nmetadata:\n  name: web\n");

        let loaded = load_resources(&PathSet::parse(temp_dir.path().to_str().unwrap())).unwrap();
        let kinds: Vec<&str> = loaded.items.iter().map(Resource::kind).collect();
        assert_eq!(
            kinds,
            vec!["Namespace", "Deployment", "Ingress", "ValidatingWebhookConfiguration"]
        );
    }

    #[test]
    fn test_absent_root_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let paths: PathSet = [missing.clone()].into_iter().collect();

        let loaded = load_resources(&paths).unwrap();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.absent_roots, vec![missing]);
    }
}
