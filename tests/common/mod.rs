//! Common test utilities for the generator integration tests
//!
//! Builds manifest trees in temporary directories.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::fs;
use std::path::{Path, PathBuf};
use syncset_generator::manifest::PathSet;
use syncset_generator::{DocumentRequest, Target};
use syncset_generator::crd::ResourceApplyMode;
use tempfile::TempDir;

/// A throwaway directory of manifest files
pub struct ManifestTree {
    dir: TempDir,
}

impl ManifestTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `contents` to `relative`, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) -> &Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, contents).expect("Failed to write manifest");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Comma-separated path-set string for the given subdirectories
    pub fn paths(&self, relatives: &[&str]) -> String {
        relatives
            .iter()
            .map(|r| self.join(r).to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Request for `name` targeting cluster `c1`
pub fn cluster_request(name: &str, resources: &str, patches: &str) -> DocumentRequest {
    DocumentRequest {
        name: name.to_string(),
        target: Target::ClusterName("c1".to_string()),
        resources: PathSet::parse(resources),
        patches: PathSet::parse(patches),
        apply_mode: ResourceApplyMode::Upsert,
    }
}

pub const NAMESPACE: &str = "apiVersion: v1
kind: Namespace
metadata:
  name: app-ns
";

pub const SERVICE: &str = "apiVersion: v1
kind: Service
metadata:
  name: web
  namespace: app-ns
spec:
  ports:
    - port: 80
";

pub const CRD: &str = "apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
";

pub const DB_PASS: &str = "apiVersion: v1
kind: Secret
metadata:
  name: db-pass
  namespace: app-ns
type: Opaque
stringData:
  password: hunter2
";
