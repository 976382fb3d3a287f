//! # SyncSet Generator
//!
//! Turns directories of Kubernetes manifests into a Hive `SyncSet` (one cluster,
//! by name) or `SelectorSyncSet` (every cluster matching a label selector).
//!
//! ## Pipeline
//!
//! 1. **Discovery** - walk comma-separated path-sets for `.yaml` files
//! 2. **Classification** - split multi-document files and route each document by `kind`
//! 3. **Secrets** - replace every Secret with a mapping to a central copy in
//!    `remote-secrets`, and emit that copy separately
//! 4. **Ordering** - sort the remaining resources so dependencies apply first
//! 5. **Patches** - load `SyncObjectPatch` documents in discovery order
//! 6. **Assembly** - wrap everything in the requested document kind
//!
//! The same input tree always produces byte-identical output.

pub mod builder;
pub mod cli;
pub mod config;
pub mod constants;
pub mod crd;
pub mod manifest;
pub mod observability;
pub mod output;
pub mod selector;

pub use builder::{
    build_sync_document, generate, BuildError, DocumentRequest, Generated, Target,
};
pub use config::{GeneratorConfig, LogFormat};
pub use output::{OutputError, OutputFormat};
pub use selector::{parse_label_selector, SelectorError, SelectorPolicy};
