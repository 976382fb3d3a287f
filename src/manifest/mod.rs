//! # Manifest Pipeline
//!
//! Turns directories of manifests into the parts of a generated document.
//!
//! ## Stages
//!
//! - **Discovery** (`file_finder`): walks comma-separated roots for `*.yaml` files
//! - **Classification** (`classifier`): parses each document and routes it by `kind`
//! - **Secrets** (`secrets`): re-targets Secrets at the central secret store
//! - **Resources** (`resources`, `ordering`): collects and orders everything else
//! - **Patches** (`patches`): loads patch descriptors in discovery order
//!
//! Every loader returns [`Loaded`] on success. Roots that do not exist are listed in
//! `absent_roots` rather than failing the load; malformed manifests are fatal.

pub mod classifier;
pub mod error;
pub mod file_finder;
pub mod ordering;
pub mod patches;
pub mod resources;
pub mod secrets;
pub mod types;

// Re-export public API
pub use classifier::{classify_file, load_documents, ClassifiedDocument, DocumentClass};
pub use error::{ManifestError, ShapeError};
pub use file_finder::{find_manifest_files, Discovered};
pub use ordering::{kind_rank, sort_resources};
pub use patches::load_patches;
pub use resources::load_resources;
pub use secrets::{central_secret_name, load_secret_mappings, transform_secrets};
pub use types::{Loaded, ManifestFile, PathSet, Resource};
