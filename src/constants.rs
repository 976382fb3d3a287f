//! # Constants
//!
//! Shared constants used throughout the generator.
//!
//! The naming constants end up in generated documents and in the central secret
//! store, so changing any of them renames objects on every managed cluster.

/// Namespace that holds the centrally stored copies of every transformed Secret
pub const REMOTE_SECRETS_NAMESPACE: &str = "remote-secrets";

/// Prefix of the provenance label added to transformed Secrets
/// The full key is `<prefix><document-kind-prefix>`, e.g. `atlas.worldpay.com/ss`
pub const PROVENANCE_LABEL_PREFIX: &str = "atlas.worldpay.com/";

/// Label key stamped on every generated document
pub const GENERATED_LABEL_KEY: &str = "generated";

/// Label value stamped on every generated document
pub const GENERATED_LABEL_VALUE: &str = "true";

/// File name suffix of manifests picked up by discovery
pub const MANIFEST_SUFFIX: &str = ".yaml";

/// Separator between roots in a path-set flag
pub const PATH_SET_SEPARATOR: char = ',';

/// Secret-name prefix for documents addressed to one cluster by name
pub const SYNC_SET_PREFIX: &str = "ss";

/// Secret-name prefix for documents addressed to clusters by label selector
pub const SELECTOR_SYNC_SET_PREFIX: &str = "sss";

/// Default log level when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Maximum length of a label value and of the name part of a label key
pub const MAX_LABEL_NAME_LENGTH: usize = 63;

/// Maximum length of the DNS-subdomain prefix of a label key
pub const MAX_LABEL_PREFIX_LENGTH: usize = 253;
