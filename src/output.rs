//! # Output
//!
//! Renders a [`Generated`] result for stdout.
//!
//! Central Secret copies always print as JSON, one block each followed by a blank
//! line. The document follows in the requested format.

use crate::builder::Generated;
use crate::crd::SyncDocument;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use thiserror::Error;

const JSON_INDENT: &[u8] = b"    ";

/// Error type for rendering output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Format of the generated document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    #[value(alias = "yml")]
    Yaml,
}

impl OutputFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pretty JSON with a four-space indent
///
/// # Errors
///
/// Returns `OutputError::Json` if the value cannot be serialized.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever emits UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Render the document alone
///
/// # Errors
///
/// Returns an `OutputError` if serialization fails.
pub fn render_document(
    document: &SyncDocument,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Json => to_pretty_json(document),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(document)?),
    }
}

/// Render secrets and document as they appear on stdout
///
/// # Errors
///
/// Returns an `OutputError` if serialization fails.
pub fn render(generated: &Generated, format: OutputFormat) -> Result<String, OutputError> {
    let mut out = String::new();
    for secret in &generated.secrets {
        out.push_str(&to_pretty_json(secret)?);
        out.push_str("\n\n");
    }
    let document = render_document(&generated.document, format)?;
    out.push_str(document.trim_end_matches('\n'));
    out.push_str("\n\n");
    Ok(out)
}

/// Render and write to `writer`
///
/// # Errors
///
/// Returns an `OutputError` if serialization or the write fails.
pub fn write_generated<W: Write>(
    writer: &mut W,
    generated: &Generated,
    format: OutputFormat,
) -> Result<(), OutputError> {
    writer.write_all(render(generated, format)?.as_bytes())?;
    writer.flush()?;
    Ok(())
}
