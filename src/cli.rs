//! # SS CLI
//!
//! Command-line front end for the generator.
//!
//! ## Usage
//!
//! ```bash
//! # SyncSet for a single cluster
//! ss view my-app -c prod-eu-1 -r manifests/
//!
//! # SelectorSyncSet for every matching cluster, with patches, as YAML
//! ss view my-app -s 'env=prod,tier in (web,api)' -r base/,overlays/prod -p patches/ -o yaml
//! ```

use crate::builder::{generate, DocumentRequest, Target};
use crate::config::GeneratorConfig;
use crate::crd::ResourceApplyMode;
use crate::manifest::PathSet;
use crate::output::{write_generated, OutputFormat};
use crate::selector::SelectorPolicy;
use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::io::Write;

/// SyncSet generator
#[derive(Debug, Parser)]
#[command(name = "ss")]
#[command(
    about = "Generate Hive SyncSets and SelectorSyncSets from Kubernetes manifests",
    long_about = None,
    after_help = "\
Examples:
  ss view my-app -c prod-eu-1 -r manifests/
  ss view my-app -s env=prod -r base/,overlays/prod -p patches/ -o yaml
"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the central Secret copies and the generated document
    View(ViewArgs),
}

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .args(["cluster_name", "selector"])
))]
pub struct ViewArgs {
    /// Name of the generated document
    pub name: String,

    /// Target a single cluster by ClusterDeployment name (SyncSet)
    #[arg(short = 'c', long)]
    pub cluster_name: Option<String>,

    /// Target every cluster matching a label selector (SelectorSyncSet)
    #[arg(short, long)]
    pub selector: Option<String>,

    /// Comma-separated resource paths; Secrets found here become secret mappings
    #[arg(short, long, default_value = ".")]
    pub resources: String,

    /// Comma-separated patch paths
    #[arg(short, long)]
    pub patches: Option<String>,

    /// Resource apply mode (upsert or sync)
    #[arg(short = 'a', long, default_value_t = ResourceApplyMode::Upsert)]
    pub apply_mode: ResourceApplyMode,

    /// Document output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    /// Fail instead of falling back to an empty selector when the selector is invalid
    #[arg(long)]
    pub strict_selector: bool,
}

impl ViewArgs {
    /// Turn parsed flags into a build request
    ///
    /// # Errors
    ///
    /// Fails when the target flags do not name exactly one target.
    pub fn request(&self) -> Result<DocumentRequest> {
        let target = Target::from_flags(self.cluster_name.as_deref(), self.selector.as_deref())?;
        Ok(DocumentRequest {
            name: self.name.clone(),
            target,
            resources: PathSet::parse(&self.resources),
            patches: PathSet::parse(self.patches.as_deref().unwrap_or_default()),
            apply_mode: self.apply_mode,
        })
    }

    /// Flag wins over the environment
    #[must_use]
    pub fn selector_policy(&self, config: &GeneratorConfig) -> SelectorPolicy {
        if self.strict_selector {
            SelectorPolicy::Strict
        } else {
            config.selector_policy
        }
    }
}

/// Execute a parsed command, writing generated output to `out`
///
/// # Errors
///
/// Returns the first fatal pipeline or output error.
pub fn run<W: Write>(cli: &Cli, config: &GeneratorConfig, out: &mut W) -> Result<()> {
    match &cli.command {
        Commands::View(args) => view(args, config, out),
    }
}

fn view<W: Write>(args: &ViewArgs, config: &GeneratorConfig, out: &mut W) -> Result<()> {
    let request = args.request()?;
    let generated = generate(&request, args.selector_policy(config))
        .with_context(|| format!("Failed to generate '{}'", args.name))?;
    write_generated(out, &generated, args.output).context("Failed to write output")?;
    Ok(())
}
