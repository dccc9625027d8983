//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: Create `lineage.yaml` and an empty lineage document
//! - `downstream`: List the nodes affected by a change
//! - `order`: Print the layout order
//! - `cycles`: List dependency loops
//!
//! # Global Flags
//!
//! - `-f/--file`: Lineage document (overrides `data-file`)
//! - `-c/--config`: Configuration file (default: `./lineage.yaml` if present)
//! - `--json`: Output in JSON format
//! - `-v`: Increase log verbosity
//!
//! # Example
//!
//! ```bash
//! lineage downstream stg.orders stg.customers
//! lineage order --from raw.orders --strict
//! lineage --json cycles
//! ```

use crate::commands;
use crate::config::LineageConfig;
use crate::document::LineageDocument;
use crate::error::Result;
use crate::output::{self, OutputMode};
use clap::{Args, Parser, Subcommand};
use lineage_graph::NodeId;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Lineage - impact analysis and layout ordering for data lineage graphs
///
/// Reads a JSON Lines document where each line declares a node and the nodes
/// directly downstream of it.
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Lineage document (overrides `data-file` from the configuration)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a configuration file and an empty lineage document
    Init,

    /// List the nodes affected by a change to the given roots
    ///
    /// Roots are always part of the result. Nodes referenced but never
    /// declared in the document are listed separately.
    Downstream(DownstreamArgs),

    /// Print the layout order of the document
    ///
    /// Every node comes after all of its upstream nodes. Nodes caught in a
    /// dependency loop are reported instead of ordered.
    Order(OrderArgs),

    /// Detect circular dependencies
    Cycles,
}

/// Arguments for the downstream command
#[derive(Args, Debug, Clone)]
pub struct DownstreamArgs {
    /// Changed nodes
    #[arg(required = true, value_name = "ROOT", value_parser = parse_node_id)]
    pub roots: Vec<NodeId>,

    /// Only report nodes declared in the document
    #[arg(long)]
    pub within: bool,
}

/// Arguments for the order command
#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    /// Only order the nodes downstream of these roots
    #[arg(long, value_name = "ROOT", num_args = 1.., value_parser = parse_node_id)]
    pub from: Vec<NodeId>,

    /// Fail if any node cannot be ordered
    #[arg(long)]
    pub strict: bool,
}

/// Validate a node identifier given on the command line.
fn parse_node_id(value: &str) -> std::result::Result<NodeId, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("node id cannot be empty".to_string());
    }
    Ok(NodeId::from(trimmed))
}

impl Cli {
    /// Parse CLI arguments from the environment
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// Execute the CLI command in the current directory, printing to stdout
    pub async fn execute(&self) -> Result<()> {
        let dir = std::env::current_dir()?;
        self.execute_in(&dir, &mut io::stdout()).await
    }

    /// Execute the CLI command with relative paths resolved against `dir`,
    /// writing reports to `out`
    pub async fn execute_in<W: Write>(&self, dir: &Path, out: &mut W) -> Result<()> {
        let mode = self.output_mode();

        match &self.command {
            Commands::Init => {
                let result = commands::init(dir).await?;
                output::write_init(out, &result)?;
            }
            Commands::Downstream(args) => {
                let (config, document) = self.load(dir).await?;
                let within = args.within || config.within_universe;
                let report = commands::downstream(&document, &args.roots, within);
                output::write_downstream(out, &report, mode)?;
            }
            Commands::Order(args) => {
                let (config, document) = self.load(dir).await?;
                let report = commands::order(&document, &args.from);
                output::write_order(out, &report, mode)?;
                if args.strict || config.fail_on_cycle {
                    report.ensure_complete()?;
                }
            }
            Commands::Cycles => {
                let (_, document) = self.load(dir).await?;
                let cycles = commands::cycles(&document);
                output::write_cycles(out, &cycles, mode)?;
            }
        }
        Ok(())
    }

    async fn load(&self, dir: &Path) -> Result<(LineageConfig, LineageDocument)> {
        let config = self.load_config(dir).await?;
        let document = self.load_document(dir, &config).await?;
        Ok((config, document))
    }

    async fn load_config(&self, dir: &Path) -> Result<LineageConfig> {
        match &self.config {
            Some(path) => LineageConfig::load(&dir.join(path)).await,
            None => LineageConfig::discover(dir).await,
        }
    }

    async fn load_document(&self, dir: &Path, config: &LineageConfig) -> Result<LineageDocument> {
        let path = match &self.file {
            Some(file) => dir.join(file),
            None => dir.join(config.resolved_data_file()),
        };

        let (document, warnings) = LineageDocument::load(&path).await?;
        if !warnings.is_empty() {
            tracing::info!(count = warnings.len(), "Lineage document loaded with warnings");
            output::print_warnings(&warnings)?;
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn downstream_requires_roots() {
        assert!(Cli::try_parse_from(["lineage", "downstream"]).is_err());
    }

    #[test]
    fn downstream_parses_roots_and_globals() {
        let cli = Cli::try_parse_from([
            "lineage",
            "downstream",
            "stg.orders",
            "stg.customers",
            "--within",
            "-f",
            "graph.jsonl",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("graph.jsonl")));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Downstream(args) => {
                assert!(args.within);
                assert_eq!(
                    args.roots,
                    vec![NodeId::from("stg.orders"), NodeId::from("stg.customers")]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn order_from_takes_several_roots() {
        let cli =
            Cli::try_parse_from(["lineage", "--json", "order", "--from", "a", "b", "--strict"])
                .unwrap();

        assert!(cli.json);
        match cli.command {
            Commands::Order(args) => {
                assert!(args.strict);
                assert_eq!(args.from, vec![NodeId::from("a"), NodeId::from("b")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    fn blank_node_ids_are_rejected(#[case] root: &str) {
        assert!(Cli::try_parse_from(["lineage", "downstream", root]).is_err());
    }

    #[test]
    fn node_ids_are_trimmed() {
        assert_eq!(parse_node_id("  raw.orders "), Ok(NodeId::from("raw.orders")));
    }
}
