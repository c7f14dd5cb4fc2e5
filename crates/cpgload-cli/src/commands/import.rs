//! Import-only command over an existing export directory.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use cpgload_core::{discover_scripts, stage_data_files};
use cpgload_graph::{import_scripts, GraphClient, GraphConfig};

use super::Neo4jArgs;

#[derive(Args)]
pub struct ImportArgs {
    /// Directory containing exported *_cypher.csv and *_data.csv files
    pub export_dir: PathBuf,

    /// Directory the Neo4j server reads data files from (its import root)
    #[arg(long, env = "NEO4J_IMPORT_DIR", default_value = "joern_neo4j_import")]
    pub import_dir: PathBuf,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub async fn execute(args: ImportArgs) -> Result<()> {
    let config = args.neo4j.graph_config()?;
    import_export_dir(&args.export_dir, &args.import_dir, &config).await
}

/// Shared database phase: discover scripts, stage data files, connect, import.
///
/// Zero discovered scripts is a successful no-op run.
pub(crate) async fn import_export_dir(
    export_dir: &Path,
    import_dir: &Path,
    config: &GraphConfig,
) -> Result<()> {
    let scripts = discover_scripts(export_dir)?;
    if scripts.is_empty() {
        println!("{}", "No import scripts found to process.".yellow());
        return Ok(());
    }
    println!(
        "Found {} node and {} edge scripts.",
        scripts.node_scripts.len(),
        scripts.edge_scripts.len()
    );

    let staged = stage_data_files(export_dir, import_dir)
        .context("Failed to stage data files into the Neo4j import directory")?;
    println!("  Staged {} data files into {}", staged, import_dir.display());

    println!("{}", "Connecting to Neo4j...".bold());
    let client = GraphClient::connect(config).await?;
    println!("  {}", "connected".green());

    let report = import_scripts(&client, &scripts).await;

    println!("\n{}", "Import finished:".bold());
    println!("  Scripts processed: {}/{}", report.processed, report.total);
    if !report.ok() {
        bail!("Import finished with errors. Review the logs above.");
    }
    println!("{}", "Import completed successfully.".green().bold());

    Ok(())
}
