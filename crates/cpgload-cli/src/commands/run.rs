//! Full pipeline command: parse, export, stage, import.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use cpgload_core::{joern, SystemRunner};

use super::Neo4jArgs;

#[derive(Args)]
pub struct RunArgs {
    /// Path to the source code file or directory to analyze
    pub input: PathBuf,

    /// Directory to store intermediate CPG and CSV files
    #[arg(short, long, default_value = "joern_neo4j_output")]
    pub output_dir: PathBuf,

    /// JVM memory allocation for Joern commands (e.g. -J-Xmx8G)
    #[arg(long, default_value = joern::DEFAULT_JVM_MEM)]
    pub jvm_mem: String,

    /// Directory the Neo4j server reads data files from (its import root)
    #[arg(long, env = "NEO4J_IMPORT_DIR", default_value = "joern_neo4j_import")]
    pub import_dir: PathBuf,

    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    if !args.input.is_file() && !args.input.is_dir() {
        bail!("Input path is not a valid file or directory: {}", args.input.display());
    }
    // Fail on bad credentials before spending minutes in Joern.
    let config = args.neo4j.graph_config()?;

    let output_dir = std::path::absolute(&args.output_dir)
        .context("Failed to resolve output directory")?;
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let cpg_path = output_dir.join("cpg.bin");
    let export_dir = output_dir.join("neo4j_csv");

    let runner = SystemRunner;

    println!("{}", "Parsing source with Joern...".bold());
    joern::run_parse(&runner, &args.input, &cpg_path, &args.jvm_mem)
        .context("Joern parsing failed")?;
    println!("  {}", "parsed".green());

    println!("{}", "Exporting CPG to CSV...".bold());
    joern::run_export(&runner, &cpg_path, &export_dir, &args.jvm_mem)
        .context("Joern export failed")?;
    println!("  {}", "exported".green());

    super::import::import_export_dir(&export_dir, &args.import_dir, &config).await
}
