//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cpgload_graph::GraphConfig;

pub mod import;
pub mod run;
pub mod status;

/// CPG to Neo4j import pipeline
#[derive(Parser)]
#[command(name = "cpgload")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: parse sources, export the CPG, import into Neo4j
    Run(run::RunArgs),

    /// Import an already-exported directory into Neo4j
    Import(import::ImportArgs),

    /// Show Neo4j connectivity and graph counts
    Status(status::StatusArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run(args) => run::execute(args).await,
            Commands::Import(args) => import::execute(args).await,
            Commands::Status(args) => status::execute(args).await,
        }
    }
}

/// Connection flags shared by every subcommand that talks to Neo4j.
#[derive(Args)]
pub struct Neo4jArgs {
    /// Neo4j Bolt URI
    #[arg(long, env = "NEO4J_URI", default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j username
    #[arg(long, env = "NEO4J_USER", default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub neo4j_password: String,

    /// Target Neo4j database name
    #[arg(long, env = "NEO4J_DATABASE", default_value = "neo4j")]
    pub neo4j_database: String,
}

impl Neo4jArgs {
    /// Build a connection config, rejecting unusable credentials early.
    pub fn graph_config(&self) -> Result<GraphConfig> {
        if self.neo4j_password.trim().is_empty() {
            anyhow::bail!(
                "Neo4j password is required. Set --neo4j-password or the NEO4J_PASSWORD environment variable."
            );
        }

        Ok(GraphConfig {
            uri: self.neo4j_uri.clone(),
            user: self.neo4j_user.clone(),
            password: self.neo4j_password.clone(),
            database: self.neo4j_database.clone(),
        })
    }
}
