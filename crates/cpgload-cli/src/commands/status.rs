//! Connectivity and graph-size status.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use cpgload_graph::GraphClient;

use super::Neo4jArgs;

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub neo4j: Neo4jArgs,
}

pub async fn execute(args: StatusArgs) -> Result<()> {
    let config = args.neo4j.graph_config()?;

    println!("{}", "Neo4j Status".bold());
    println!("{}", "─".repeat(40));
    println!("  URI:      {}", config.uri);
    println!("  Database: {}", config.database);

    let client = GraphClient::connect(&config).await?;
    let counts = client.counts().await?;

    println!("  Nodes:         {}", counts.nodes.to_string().cyan());
    println!("  Relationships: {}", counts.relationships.to_string().cyan());
    println!("{}", "─".repeat(40));

    Ok(())
}
