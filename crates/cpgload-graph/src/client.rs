//! Neo4j connection client.

use anyhow::{Context, Result};
use neo4rs::{ConfigBuilder, Graph, Query};
use serde::Deserialize;

/// Configuration for connecting to Neo4j.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
        }
    }
}

/// Client for Neo4j import operations.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
}

impl GraphClient {
    /// Create a new GraphClient from config.
    ///
    /// Note: neo4rs uses a lazy deadpool. `Graph::connect` only creates the pool
    /// object and does NOT establish a real bolt connection yet.  We run a cheap
    /// `RETURN 1` ping immediately so that callers get a fast failure when Neo4j
    /// is unreachable or the credentials are wrong instead of hanging silently
    /// until the first import statement.
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let neo4j_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .db(config.database.as_str())
            .max_connections(4)  // Keep pool small for CLI use-cases
            .fetch_size(20)
            .build()
            .context("Failed to build Neo4j config")?;

        let graph = Graph::connect(neo4j_config)
            .await
            .context("Failed to create Neo4j connection pool")?;

        // Ping to force an actual TCP+bolt handshake so connection problems
        // (auth, unreachable server, unknown database) surface here.
        graph.run(Query::new("RETURN 1".to_string())).await
            .with_context(|| format!("Neo4j at {} is not responding to queries", config.uri))?;

        Ok(Self { graph })
    }

    /// Execute a Cypher statement that returns no results.
    pub async fn run(&self, cypher: &str) -> Result<()> {
        self.graph
            .run(Query::new(cypher.to_string()))
            .await
            .context("Neo4j query execution failed")?;
        Ok(())
    }

    /// Execute a Cypher query and return a single scalar value.
    async fn query_scalar(&self, cypher: &str, field: &str) -> Result<Option<i64>> {
        let mut result = self
            .graph
            .execute(Query::new(cypher.to_string()))
            .await
            .context("Neo4j query failed")?;

        if let Ok(Some(row)) = result.next().await {
            let val: i64 = row
                .get(field)
                .map_err(|e| anyhow::anyhow!("Failed to get field '{}': {:?}", field, e))?;
            Ok(Some(val))
        } else {
            Ok(None)
        }
    }

    /// Get node and relationship counts for status display.
    pub async fn counts(&self) -> Result<GraphCounts> {
        let nodes = self
            .query_scalar("MATCH (n) RETURN count(n) as count", "count")
            .await?
            .unwrap_or(0);
        let relationships = self
            .query_scalar("MATCH ()-[r]->() RETURN count(r) as count", "count")
            .await?
            .unwrap_or(0);

        Ok(GraphCounts {
            nodes: nodes as usize,
            relationships: relationships as usize,
        })
    }
}

/// Node and relationship counts.
#[derive(Debug, Clone)]
pub struct GraphCounts {
    pub nodes: usize,
    pub relationships: usize,
}
