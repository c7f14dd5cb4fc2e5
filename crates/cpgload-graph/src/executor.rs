//! Capability seam between the import driver and the database.

use anyhow::Result;
use async_trait::async_trait;

use crate::GraphClient;

/// Anything that can execute a Cypher statement.
///
/// The import driver only ever submits statements and observes
/// success/failure, so this one-method trait is the whole surface it needs.
/// Tests drive the driver with recording fakes instead of a live server.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    async fn execute(&self, cypher: &str) -> Result<()>;
}

#[async_trait]
impl CypherExecutor for GraphClient {
    async fn execute(&self, cypher: &str) -> Result<()> {
        self.run(cypher).await
    }
}
