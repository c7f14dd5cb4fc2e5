//! Neo4j schema initialization.

use anyhow::Result;
use tracing::info;

use crate::executor::CypherExecutor;

/// Uniqueness constraint on imported node ids.
///
/// Safe to run multiple times - uses an IF NOT EXISTS clause. Without it,
/// MERGE-heavy import scripts fall back to full label scans.
const ID_CONSTRAINT: &str =
    "CREATE CONSTRAINT cpg_node_id IF NOT EXISTS FOR (n:CpgNode) REQUIRE n.id IS UNIQUE";

/// Apply the id uniqueness constraint, idempotently.
pub async fn apply_id_constraint(executor: &dyn CypherExecutor) -> Result<()> {
    info!("Applying constraint: {}", ID_CONSTRAINT);
    executor.execute(ID_CONSTRAINT).await?;
    info!("Constraint check/creation successful or constraint already existed.");
    Ok(())
}
