//! Batched import of rewritten scripts into Neo4j.
//!
//! Node scripts run strictly before edge scripts so that every edge's
//! endpoints already exist when it is created. One bad script never aborts
//! the batch; its failure is recorded and the loop moves on.

use std::path::Path;

use tracing::{error, info, warn};

use cpgload_core::{rewrite_script, CpgLoadError, DiscoveredScripts};

use crate::executor::CypherExecutor;
use crate::schema;

/// Aggregated outcome of an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Scripts that executed successfully.
    pub processed: usize,
    /// Scripts that were discovered, including skipped ones.
    pub total: usize,
    /// Whether any per-script error occurred.
    pub had_errors: bool,
}

impl ImportReport {
    /// Run-level success rule: no errors, and if scripts existed at least
    /// one of them must actually have been processed.
    pub fn ok(&self) -> bool {
        !self.had_errors && (self.total == 0 || self.processed > 0)
    }
}

/// Execute every discovered script against the database.
///
/// Connection-level failures belong to the caller (no executor, no import);
/// everything that goes wrong per script is recovered here and reflected in
/// the returned report.
pub async fn import_scripts(
    executor: &dyn CypherExecutor,
    scripts: &DiscoveredScripts,
) -> ImportReport {
    info!("Starting Neo4j import of {} scripts.", scripts.len());

    // Constraint failure is non-fatal: imports may still partially succeed,
    // only slower or with duplicate risk.
    if let Err(e) = schema::apply_id_constraint(executor).await {
        error!("Failed to apply id constraint: {e:#}");
        warn!("Constraint application failed. Performance might be impacted if scripts use MERGE.");
    }

    let mut report = ImportReport {
        total: scripts.len(),
        ..ImportReport::default()
    };

    for script_path in scripts.node_scripts.iter().chain(&scripts.edge_scripts) {
        import_one(executor, script_path, &mut report).await;
    }

    info!(
        processed = report.processed,
        total = report.total,
        had_errors = report.had_errors,
        "Neo4j import finished."
    );
    if report.had_errors {
        warn!("Import finished, but errors occurred during the process. Please review logs.");
    } else if report.total > 0 && report.processed == 0 {
        warn!("Import finished, but no scripts were successfully processed.");
    }

    report
}

async fn import_one(executor: &dyn CypherExecutor, script_path: &Path, report: &mut ImportReport) {
    let script_name = script_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unnamed>")
        .to_string();
    info!("--- Processing import script: {script_name} ---");

    let text = match std::fs::read_to_string(script_path) {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read script {}: {}", script_path.display(), e);
            report.had_errors = true;
            return;
        }
    };
    if text.trim().is_empty() {
        warn!("Script is empty, skipping: {script_name}");
        return;
    }

    let script_dir = script_path.parent().unwrap_or(Path::new("."));
    let rewritten = match rewrite_script(&script_name, &text, script_dir) {
        Ok(Some(rewritten)) => rewritten,
        Ok(None) => {
            warn!("No processing body after the load clause in {script_name}. Skipping execution.");
            return;
        }
        Err(e @ CpgLoadError::MalformedScript(_)) => {
            error!("{e}");
            error!("Expected format: LOAD CSV FROM 'file:/<name>_data.csv' AS <variable>");
            report.had_errors = true;
            return;
        }
        Err(e @ CpgLoadError::DataFileMissing { .. }) => {
            error!("{e}");
            error!("Ensure the '_data.csv' file exists in the same directory as the script.");
            report.had_errors = true;
            return;
        }
        Err(e) => {
            error!("Failed to rewrite {script_name}: {e}");
            report.had_errors = true;
            return;
        }
    };

    info!(
        "Executing rewritten script {script_name} (data file: {})",
        rewritten.data_file
    );
    match executor.execute(&rewritten.cypher).await {
        Ok(()) => {
            report.processed += 1;
            info!("Successfully executed batch from {script_name}.");
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!("Query error during import of {script_name}: {message}");
            if let Some(hint) = classify_query_error(&message) {
                error!("Hint: {hint}");
            }
            report.had_errors = true;
        }
    }
}

/// Map a query error message onto an actionable hint.
fn classify_query_error(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    if lower.contains("constraint") {
        Some("Check for data violating uniqueness constraints.")
    } else if lower.contains("apoc") {
        Some("Ensure the APOC plugin is installed and configured in Neo4j if the script uses APOC procedures.")
    } else if lower.contains("file access")
        || lower.contains("couldn't load file")
        || lower.contains("directory not configured")
    {
        Some("The Neo4j server likely cannot read the data file. Verify 'server.directories.import' and file permissions for the Neo4j process.")
    } else if lower.contains("transaction") {
        Some("The error occurred during transaction processing, potentially related to batching or query complexity.")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use cpgload_core::discover_scripts;

    /// Records executed statements; fails any statement containing a trigger.
    #[derive(Default)]
    struct FakeExecutor {
        executed: Mutex<Vec<String>>,
        fail_containing: Option<(&'static str, &'static str)>,
    }

    impl FakeExecutor {
        fn failing_on(needle: &'static str, message: &'static str) -> Self {
            Self {
                executed: Mutex::new(Vec::new()),
                fail_containing: Some((needle, message)),
            }
        }

        fn statements(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CypherExecutor for FakeExecutor {
        async fn execute(&self, cypher: &str) -> Result<()> {
            if let Some((needle, message)) = self.fail_containing {
                if cypher.contains(needle) {
                    return Err(anyhow!("{message}"));
                }
            }
            self.executed.lock().unwrap().push(cypher.to_string());
            Ok(())
        }
    }

    fn write_script(dir: &Path, name: &str, data_file: &str, body: &str) -> PathBuf {
        std::fs::write(dir.join(data_file), "id\n1\n").unwrap();
        let path = dir.join(name);
        std::fs::write(
            &path,
            format!("LOAD CSV WITH HEADERS FROM 'file:/{data_file}' AS row\n{body};"),
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn nodes_execute_before_edges() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "edges_x_cypher.csv", "edges_x_data.csv", "MATCH (a) CREATE (a)-[:CALLS]->(a)");
        write_script(dir.path(), "nodes_a_cypher.csv", "nodes_a_data.csv", "MERGE (n:CpgNode {id: row.id})");

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::default();
        let report = import_scripts(&executor, &scripts).await;

        assert!(report.ok());
        assert_eq!(report.processed, 2);

        let statements = executor.statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].starts_with("CREATE CONSTRAINT"));
        assert!(statements[1].contains("nodes_a_data.csv"));
        assert!(statements[2].contains("edges_x_data.csv"));
    }

    #[tokio::test]
    async fn malformed_script_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "nodes_a_cypher.csv", "nodes_a_data.csv", "MERGE (n:CpgNode {id: row.id})");
        std::fs::write(dir.path().join("nodes_b_cypher.csv"), "CREATE (n:Orphan);").unwrap();

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::default();
        let report = import_scripts(&executor, &scripts).await;

        assert!(!report.ok());
        assert!(report.had_errors);
        assert_eq!(report.processed, 1);
    }

    #[tokio::test]
    async fn missing_data_file_is_a_per_script_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("nodes_a_cypher.csv"),
            "LOAD CSV FROM 'file:/nodes_a_data.csv' AS row\nMERGE (n:CpgNode {id: row[0]});",
        )
        .unwrap();

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::default();
        let report = import_scripts(&executor, &scripts).await;

        assert!(!report.ok());
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn zero_scripts_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::default();
        let report = import_scripts(&executor, &scripts).await;

        assert!(report.ok());
        assert_eq!(report.processed, 0);
    }

    #[tokio::test]
    async fn empty_scripts_are_skipped_but_count_as_nothing_accomplished() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("nodes_a_cypher.csv"), "  \n").unwrap();

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::default();
        let report = import_scripts(&executor, &scripts).await;

        // No explicit error, but scripts existed and none was processed.
        assert!(!report.had_errors);
        assert!(!report.ok());
    }

    #[tokio::test]
    async fn constraint_failure_is_nonfatal() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "nodes_a_cypher.csv", "nodes_a_data.csv", "MERGE (n:CpgNode {id: row.id})");

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::failing_on("CREATE CONSTRAINT", "not allowed");
        let report = import_scripts(&executor, &scripts).await;

        assert!(report.ok());
        assert_eq!(report.processed, 1);
    }

    #[tokio::test]
    async fn query_failure_marks_run_but_continues() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "nodes_a_cypher.csv", "nodes_a_data.csv", "MERGE (n:CpgNode {id: row.id})");
        write_script(dir.path(), "nodes_b_cypher.csv", "nodes_b_data.csv", "MERGE (n:CpgNode {id: row.id})");

        let scripts = discover_scripts(dir.path()).unwrap();
        let executor = FakeExecutor::failing_on("nodes_a_data.csv", "couldn't load file");
        let report = import_scripts(&executor, &scripts).await;

        assert!(!report.ok());
        assert_eq!(report.processed, 1);
    }

    #[test]
    fn classifies_known_error_messages() {
        assert!(classify_query_error("violates Constraint `cpg_node_id`")
            .unwrap()
            .contains("uniqueness"));
        assert!(classify_query_error("unknown procedure apoc.periodic.iterate")
            .unwrap()
            .contains("APOC"));
        assert!(classify_query_error("Couldn't load file at file:///x.csv")
            .unwrap()
            .contains("import"));
        assert!(classify_query_error("transaction was rolled back")
            .unwrap()
            .contains("transaction"));
        assert!(classify_query_error("something else entirely").is_none());
    }
}
