//! Discovery and staging of exported import artifacts.
//!
//! The export step drops three kinds of files into one directory:
//! `nodes_*_cypher.csv` and `edges_*_cypher.csv` (generated import scripts)
//! and `*_data.csv` (the CSV payloads the scripts load).

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{CpgLoadError, CpgLoadResult};

/// Import scripts found in an export directory, split by kind.
#[derive(Debug, Default, Clone)]
pub struct DiscoveredScripts {
    pub node_scripts: Vec<PathBuf>,
    pub edge_scripts: Vec<PathBuf>,
}

impl DiscoveredScripts {
    pub fn is_empty(&self) -> bool {
        self.node_scripts.is_empty() && self.edge_scripts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.node_scripts.len() + self.edge_scripts.len()
    }
}

/// Find node and edge import scripts in `export_dir`.
///
/// Both lists come back in lexicographic order. Execution order is
/// deterministic because of this; nodes must land before edges, and within a
/// kind the order only affects when constraint checks fire, not correctness.
pub fn discover_scripts(export_dir: &Path) -> CpgLoadResult<DiscoveredScripts> {
    if !export_dir.is_dir() {
        error!("Export directory not found or is not a directory: {}", export_dir.display());
        return Err(CpgLoadError::ExportDirNotFound(export_dir.to_path_buf()));
    }

    info!("Searching for Cypher import scripts (*_cypher.csv) in: {}", export_dir.display());

    let mut node_scripts = list_matching(export_dir, "nodes_", "_cypher.csv")?;
    let mut edge_scripts = list_matching(export_dir, "edges_", "_cypher.csv")?;
    node_scripts.sort();
    edge_scripts.sort();

    info!("Found {} node scripts.", node_scripts.len());
    info!("Found {} edge scripts.", edge_scripts.len());

    let discovered = DiscoveredScripts { node_scripts, edge_scripts };
    if discovered.is_empty() {
        warn!(
            "No '*_cypher.csv' files found in {}. Ensure the export step generated these files.",
            export_dir.display()
        );
    }

    Ok(discovered)
}

/// Copy every `*_data.csv` file from `export_dir` into `import_dir`.
///
/// The rewritten scripts reference data files by bare name against the Neo4j
/// server's own import root, so the payloads must be staged there before any
/// script executes. Returns the number of files copied; a single failed copy
/// is logged and skipped rather than aborting the rest.
pub fn stage_data_files(export_dir: &Path, import_dir: &Path) -> CpgLoadResult<usize> {
    std::fs::create_dir_all(import_dir)?;

    info!(
        "Copying *_data.csv files from {} to {}...",
        export_dir.display(),
        import_dir.display()
    );

    let mut data_files = list_matching(export_dir, "", "_data.csv")?;
    data_files.sort();

    let mut copied = 0usize;
    for data_file in &data_files {
        // list_matching only returns files with a final component
        let name = data_file.file_name().unwrap();
        match std::fs::copy(data_file, import_dir.join(name)) {
            Ok(_) => copied += 1,
            Err(e) => error!(
                "Failed to copy {} to {}: {}",
                data_file.display(),
                import_dir.display(),
                e
            ),
        }
    }

    info!("Finished copying {} data files.", copied);
    Ok(copied)
}

/// List regular files in `dir` whose name starts with `prefix` and ends with
/// `suffix`.
fn list_matching(dir: &Path, prefix: &str, suffix: &str) -> CpgLoadResult<Vec<PathBuf>> {
    let mut matches = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(prefix) && name.ends_with(suffix) {
            matches.push(entry.path());
        }
    }
    Ok(matches)
}
