//! Joern CLI invocation wrappers.
//!
//! Two external steps produce everything this tool imports: `joern-parse`
//! turns a source tree into a CPG binary, and `joern-export` turns the CPG
//! into CSV data files plus generated Cypher import scripts.

use std::path::Path;

use tracing::info;

use crate::error::{CpgLoadError, CpgLoadResult};
use crate::process::ProcessRunner;

/// Default JVM memory allocation passed through to the Joern launchers.
pub const DEFAULT_JVM_MEM: &str = "-J-Xmx4G";

/// Export format understood by the Neo4j import pipeline.
const EXPORT_FORMAT: &str = "neo4jcsv";

/// Parse a source file or directory into a CPG binary.
pub fn run_parse(
    runner: &dyn ProcessRunner,
    input: &Path,
    cpg_out: &Path,
    jvm_mem: &str,
) -> CpgLoadResult<()> {
    info!("Starting Joern parse for: {}", input.display());

    let input = path_arg(input)?;
    let cpg_out_arg = path_arg(cpg_out)?;
    runner.run(
        "joern-parse",
        &[jvm_mem, input, "--output", cpg_out_arg],
        None,
    )?;

    info!("Joern parsing successful. CPG saved to: {}", cpg_out.display());
    Ok(())
}

/// Export a CPG binary into CSV files and Cypher import scripts.
///
/// `joern-export` refuses to run when the output directory already exists, so
/// a stale directory from a previous run is removed first.
pub fn run_export(
    runner: &dyn ProcessRunner,
    cpg_in: &Path,
    export_dir: &Path,
    jvm_mem: &str,
) -> CpgLoadResult<()> {
    if export_dir.exists() {
        info!("Removing existing export directory: {}", export_dir.display());
        std::fs::remove_dir_all(export_dir)?;
    }

    info!("Starting Joern export for: {}", cpg_in.display());

    let cpg_in_arg = path_arg(cpg_in)?;
    let export_dir_arg = path_arg(export_dir)?;
    runner.run(
        "joern-export",
        &[
            jvm_mem,
            cpg_in_arg,
            "--repr",
            "all",
            "--format",
            EXPORT_FORMAT,
            "--out",
            export_dir_arg,
        ],
        None,
    )?;

    info!("Joern export successful. Files exported to: {}", export_dir.display());
    Ok(())
}

fn path_arg(path: &Path) -> CpgLoadResult<&str> {
    path.to_str()
        .ok_or_else(|| CpgLoadError::validation(format!("Path is not valid UTF-8: {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Records invocations instead of launching anything.
    struct RecordingRunner {
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self { calls: RefCell::new(Vec::new()) }
        }
    }

    impl ProcessRunner for RecordingRunner {
        fn run(&self, program: &str, args: &[&str], _cwd: Option<&Path>) -> CpgLoadResult<String> {
            self.calls.borrow_mut().push((
                program.to_string(),
                args.iter().map(|a| a.to_string()).collect(),
            ));
            Ok(String::new())
        }
    }

    #[test]
    fn parse_builds_expected_command_line() {
        let runner = RecordingRunner::new();
        run_parse(
            &runner,
            Path::new("src/app"),
            Path::new("out/cpg.bin"),
            DEFAULT_JVM_MEM,
        )
        .unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "joern-parse");
        assert_eq!(
            calls[0].1,
            vec!["-J-Xmx4G", "src/app", "--output", "out/cpg.bin"]
        );
    }

    #[test]
    fn export_removes_stale_directory_first() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("neo4j_csv");
        std::fs::create_dir(&export_dir).unwrap();
        std::fs::write(export_dir.join("stale.csv"), "x").unwrap();

        let runner = RecordingRunner::new();
        run_export(&runner, &PathBuf::from("cpg.bin"), &export_dir, DEFAULT_JVM_MEM).unwrap();

        assert!(!export_dir.exists());
        let calls = runner.calls.borrow();
        assert_eq!(calls[0].0, "joern-export");
        assert!(calls[0].1.contains(&"neo4jcsv".to_string()));
        assert!(calls[0].1.contains(&"--repr".to_string()));
    }
}
