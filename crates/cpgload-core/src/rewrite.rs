//! Import-script rewriting.
//!
//! The generated import scripts are written for whole-file, single-transaction
//! execution against a file path relative to wherever the export ran. Neither
//! works here: the Neo4j server resolves `LOAD CSV` paths against its own
//! configured import root, and a single transaction over a large CSV exhausts
//! server memory. Rewriting fixes both: the file reference becomes
//! `file:///<name>` and the processing body is wrapped in an explicit
//! `CALL { .. } IN TRANSACTIONS` block.
//!
//! The clause is located exactly once; every later edit is a substring splice
//! using the boundaries of that single match, so there is no re-matching
//! against already-modified text.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CpgLoadError, CpgLoadResult};

/// Rows per transaction in the wrapped execution block.
pub const BATCH_SIZE: usize = 1000;

/// A script rewritten for server-side, batched execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenScript {
    /// The full Cypher text to execute.
    pub cypher: String,
    /// Bare name of the data file the script loads, as the server will see it.
    pub data_file: String,
}

/// The single data-loading clause of an import script.
struct LoadClause<'a> {
    /// Byte offset where the clause starts.
    start: usize,
    /// Byte offset just past the clause.
    end: usize,
    /// Keyword run up to and including `FROM `, verbatim.
    prefix: &'a str,
    /// Relative path inside the `'file:/...'` literal.
    relative_path: &'a str,
    /// ` AS <identifier>` run, verbatim.
    suffix: &'a str,
    /// The bound row variable.
    variable: &'a str,
}

fn load_clause_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(LOAD\s+CSV(?:\s+WITH\s+HEADERS)?\s+FROM\s+)'file:/([^']+)'(\s+AS\s+(\w+))")
            .expect("load clause pattern is valid")
    })
}

/// Locate the first load clause in `text`, ignoring the final terminator
/// character.
fn find_load_clause(text: &str) -> Option<LoadClause<'_>> {
    let window_end = text
        .len()
        .saturating_sub(text.chars().next_back().map_or(0, char::len_utf8));
    let caps = load_clause_pattern().captures(&text[..window_end])?;
    let whole = caps.get(0)?;
    Some(LoadClause {
        start: whole.start(),
        end: whole.end(),
        prefix: caps.get(1)?.as_str(),
        relative_path: caps.get(2)?.as_str(),
        suffix: caps.get(3)?.as_str(),
        variable: caps.get(4)?.as_str(),
    })
}

/// Rewrite one import script for batched execution.
///
/// `script_name` identifies the script in errors and in the trailing feedback
/// statement; `script_dir` is the directory holding the script and its data
/// file. Returns `Ok(None)` when the script has a load clause but no
/// processing body (nothing to execute, but not an error).
pub fn rewrite_script(
    script_name: &str,
    text: &str,
    script_dir: &Path,
) -> CpgLoadResult<Option<RewrittenScript>> {
    let clause = find_load_clause(text)
        .ok_or_else(|| CpgLoadError::MalformedScript(script_name.to_string()))?;

    // The data file must sit next to the script regardless of what directory
    // prefix the generated reference carries.
    let data_file_name = Path::new(clause.relative_path)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CpgLoadError::MalformedScript(script_name.to_string()))?
        .to_string();
    let data_file_path = script_dir.join(&data_file_name);
    if !data_file_path.is_file() {
        return Err(CpgLoadError::DataFileMissing {
            script: script_name.to_string(),
            path: data_file_path,
        });
    }

    // Head: everything before the clause, then the clause itself with only
    // the file reference swapped for the server-resolved form.
    let head = format!(
        "{}{}'file:///{}'{}",
        &text[..clause.start],
        clause.prefix,
        data_file_name,
        clause.suffix
    );

    let body = text[clause.end..].trim();
    if body.is_empty() {
        return Ok(None);
    }
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();

    let cypher = format!(
        "{head}\nCALL {{\n    WITH {var}\n    {body}\n}} IN TRANSACTIONS OF {BATCH_SIZE} ROWS\nRETURN 'Batch processed from {script_name}'",
        var = clause.variable,
        body = body.replace('\n', "\n    "),
    );

    Ok(Some(RewrittenScript { cypher, data_file: data_file_name }))
}
