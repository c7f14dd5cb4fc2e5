//! # cpgload-core
//!
//! Core pipeline pieces for importing code-property-graph exports into Neo4j:
//! external command execution, Joern invocation wrappers, import-script
//! discovery and staging, and the import-script rewriter.

pub mod discover;
pub mod error;
pub mod joern;
pub mod process;
pub mod rewrite;

pub use discover::{discover_scripts, stage_data_files, DiscoveredScripts};
pub use error::{CpgLoadError, CpgLoadResult};
pub use process::{ProcessRunner, SystemRunner};
pub use rewrite::{rewrite_script, RewrittenScript, BATCH_SIZE};
