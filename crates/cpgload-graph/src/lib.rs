//! # cpgload-graph
//!
//! Neo4j integration for cpgload: connection client with an eager
//! connectivity check, the executor seam the import driver runs against,
//! schema constraint setup, and the batched import driver itself.

pub mod client;
pub mod executor;
pub mod import;
pub mod schema;

pub use client::{GraphClient, GraphConfig, GraphCounts};
pub use executor::CypherExecutor;
pub use import::{import_scripts, ImportReport};
