//! # ora-schema-extract
//!
//! Oracle schema DDL extraction library for migration analysis.
//!
//! This library extracts object definitions and descriptive metadata from
//! an Oracle catalog and writes them to a structured file tree plus a
//! JSON manifest, with support for:
//!
//! - **Catalog-driven dispatch** over the twelve supported object types
//! - **DDL cleanup** removing storage and placement clauses while
//!   preserving the logical SQL
//! - **Two-part objects** (packages, types) stitched from specification
//!   and body, with a cheap body-existence probe
//! - **Failure isolation**: one broken object never aborts its siblings;
//!   failures are recorded in the manifest instead of the exit code
//! - **Offline scripts** (SQL*Plus / PL/SQL UTL_FILE) for environments
//!   without direct connectivity
//!
//! ## Example
//!
//! ```rust,no_run
//! use ora_schema_extract::{Config, Extractor, OracleMetadataSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> ora_schema_extract::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let source = OracleMetadataSource::connect(&config.connection).await?;
//!     let result = Extractor::new(config, Arc::new(source)).run().await?;
//!     println!("Extracted {} objects", result.objects_extracted);
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod inventory;
pub mod orchestrator;
pub mod scripts;
pub mod source;

// Re-exports for convenient access
pub use catalog::{BodyKind, ObjectType};
pub use config::{Config, ConnectionConfig, ExtractionConfig};
pub use error::{ExtractError, Result};
pub use inventory::{ExtractionRecord, Inventory, Outcome, Summary};
pub use orchestrator::{ExtractionResult, Extractor};
pub use source::{MetadataSource, ObjectRef, OracleMetadataSource};
