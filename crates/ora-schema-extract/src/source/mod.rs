//! Metadata source abstraction and the Oracle-backed implementation.
//!
//! The orchestrator only ever talks to the [`MetadataSource`] trait. The
//! trait encodes "object not found / no privilege" as `Ok(None)` rather
//! than an error, so callers branch on a typed outcome instead of
//! inspecting vendor error text; classification is the adapter's job.

pub mod oracle;
pub mod queries;

pub use self::oracle::OracleMetadataSource;

use crate::catalog::{BodyKind, ObjectType};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One enumerated object: owner plus name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Owning schema.
    pub owner: String,

    /// Object name.
    pub name: String,
}

/// Per-table descriptive metadata collected for the inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDetail {
    /// Table name.
    pub table_name: String,

    /// Optimizer row count, if statistics exist.
    pub num_rows: Option<i64>,

    /// Allocated blocks.
    pub blocks: Option<i64>,

    /// Average row length in bytes.
    pub avg_row_len: Option<i64>,

    /// When statistics were last gathered.
    pub last_analyzed: Option<String>,

    /// Number of columns.
    pub column_count: i64,

    /// Number of indexes on the table.
    pub index_count: i64,

    /// Number of referential (foreign key) constraints.
    pub fk_count: i64,
}

/// Per-procedure/function descriptive metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeObjectDetail {
    /// Object name.
    pub object_name: String,

    /// PROCEDURE or FUNCTION.
    pub object_type: String,

    /// Creation timestamp.
    pub created: Option<String>,

    /// Last DDL timestamp.
    pub last_ddl_time: Option<String>,

    /// Compilation status (VALID/INVALID).
    pub status: Option<String>,

    /// Source line count.
    pub line_count: i64,
}

/// Per-package descriptive metadata, including body status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDetail {
    /// Package name.
    pub object_name: String,

    /// Creation timestamp.
    pub created: Option<String>,

    /// Last DDL timestamp.
    pub last_ddl_time: Option<String>,

    /// Specification compilation status.
    pub status: Option<String>,

    /// Specification source line count.
    pub spec_lines: i64,

    /// Body source line count (0 when no body exists).
    pub body_lines: i64,

    /// Body compilation status, if a body exists.
    pub body_status: Option<String>,
}

/// Source-code size metrics for one stored program unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetric {
    /// Object type as stored in the source view.
    pub object_type: String,

    /// Object name.
    pub object_name: String,

    /// Total source lines.
    pub line_count: i64,

    /// Comment-only lines.
    pub comment_lines: i64,
}

/// The external system queried for object lists, DDL text and descriptive
/// metadata.
///
/// Implementations must classify their own failures: an absent object or a
/// missing privilege is `Ok(None)` / `Ok(false)`, never an `Err`. Anything
/// else (connectivity loss, malformed session state) propagates as an
/// error and is isolated per object by the orchestrator.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch generated DDL for one object. `metadata_type` is the
    /// catalog's metadata identifier (see [`ObjectType::metadata_type`]).
    /// Returns `Ok(None)` when the object does not exist or the caller
    /// lacks privileges on it.
    async fn fetch_ddl(
        &self,
        metadata_type: &str,
        name: &str,
        schema: &str,
    ) -> Result<Option<String>>;

    /// Fetch DDL for dependent objects (indexes, constraints, ...) of a
    /// base object. Returns `Ok(None)` when no dependents of that kind
    /// exist.
    async fn fetch_dependent_ddl(
        &self,
        dependent_type: &str,
        base_name: &str,
        schema: &str,
    ) -> Result<Option<String>>;

    /// Cheap existence probe for a package or type body, issued before
    /// attempting the body fetch.
    async fn body_exists(&self, kind: BodyKind, schema: &str, name: &str) -> Result<bool>;

    /// Enumerate objects of one type in a schema, in the order the
    /// catalog query returns them.
    async fn list_objects(&self, schema: &str, object_type: ObjectType)
        -> Result<Vec<ObjectRef>>;

    /// Descriptive table metadata for the inventory.
    async fn table_details(&self, schema: &str) -> Result<Vec<TableDetail>>;

    /// Descriptive procedure/function metadata for the inventory.
    async fn code_object_details(&self, schema: &str) -> Result<Vec<CodeObjectDetail>>;

    /// Descriptive package metadata for the inventory.
    async fn package_details(&self, schema: &str) -> Result<Vec<PackageDetail>>;

    /// Source line metrics for the inventory.
    async fn source_metrics(&self, schema: &str) -> Result<Vec<SourceMetric>>;

    /// Connectivity probe.
    async fn ping(&self) -> Result<()>;

    /// Identifier of the backing database, recorded in the manifest.
    fn database_identifier(&self) -> String;
}
