//! Extraction inventory: the per-run ledger and the JSON manifest.
//!
//! The inventory is additive for the whole run (records are appended,
//! never rewritten) and owned by a single writer, the orchestrator.
//! Summary statistics are recomputed from the ledger on demand rather
//! than maintained as separate state.

use crate::catalog::ObjectType;
use crate::error::Result;
use crate::source::{CodeObjectDetail, PackageDetail, SourceMetric, TableDetail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest file name at the output root.
pub const MANIFEST_FILE: &str = "extraction_inventory.json";

/// Outcome of one attempted object extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { error: String },
}

/// One outcome entry for a single attempted object extraction. Created
/// exactly once per attempt, immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExtractionRecord {
    pub schema: String,
    pub object_type: String,
    pub object_name: String,
    pub outcome: Outcome,
}

impl ExtractionRecord {
    pub fn success(schema: &str, object_type: ObjectType, object_name: &str) -> Self {
        Self {
            schema: schema.to_string(),
            object_type: object_type.type_id().to_string(),
            object_name: object_name.to_string(),
            outcome: Outcome::Success,
        }
    }

    pub fn failure(
        schema: &str,
        object_type: ObjectType,
        object_name: &str,
        error: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.to_string(),
            object_type: object_type.type_id().to_string(),
            object_name: object_name.to_string(),
            outcome: Outcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}

/// One recorded failure, as serialized into the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub object_type: String,
    pub object_name: String,
    pub error: String,
}

/// Per-schema ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaLedger {
    /// Successful extraction counts per object type.
    pub objects_extracted: BTreeMap<String, usize>,

    /// Failed extraction counts per object type.
    pub objects_failed: BTreeMap<String, usize>,

    /// Total files written for this schema.
    pub total_files: usize,

    /// Descriptive table metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_details: Vec<TableDetail>,

    /// Descriptive procedure/function metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_object_details: Vec<CodeObjectDetail>,

    /// Descriptive package metadata.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_details: Vec<PackageDetail>,

    /// Source line metrics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_metrics: Vec<SourceMetric>,

    /// Failures in the order they occurred.
    pub errors: Vec<ExtractionFailure>,
}

/// Cross-schema summary, derived from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_schemas: usize,
    pub total_objects: usize,
    pub objects_by_type: BTreeMap<String, usize>,
}

/// The extraction run ledger.
#[derive(Debug, Clone)]
pub struct Inventory {
    source_database: String,
    extraction_date: DateTime<Utc>,
    schemas: BTreeMap<String, SchemaLedger>,
}

#[derive(Serialize)]
struct ManifestDoc<'a> {
    extraction_date: &'a DateTime<Utc>,
    source_database: &'a str,
    schemas: &'a BTreeMap<String, SchemaLedger>,
    summary: Summary,
}

impl Inventory {
    /// Create an empty inventory for a new run.
    pub fn new(source_database: impl Into<String>) -> Self {
        Self {
            source_database: source_database.into(),
            extraction_date: Utc::now(),
            schemas: BTreeMap::new(),
        }
    }

    /// Initialize tracking for a schema. Idempotent; a schema added here
    /// appears in the manifest even with zero successes.
    pub fn add_schema(&mut self, schema: &str) {
        self.schemas.entry(schema.to_string()).or_default();
    }

    /// Record the outcome of one attempted extraction. Increments exactly
    /// one counter and, on failure, appends to the schema's error list.
    pub fn record(&mut self, record: &ExtractionRecord) {
        let ledger = self.schemas.entry(record.schema.clone()).or_default();

        match &record.outcome {
            Outcome::Success => {
                *ledger
                    .objects_extracted
                    .entry(record.object_type.clone())
                    .or_insert(0) += 1;
                ledger.total_files += 1;
            }
            Outcome::Failure { error } => {
                *ledger
                    .objects_failed
                    .entry(record.object_type.clone())
                    .or_insert(0) += 1;
                ledger.errors.push(ExtractionFailure {
                    object_type: record.object_type.clone(),
                    object_name: record.object_name.clone(),
                    error: error.clone(),
                });
            }
        }
    }

    /// Attach descriptive table metadata to a schema.
    pub fn set_table_details(&mut self, schema: &str, details: Vec<TableDetail>) {
        self.add_schema(schema);
        if let Some(ledger) = self.schemas.get_mut(schema) {
            ledger.table_details = details;
        }
    }

    /// Attach descriptive procedure/function metadata to a schema.
    pub fn set_code_object_details(&mut self, schema: &str, details: Vec<CodeObjectDetail>) {
        self.add_schema(schema);
        if let Some(ledger) = self.schemas.get_mut(schema) {
            ledger.code_object_details = details;
        }
    }

    /// Attach descriptive package metadata to a schema.
    pub fn set_package_details(&mut self, schema: &str, details: Vec<PackageDetail>) {
        self.add_schema(schema);
        if let Some(ledger) = self.schemas.get_mut(schema) {
            ledger.package_details = details;
        }
    }

    /// Attach source line metrics to a schema.
    pub fn set_source_metrics(&mut self, schema: &str, metrics: Vec<SourceMetric>) {
        self.add_schema(schema);
        if let Some(ledger) = self.schemas.get_mut(schema) {
            ledger.source_metrics = metrics;
        }
    }

    /// Ledger for one schema, if tracked.
    pub fn schema(&self, schema: &str) -> Option<&SchemaLedger> {
        self.schemas.get(schema)
    }

    /// All tracked schemas and their ledgers.
    pub fn schemas(&self) -> &BTreeMap<String, SchemaLedger> {
        &self.schemas
    }

    /// Total failures across all schemas.
    pub fn total_failures(&self) -> usize {
        self.schemas.values().map(|s| s.errors.len()).sum()
    }

    /// Compute cross-schema summary statistics. Pure derived view:
    /// calling it any number of times yields the same result and mutates
    /// nothing.
    pub fn summary(&self) -> Summary {
        let mut total_objects = 0;
        let mut objects_by_type: BTreeMap<String, usize> = BTreeMap::new();

        for ledger in self.schemas.values() {
            for (object_type, count) in &ledger.objects_extracted {
                total_objects += count;
                *objects_by_type.entry(object_type.clone()).or_insert(0) += count;
            }
        }

        Summary {
            total_schemas: self.schemas.len(),
            total_objects,
            objects_by_type,
        }
    }

    /// Serialize the manifest to `extraction_inventory.json` at the
    /// output root. Returns the manifest path.
    pub fn write_manifest(&self, output_dir: &Path) -> Result<PathBuf> {
        let doc = ManifestDoc {
            extraction_date: &self.extraction_date,
            source_database: &self.source_database,
            schemas: &self.schemas,
            summary: self.summary(),
        };

        let path = output_dir.join(MANIFEST_FILE);
        let content = serde_json::to_string_pretty(&doc)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Render the human-readable run summary.
    pub fn format_summary(&self) -> String {
        let summary = self.summary();
        let mut out = String::new();

        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str("EXTRACTION SUMMARY\n");
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str(&format!("Extraction Date: {}\n", self.extraction_date));
        out.push_str(&format!("Source Database: {}\n", self.source_database));
        out.push_str(&format!("Schemas Processed: {}\n", summary.total_schemas));
        out.push_str(&format!(
            "Total Objects Extracted: {}\n",
            summary.total_objects
        ));

        if !summary.objects_by_type.is_empty() {
            out.push_str("\nObjects by Type:\n");
            for (object_type, count) in &summary.objects_by_type {
                out.push_str(&format!("  {}: {}\n", object_type, count));
            }
        }

        let total_errors = self.total_failures();
        if total_errors > 0 {
            out.push_str(&format!("\nWarnings/Errors: {}\n", total_errors));
            for (schema, ledger) in &self.schemas {
                for failure in ledger.errors.iter().take(5) {
                    out.push_str(&format!(
                        "  [{}] {}.{}: {}\n",
                        schema, failure.object_type, failure.object_name, failure.error
                    ));
                }
                if ledger.errors.len() > 5 {
                    out.push_str(&format!(
                        "  ... and {} more\n",
                        ledger.errors.len() - 5
                    ));
                }
            }
        }

        out.push_str(&"=".repeat(60));
        out
    }

    /// Rebuild an inventory by scanning an existing extraction tree.
    /// Folder names map back to catalog types; unknown folders are
    /// ignored.
    pub fn scan_output_dir(output_dir: &Path) -> Result<Inventory> {
        let mut inventory = Inventory::new("SCANNED");

        for entry in std::fs::read_dir(output_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let schema_name = entry.file_name().to_string_lossy().to_uppercase();
            if schema_name.starts_with('.') {
                continue;
            }

            for object_type in ObjectType::ALL {
                let type_dir = entry.path().join(object_type.folder());
                if !type_dir.is_dir() {
                    continue;
                }

                let count = std::fs::read_dir(&type_dir)?
                    .filter_map(|f| f.ok())
                    .filter(|f| {
                        f.path()
                            .extension()
                            .map(|ext| ext == "sql")
                            .unwrap_or(false)
                    })
                    .count();

                if count > 0 {
                    inventory.add_schema(&schema_name);
                    if let Some(ledger) = inventory.schemas.get_mut(&schema_name) {
                        ledger
                            .objects_extracted
                            .insert(object_type.type_id().to_string(), count);
                        ledger.total_files += count;
                    }
                }
            }
        }

        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_record_success_increments_one_counter() {
        let mut inventory = Inventory::new("ORCL");
        inventory.record(&ExtractionRecord::success("HR", ObjectType::Table, "EMPLOYEES"));
        inventory.record(&ExtractionRecord::success("HR", ObjectType::Table, "JOBS"));

        let ledger = inventory.schema("HR").unwrap();
        assert_eq!(ledger.objects_extracted.get("TABLE"), Some(&2));
        assert_eq!(ledger.total_files, 2);
        assert!(ledger.objects_failed.is_empty());
        assert!(ledger.errors.is_empty());
    }

    #[test]
    fn test_record_failure_appends_error() {
        let mut inventory = Inventory::new("ORCL");
        inventory.record(&ExtractionRecord::failure(
            "HR",
            ObjectType::Procedure,
            "BROKEN_PROC",
            "ORA-04063: package body has errors",
        ));

        let ledger = inventory.schema("HR").unwrap();
        assert_eq!(ledger.objects_failed.get("PROCEDURE"), Some(&1));
        assert_eq!(ledger.total_files, 0);
        assert_eq!(ledger.errors.len(), 1);
        assert_eq!(ledger.errors[0].object_name, "BROKEN_PROC");
    }

    #[test]
    fn test_summary_is_pure_and_idempotent() {
        let mut inventory = Inventory::new("ORCL");
        inventory.record(&ExtractionRecord::success("HR", ObjectType::Table, "T1"));
        inventory.record(&ExtractionRecord::success("FINANCE", ObjectType::Table, "T2"));
        inventory.record(&ExtractionRecord::success("FINANCE", ObjectType::View, "V1"));

        let first = inventory.summary();
        let second = inventory.summary();
        assert_eq!(first.total_schemas, second.total_schemas);
        assert_eq!(first.total_objects, 3);
        assert_eq!(first.objects_by_type.get("TABLE"), Some(&2));
        assert_eq!(first.objects_by_type.get("VIEW"), Some(&1));
    }

    #[test]
    fn test_empty_schema_appears_in_manifest() {
        let dir = tempdir().unwrap();
        let mut inventory = Inventory::new("ORCL");
        inventory.add_schema("EMPTY_SCHEMA");

        let path = inventory.write_manifest(dir.path()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(doc["schemas"]["EMPTY_SCHEMA"].is_object());
        assert_eq!(doc["summary"]["total_schemas"], 1);
        assert_eq!(doc["summary"]["total_objects"], 0);
    }

    #[test]
    fn test_manifest_structure() {
        let dir = tempdir().unwrap();
        let mut inventory = Inventory::new("ORCL");
        inventory.record(&ExtractionRecord::success("HR", ObjectType::Table, "T1"));
        inventory.record(&ExtractionRecord::failure(
            "HR",
            ObjectType::View,
            "V_BAD",
            "Object not found or no privileges",
        ));

        let path = inventory.write_manifest(dir.path()).unwrap();
        assert!(path.ends_with(MANIFEST_FILE));

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(doc["source_database"], "ORCL");
        assert_eq!(doc["schemas"]["HR"]["objects_extracted"]["TABLE"], 1);
        assert_eq!(doc["schemas"]["HR"]["objects_failed"]["VIEW"], 1);
        assert_eq!(doc["schemas"]["HR"]["errors"][0]["object_name"], "V_BAD");
        assert!(doc["extraction_date"].is_string());
    }

    #[test]
    fn test_format_summary_mentions_errors() {
        let mut inventory = Inventory::new("ORCL");
        inventory.record(&ExtractionRecord::success("HR", ObjectType::Table, "T1"));
        inventory.record(&ExtractionRecord::failure(
            "HR",
            ObjectType::Procedure,
            "P1",
            "boom",
        ));

        let text = inventory.format_summary();
        assert!(text.contains("EXTRACTION SUMMARY"));
        assert!(text.contains("TABLE: 1"));
        assert!(text.contains("Warnings/Errors: 1"));
        assert!(text.contains("P1"));
    }

    #[test]
    fn test_scan_output_dir() {
        let dir = tempdir().unwrap();
        let tables = dir.path().join("hr").join("tables");
        std::fs::create_dir_all(&tables).unwrap();
        std::fs::write(tables.join("employees.sql"), "CREATE TABLE employees;").unwrap();
        std::fs::write(tables.join("jobs.sql"), "CREATE TABLE jobs;").unwrap();
        let views = dir.path().join("hr").join("views");
        std::fs::create_dir_all(&views).unwrap();
        std::fs::write(views.join("emp_v.sql"), "CREATE VIEW emp_v;").unwrap();

        let inventory = Inventory::scan_output_dir(dir.path()).unwrap();
        let ledger = inventory.schema("HR").unwrap();
        assert_eq!(ledger.objects_extracted.get("TABLE"), Some(&2));
        assert_eq!(ledger.objects_extracted.get("VIEW"), Some(&1));
        assert_eq!(ledger.total_files, 3);
    }
}
