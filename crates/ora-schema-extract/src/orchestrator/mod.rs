//! Extraction orchestrator - main workflow coordinator.
//!
//! Processing is strictly sequential: schemas in configured order, object
//! types in catalog order, objects in enumeration order. The orchestrator
//! presents a total function per object. Every failure is converted into
//! a failed extraction record, never an uncaught error, so one broken
//! object cannot abort its siblings, its type, or its schema.

use crate::catalog::{BodyKind, ObjectType};
use crate::cleaner;
use crate::config::Config;
use crate::error::Result;
use crate::inventory::{ExtractionRecord, Inventory, Outcome, Summary};
use crate::source::MetadataSource;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extraction orchestrator.
pub struct Extractor {
    config: Config,
    source: Arc<dyn MetadataSource>,
    inventory: Inventory,
}

/// Result of an extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Unique run identifier.
    pub run_id: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Schemas processed.
    pub schemas_processed: usize,

    /// Objects successfully extracted.
    pub objects_extracted: usize,

    /// Objects that failed.
    pub objects_failed: usize,

    /// Failed objects as `SCHEMA.NAME`.
    pub failed_objects: Vec<String>,

    /// Path of the written manifest.
    pub manifest_path: PathBuf,

    /// Cross-schema summary.
    pub summary: Summary,

    /// Human-readable run report.
    #[serde(skip_serializing)]
    pub report: String,
}

impl ExtractionResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Extractor {
    /// Create a new extractor over a metadata source.
    pub fn new(config: Config, source: Arc<dyn MetadataSource>) -> Self {
        let inventory = Inventory::new(source.database_identifier());
        Self {
            config,
            source,
            inventory,
        }
    }

    /// Run the extraction across all configured schemas.
    pub async fn run(mut self) -> Result<ExtractionResult> {
        let started_at = Utc::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!("Starting extraction run: {}", run_id);

        let schemas: Vec<String> = self
            .config
            .extraction
            .schemas
            .iter()
            .map(|s| s.trim().to_uppercase())
            .collect();
        let types = self.requested_types();

        self.create_directory_tree(&schemas)?;

        for schema in &schemas {
            self.extract_schema(schema, &types).await;
        }

        let manifest_path = self
            .inventory
            .write_manifest(&self.config.extraction.output_dir)?;
        info!("Inventory written to: {:?}", manifest_path);

        let summary = self.inventory.summary();
        let objects_failed = self.inventory.total_failures();
        let mut failed_objects = Vec::new();
        for (schema, ledger) in self.inventory.schemas() {
            for failure in &ledger.errors {
                failed_objects.push(format!("{}.{}", schema, failure.object_name));
            }
        }

        let completed_at = Utc::now();
        let duration_seconds = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;

        info!(
            "Extraction completed: {} objects from {} schema(s) in {:.1}s ({} failed)",
            summary.total_objects,
            summary.total_schemas,
            duration_seconds,
            objects_failed
        );

        Ok(ExtractionResult {
            run_id,
            started_at,
            completed_at,
            duration_seconds,
            schemas_processed: schemas.len(),
            objects_extracted: summary.total_objects,
            objects_failed,
            failed_objects,
            manifest_path,
            summary,
            report: self.inventory.format_summary(),
        })
    }

    /// Resolve the configured object type filter against the catalog.
    /// Unknown identifiers abort only their own entry: warn and continue
    /// with the rest. Catalog order is preserved regardless of the order
    /// the filter lists them in.
    fn requested_types(&self) -> Vec<ObjectType> {
        let ids = match &self.config.extraction.object_types {
            None => return ObjectType::ALL.to_vec(),
            Some(ids) => ids,
        };

        let mut requested = Vec::new();
        for id in ids {
            match ObjectType::parse(id) {
                Ok(object_type) => {
                    if !requested.contains(&object_type) {
                        requested.push(object_type);
                    }
                }
                Err(e) => warn!("Skipping configured object type: {}", e),
            }
        }

        ObjectType::ALL
            .iter()
            .copied()
            .filter(|t| requested.contains(t))
            .collect()
    }

    /// Create the schema/type output directory tree up front.
    fn create_directory_tree(&self, schemas: &[String]) -> Result<()> {
        let output = &self.config.extraction.output_dir;
        std::fs::create_dir_all(output)?;

        for schema in schemas {
            let schema_dir = output.join(schema.to_lowercase());
            for object_type in ObjectType::ALL {
                std::fs::create_dir_all(schema_dir.join(object_type.folder()))?;
            }
        }
        Ok(())
    }

    /// Extract all objects of the requested types from one schema.
    async fn extract_schema(&mut self, schema: &str, types: &[ObjectType]) {
        info!("Processing schema: {}", schema);
        self.inventory.add_schema(schema);

        for &object_type in types {
            let objects = match self.source.list_objects(schema, object_type).await {
                Ok(objects) => objects,
                Err(e) => {
                    warn!(
                        "Skipping {} enumeration for {}: {}",
                        object_type, schema, e
                    );
                    continue;
                }
            };

            for object in objects {
                let record = self.extract_object(schema, object_type, &object.name).await;
                match &record.outcome {
                    Outcome::Success => {
                        debug!("Extracted: {} {}.{}", object_type, schema, object.name)
                    }
                    Outcome::Failure { error } => {
                        warn!("Failed: {} {}.{}: {}", object_type, schema, object.name, error)
                    }
                }
                self.inventory.record(&record);
            }
        }

        self.collect_schema_details(schema).await;
    }

    /// Extract and persist a single object. Total function: the outcome
    /// is always an extraction record.
    async fn extract_object(
        &self,
        schema: &str,
        object_type: ObjectType,
        name: &str,
    ) -> ExtractionRecord {
        match self.try_extract(schema, object_type, name).await {
            Ok(true) => ExtractionRecord::success(schema, object_type, name),
            Ok(false) => ExtractionRecord::failure(
                schema,
                object_type,
                name,
                "Object not found or no privileges",
            ),
            Err(e) => ExtractionRecord::failure(schema, object_type, name, e.to_string()),
        }
    }

    /// Fetch, clean and write one object. `Ok(false)` means not found.
    async fn try_extract(
        &self,
        schema: &str,
        object_type: ObjectType,
        name: &str,
    ) -> Result<bool> {
        let raw = match self
            .source
            .fetch_ddl(object_type.metadata_type(), name, schema)
            .await?
        {
            Some(ddl) if !ddl.trim().is_empty() => ddl,
            _ => return Ok(false),
        };

        let text = match object_type.body_kind() {
            Some(kind) => {
                let body = self.fetch_body(kind, schema, name).await?;
                cleaner::combine_spec_and_body(kind.label(), Some(&raw), body.as_deref())
            }
            None => cleaner::clean(&raw),
        };

        let path = self.object_path(schema, object_type, name);
        std::fs::write(&path, text)?;
        Ok(true)
    }

    /// Fetch the body part of a two-part object. The existence probe
    /// short-circuits the fetch: no probe hit, no doomed round trip.
    async fn fetch_body(
        &self,
        kind: BodyKind,
        schema: &str,
        name: &str,
    ) -> Result<Option<String>> {
        if !self.source.body_exists(kind, schema, name).await? {
            return Ok(None);
        }
        self.source
            .fetch_ddl(kind.metadata_type(), name, schema)
            .await
    }

    fn object_path(&self, schema: &str, object_type: ObjectType, name: &str) -> PathBuf {
        self.config
            .extraction
            .output_dir
            .join(schema.to_lowercase())
            .join(object_type.folder())
            .join(format!("{}{}", name.to_lowercase(), object_type.extension()))
    }

    /// Collect descriptive metadata for the inventory. Each block is
    /// independently fallible; a failure costs the detail section, not
    /// the run.
    async fn collect_schema_details(&mut self, schema: &str) {
        match self.source.table_details(schema).await {
            Ok(details) => self.inventory.set_table_details(schema, details),
            Err(e) => debug!("Could not collect table details for {}: {}", schema, e),
        }
        match self.source.code_object_details(schema).await {
            Ok(details) => self.inventory.set_code_object_details(schema, details),
            Err(e) => debug!("Could not collect procedure details for {}: {}", schema, e),
        }
        match self.source.package_details(schema).await {
            Ok(details) => self.inventory.set_package_details(schema, details),
            Err(e) => debug!("Could not collect package details for {}: {}", schema, e),
        }
        match self.source.source_metrics(schema).await {
            Ok(metrics) => self.inventory.set_source_metrics(schema, metrics),
            Err(e) => debug!("Could not collect source metrics for {}: {}", schema, e),
        }
    }
}
