//! Oracle metadata source backed by the `oracle` driver.
//!
//! The driver is blocking, so every call runs under `spawn_blocking`.
//! Vendor error classification lives here and nowhere else: the rest of
//! the crate sees `Ok(None)` for "absent or not visible", keyed on ORA
//! error codes rather than message text.

use super::{
    queries, CodeObjectDetail, MetadataSource, ObjectRef, PackageDetail, SourceMetric,
    TableDetail,
};
use crate::catalog::{BodyKind, ObjectType};
use crate::config::ConnectionConfig;
use crate::error::{ExtractError, Result};
use async_trait::async_trait;
use oracle::Connection;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info, warn};

/// ORA codes meaning "object absent or not visible to the caller":
/// ORA-31603 (object not found in schema), ORA-00942 (table or view does
/// not exist), ORA-01031 (insufficient privileges).
const NOT_FOUND_CODES: [i32; 3] = [31603, 942, 1031];

/// ORA-31608: no dependent objects of the requested kind.
const NO_DEPENDENTS_CODE: i32 = 31608;

/// DBMS_METADATA session transform parameters applied at connect time.
/// Storage attributes are switched off at the source; the cleaner catches
/// whatever slips through on servers that ignore some of these.
const TRANSFORM_PARAMS: [(&str, &str); 7] = [
    ("SEGMENT_ATTRIBUTES", "FALSE"),
    ("STORAGE", "FALSE"),
    ("TABLESPACE", "FALSE"),
    ("PRETTY", "TRUE"),
    ("SQLTERMINATOR", "TRUE"),
    ("CONSTRAINTS_AS_ALTER", "FALSE"),
    ("REF_CONSTRAINTS", "TRUE"),
];

/// Metadata source implementation over a single Oracle session.
pub struct OracleMetadataSource {
    conn: Arc<Connection>,
    identifier: String,
}

impl OracleMetadataSource {
    /// Open a session and configure DBMS_METADATA transforms.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let descriptor = config.connect_descriptor();
        let user = config.user.clone();
        let password = config.password.clone();

        let conn = task::spawn_blocking(move || -> Result<Connection> {
            let conn = Connection::connect(&user, &password, &descriptor)?;
            apply_transform_params(&conn);
            Ok(conn)
        })
        .await
        .map_err(|e| ExtractError::metadata("session", format!("connect task failed: {}", e)))??;

        info!(
            "Connected to Oracle: {} as {}",
            config.connect_descriptor(),
            config.user
        );

        Ok(Self {
            conn: Arc::new(conn),
            identifier: config.identifier(),
        })
    }

    /// Run a blocking driver call on the worker pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || f(&conn))
            .await
            .map_err(|e| ExtractError::metadata("session", format!("worker task failed: {}", e)))?
    }
}

/// Configure DBMS_METADATA for clean DDL output. Per-parameter failures
/// are warnings: not every parameter exists on every server version.
fn apply_transform_params(conn: &Connection) {
    for (param, value) in TRANSFORM_PARAMS {
        let block = format!(
            "BEGIN DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, '{}', {}); END;",
            param, value
        );
        if let Err(e) = conn.execute(&block, &[]) {
            warn!("Could not set transform parameter {}: {}", param, e);
        }
    }
}

fn error_code(err: &oracle::Error) -> Option<i32> {
    err.db_error().map(|db| db.code())
}

fn is_not_found(err: &oracle::Error) -> bool {
    error_code(err).map_or(false, |code| NOT_FOUND_CODES.contains(&code))
}

#[async_trait]
impl MetadataSource for OracleMetadataSource {
    async fn fetch_ddl(
        &self,
        metadata_type: &str,
        name: &str,
        schema: &str,
    ) -> Result<Option<String>> {
        let object_type = metadata_type.to_string();
        let object_name = name.to_string();
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            let fetched = conn.query_row_as_named::<Option<String>>(
                queries::GET_DDL,
                &[
                    ("obj_type", &object_type),
                    ("obj_name", &object_name),
                    ("owner", &owner),
                ],
            );
            match fetched {
                Ok(ddl) => Ok(ddl),
                Err(ref e) if is_not_found(e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn fetch_dependent_ddl(
        &self,
        dependent_type: &str,
        base_name: &str,
        schema: &str,
    ) -> Result<Option<String>> {
        let dep_type = dependent_type.to_string();
        let object_name = base_name.to_string();
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            let fetched = conn.query_row_as_named::<Option<String>>(
                queries::GET_DEPENDENT_DDL,
                &[
                    ("dep_type", &dep_type),
                    ("obj_name", &object_name),
                    ("owner", &owner),
                ],
            );
            match fetched {
                Ok(ddl) => Ok(ddl),
                Err(ref e) if error_code(e) == Some(NO_DEPENDENTS_CODE) => Ok(None),
                Err(ref e) if is_not_found(e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    async fn body_exists(&self, kind: BodyKind, schema: &str, name: &str) -> Result<bool> {
        let owner = schema.to_uppercase();
        let object_name = name.to_string();
        let body_type = queries::body_probe_type(kind);

        self.blocking(move |conn| {
            let count = conn.query_row_as_named::<i64>(
                queries::BODY_EXISTS,
                &[
                    ("schema", &owner),
                    ("name", &object_name),
                    ("body_type", &body_type),
                ],
            )?;
            Ok(count > 0)
        })
        .await
    }

    async fn list_objects(
        &self,
        schema: &str,
        object_type: ObjectType,
    ) -> Result<Vec<ObjectRef>> {
        let owner = schema.to_uppercase();

        let objects = self
            .blocking(move |conn| {
                let rows = conn.query_as_named::<(String, String)>(
                    queries::list_sql(object_type),
                    &[("schema", &owner)],
                )?;
                let mut objects = Vec::new();
                for row in rows {
                    let (owner, name) = row?;
                    objects.push(ObjectRef { owner, name });
                }
                Ok(objects)
            })
            .await?;

        debug!("Found {} {} object(s) in {}", objects.len(), object_type, schema);
        Ok(objects)
    }

    async fn table_details(&self, schema: &str) -> Result<Vec<TableDetail>> {
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            type Row = (
                String,
                Option<i64>,
                Option<i64>,
                Option<i64>,
                Option<String>,
                i64,
                i64,
                i64,
            );
            let rows =
                conn.query_as_named::<Row>(queries::TABLE_DETAILS, &[("schema", &owner)])?;
            let mut details = Vec::new();
            for row in rows {
                let (table_name, num_rows, blocks, avg_row_len, last_analyzed, columns, indexes, fks) =
                    row?;
                details.push(TableDetail {
                    table_name,
                    num_rows,
                    blocks,
                    avg_row_len,
                    last_analyzed,
                    column_count: columns,
                    index_count: indexes,
                    fk_count: fks,
                });
            }
            Ok(details)
        })
        .await
    }

    async fn code_object_details(&self, schema: &str) -> Result<Vec<CodeObjectDetail>> {
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            type Row = (
                String,
                String,
                Option<String>,
                Option<String>,
                Option<String>,
                i64,
            );
            let rows =
                conn.query_as_named::<Row>(queries::CODE_OBJECT_DETAILS, &[("schema", &owner)])?;
            let mut details = Vec::new();
            for row in rows {
                let (object_name, object_type, created, last_ddl_time, status, line_count) = row?;
                details.push(CodeObjectDetail {
                    object_name,
                    object_type,
                    created,
                    last_ddl_time,
                    status,
                    line_count,
                });
            }
            Ok(details)
        })
        .await
    }

    async fn package_details(&self, schema: &str) -> Result<Vec<PackageDetail>> {
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            type Row = (
                String,
                Option<String>,
                Option<String>,
                Option<String>,
                i64,
                i64,
                Option<String>,
            );
            let rows =
                conn.query_as_named::<Row>(queries::PACKAGE_DETAILS, &[("schema", &owner)])?;
            let mut details = Vec::new();
            for row in rows {
                let (object_name, created, last_ddl_time, status, spec_lines, body_lines, body_status) =
                    row?;
                details.push(PackageDetail {
                    object_name,
                    created,
                    last_ddl_time,
                    status,
                    spec_lines,
                    body_lines,
                    body_status,
                });
            }
            Ok(details)
        })
        .await
    }

    async fn source_metrics(&self, schema: &str) -> Result<Vec<SourceMetric>> {
        let owner = schema.to_uppercase();

        self.blocking(move |conn| {
            let rows = conn.query_as_named::<(String, String, i64, i64)>(
                queries::SOURCE_METRICS,
                &[("schema", &owner)],
            )?;
            let mut metrics = Vec::new();
            for row in rows {
                let (object_type, object_name, line_count, comment_lines) = row?;
                metrics.push(SourceMetric {
                    object_type,
                    object_name,
                    line_count,
                    comment_lines,
                });
            }
            Ok(metrics)
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.blocking(|conn| {
            conn.query_row_as::<i64>("SELECT 1 FROM DUAL", &[])?;
            Ok(())
        })
        .await
    }

    fn database_identifier(&self) -> String {
        self.identifier.clone()
    }
}
