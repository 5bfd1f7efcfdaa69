//! Catalog queries for enumerating schema objects and collecting
//! descriptive metadata.
//!
//! Every enumeration query selects `(owner, object_name)` with a uniform
//! `object_name` alias so callers (and the generated offline scripts) can
//! treat all twelve object types the same way.

use crate::catalog::{BodyKind, ObjectType};

/// Tables, excluding nested tables, secondary objects and recycle-bin
/// leftovers.
pub const TABLES: &str = "\
    SELECT owner, table_name AS object_name
    FROM all_tables
    WHERE owner = :schema
    AND nested = 'NO'
    AND secondary = 'N'
    AND table_name NOT LIKE 'BIN$%'
    ORDER BY table_name";

pub const VIEWS: &str = "\
    SELECT owner, view_name AS object_name
    FROM all_views
    WHERE owner = :schema
    ORDER BY view_name";

/// Standalone procedures only; packaged procedures have a procedure_name.
pub const PROCEDURES: &str = "\
    SELECT owner, object_name
    FROM all_procedures
    WHERE owner = :schema
    AND object_type = 'PROCEDURE'
    AND procedure_name IS NULL
    ORDER BY object_name";

/// Standalone functions only; packaged functions have a procedure_name.
pub const FUNCTIONS: &str = "\
    SELECT owner, object_name
    FROM all_procedures
    WHERE owner = :schema
    AND object_type = 'FUNCTION'
    AND procedure_name IS NULL
    ORDER BY object_name";

pub const PACKAGES: &str = "\
    SELECT owner, object_name
    FROM all_objects
    WHERE owner = :schema
    AND object_type = 'PACKAGE'
    ORDER BY object_name";

/// Indexes, excluding LOB indexes and system-generated ones.
pub const INDEXES: &str = "\
    SELECT owner, index_name AS object_name
    FROM all_indexes
    WHERE owner = :schema
    AND index_type NOT IN ('LOB')
    AND index_name NOT LIKE 'SYS_%'
    AND generated = 'N'
    ORDER BY index_name";

pub const SEQUENCES: &str = "\
    SELECT sequence_owner AS owner, sequence_name AS object_name
    FROM all_sequences
    WHERE sequence_owner = :schema
    ORDER BY sequence_name";

pub const TRIGGERS: &str = "\
    SELECT owner, trigger_name AS object_name
    FROM all_triggers
    WHERE owner = :schema
    ORDER BY trigger_name";

pub const TYPES: &str = "\
    SELECT owner, type_name AS object_name
    FROM all_types
    WHERE owner = :schema
    ORDER BY type_name";

pub const MATERIALIZED_VIEWS: &str = "\
    SELECT owner, mview_name AS object_name
    FROM all_mviews
    WHERE owner = :schema
    ORDER BY mview_name";

pub const SYNONYMS: &str = "\
    SELECT owner, synonym_name AS object_name
    FROM all_synonyms
    WHERE owner = :schema
    ORDER BY synonym_name";

pub const DATABASE_LINKS: &str = "\
    SELECT owner, db_link AS object_name
    FROM all_db_links
    WHERE owner = :schema
    ORDER BY db_link";

/// DDL fetch through DBMS_METADATA.
pub const GET_DDL: &str =
    "SELECT DBMS_METADATA.GET_DDL(:obj_type, :obj_name, :owner) FROM DUAL";

/// Dependent DDL fetch (indexes, constraints, ...) for a base object.
pub const GET_DEPENDENT_DDL: &str =
    "SELECT DBMS_METADATA.GET_DEPENDENT_DDL(:dep_type, :obj_name, :owner) FROM DUAL";

/// Body existence probe; bound with the body's catalog object type.
pub const BODY_EXISTS: &str = "\
    SELECT COUNT(*)
    FROM all_objects
    WHERE owner = :schema
    AND object_name = :name
    AND object_type = :body_type";

/// Table details for the inventory, with column/index/FK counts.
pub const TABLE_DETAILS: &str = "\
    SELECT
        t.table_name,
        t.num_rows,
        t.blocks,
        t.avg_row_len,
        TO_CHAR(t.last_analyzed, 'YYYY-MM-DD HH24:MI:SS'),
        (SELECT COUNT(*) FROM all_tab_columns c
         WHERE c.owner = t.owner AND c.table_name = t.table_name),
        (SELECT COUNT(*) FROM all_indexes i
         WHERE i.owner = t.owner AND i.table_name = t.table_name),
        (SELECT COUNT(*) FROM all_constraints c
         WHERE c.owner = t.owner AND c.table_name = t.table_name
         AND c.constraint_type = 'R')
    FROM all_tables t
    WHERE t.owner = :schema
    AND t.nested = 'NO'
    AND t.secondary = 'N'
    AND t.table_name NOT LIKE 'BIN$%'
    ORDER BY t.table_name";

/// Procedure/function details for the inventory.
pub const CODE_OBJECT_DETAILS: &str = "\
    SELECT
        p.object_name,
        p.object_type,
        TO_CHAR(p.created, 'YYYY-MM-DD HH24:MI:SS'),
        TO_CHAR(p.last_ddl_time, 'YYYY-MM-DD HH24:MI:SS'),
        p.status,
        (SELECT COUNT(*) FROM all_source s
         WHERE s.owner = p.owner AND s.name = p.object_name AND s.type = p.object_type)
    FROM all_objects p
    WHERE p.owner = :schema
    AND p.object_type IN ('PROCEDURE', 'FUNCTION')
    ORDER BY p.object_type, p.object_name";

/// Package details for the inventory, including body line counts and
/// body status.
pub const PACKAGE_DETAILS: &str = "\
    SELECT
        o.object_name,
        TO_CHAR(o.created, 'YYYY-MM-DD HH24:MI:SS'),
        TO_CHAR(o.last_ddl_time, 'YYYY-MM-DD HH24:MI:SS'),
        o.status,
        (SELECT COUNT(*) FROM all_source s
         WHERE s.owner = o.owner AND s.name = o.object_name AND s.type = 'PACKAGE'),
        (SELECT COUNT(*) FROM all_source s
         WHERE s.owner = o.owner AND s.name = o.object_name AND s.type = 'PACKAGE BODY'),
        (SELECT status FROM all_objects b
         WHERE b.owner = o.owner AND b.object_name = o.object_name
         AND b.object_type = 'PACKAGE BODY')
    FROM all_objects o
    WHERE o.owner = :schema
    AND o.object_type = 'PACKAGE'
    ORDER BY o.object_name";

/// Line-count metrics per stored program unit.
pub const SOURCE_METRICS: &str = r"
    SELECT
        type,
        name,
        COUNT(*),
        SUM(CASE WHEN REGEXP_LIKE(text, '^\s*--') THEN 1 ELSE 0 END)
    FROM all_source
    WHERE owner = :schema
    GROUP BY type, name
    ORDER BY type, name";

/// Enumeration query for one object type.
pub fn list_sql(object_type: ObjectType) -> &'static str {
    match object_type {
        ObjectType::Table => TABLES,
        ObjectType::View => VIEWS,
        ObjectType::MaterializedView => MATERIALIZED_VIEWS,
        ObjectType::Procedure => PROCEDURES,
        ObjectType::Function => FUNCTIONS,
        ObjectType::Package => PACKAGES,
        ObjectType::Trigger => TRIGGERS,
        ObjectType::Sequence => SEQUENCES,
        ObjectType::Synonym => SYNONYMS,
        ObjectType::Type => TYPES,
        ObjectType::Index => INDEXES,
        ObjectType::DatabaseLink => DATABASE_LINKS,
    }
}

/// Enumeration query with the schema inlined as a literal, for generated
/// offline scripts that cannot use bind variables.
pub fn list_sql_literal(object_type: ObjectType, schema: &str) -> String {
    list_sql(object_type).replace(":schema", &format!("'{}'", schema))
}

/// Existence probe arguments for a body kind.
pub fn body_probe_type(kind: BodyKind) -> &'static str {
    kind.object_type()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_list_query() {
        for object_type in ObjectType::ALL {
            let sql = list_sql(object_type);
            assert!(sql.contains(":schema"), "{} query misses bind", object_type);
            assert!(
                sql.to_uppercase().contains("OBJECT_NAME"),
                "{} query misses uniform alias",
                object_type
            );
        }
    }

    #[test]
    fn test_list_sql_literal_inlines_schema() {
        let sql = list_sql_literal(ObjectType::Table, "HR");
        assert!(sql.contains("owner = 'HR'"));
        assert!(!sql.contains(":schema"));
    }

    #[test]
    fn test_body_probe_types() {
        assert_eq!(body_probe_type(BodyKind::PackageBody), "PACKAGE BODY");
        assert_eq!(body_probe_type(BodyKind::TypeBody), "TYPE BODY");
    }
}
