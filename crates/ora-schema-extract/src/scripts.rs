//! Offline extraction script generation.
//!
//! For environments without direct connectivity, the CLI can emit static
//! SQL*Plus or PL/SQL scripts that perform the same per-schema, per-type
//! extraction server-side. Both generators iterate the same catalog order
//! and enumeration queries the live orchestrator uses.

use crate::catalog::ObjectType;
use crate::source::queries;
use chrono::Utc;

/// Session transform setup shared by both script flavors.
fn transform_block() -> Vec<String> {
    vec![
        "BEGIN".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'SEGMENT_ATTRIBUTES', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'STORAGE', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'TABLESPACE', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'PRETTY', TRUE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'SQLTERMINATOR', TRUE);".to_string(),
        "END;".to_string(),
        "/".to_string(),
    ]
}

/// Generate a SQL*Plus script that spools DDL for every object of every
/// supported type in the given schemas.
pub fn generate_sqlplus_script(schemas: &[String], output_dir: &str) -> String {
    let mut lines = vec![
        "-- Offline DDL extraction - SQL*Plus script".to_string(),
        format!("-- Generated: {}", Utc::now().to_rfc3339()),
        "-- Usage: sqlplus user/password@database @extract_ddl.sql".to_string(),
        String::new(),
        "SET ECHO OFF".to_string(),
        "SET FEEDBACK OFF".to_string(),
        "SET HEADING OFF".to_string(),
        "SET LINESIZE 32767".to_string(),
        "SET LONG 2000000".to_string(),
        "SET LONGCHUNKSIZE 2000000".to_string(),
        "SET PAGESIZE 0".to_string(),
        "SET TRIMSPOOL ON".to_string(),
        "SET SERVEROUTPUT ON SIZE UNLIMITED".to_string(),
        String::new(),
        "-- Configure DBMS_METADATA transforms".to_string(),
    ];
    lines.extend(transform_block());
    lines.push(String::new());

    for schema in schemas {
        let schema_upper = schema.to_uppercase();
        let schema_lower = schema.to_lowercase();

        for object_type in ObjectType::ALL {
            lines.push(format!(
                "PROMPT Extracting {}s from {}...",
                object_type, schema_upper
            ));
            lines.push("DECLARE".to_string());
            lines.push("    v_ddl CLOB;".to_string());
            lines.push("BEGIN".to_string());
            lines.push(format!(
                "    FOR obj IN ({}) LOOP",
                queries::list_sql_literal(object_type, &schema_upper)
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            ));
            lines.push("        BEGIN".to_string());
            lines.push(format!(
                "            v_ddl := DBMS_METADATA.GET_DDL('{}', obj.object_name, '{}');",
                object_type.metadata_type(),
                schema_upper
            ));
            lines.push(format!(
                "            -- Spool target: {}/{}/{}/",
                output_dir,
                schema_lower,
                object_type.folder()
            ));
            lines.push("            DBMS_OUTPUT.PUT_LINE(v_ddl);".to_string());
            lines.push("        EXCEPTION".to_string());
            lines.push("            WHEN OTHERS THEN NULL;".to_string());
            lines.push("        END;".to_string());
            lines.push("    END LOOP;".to_string());
            lines.push("END;".to_string());
            lines.push("/".to_string());
            lines.push(String::new());
        }
    }

    lines.push("SET FEEDBACK ON".to_string());
    lines.push("PROMPT Extraction complete.".to_string());
    lines.push("EXIT".to_string());

    lines.join("\n")
}

/// Generate a PL/SQL script that exports each object to an individual
/// file through UTL_FILE. `directory_path` is the server-side path the
/// Oracle directory object must point at.
pub fn generate_plsql_script(schemas: &[String], directory_path: &str) -> String {
    let mut lines = vec![
        "-- Offline DDL extraction - PL/SQL UTL_FILE export script".to_string(),
        format!("-- Generated: {}", Utc::now().to_rfc3339()),
        "-- Prerequisites:".to_string(),
        format!(
            "--   1. Create Oracle directory: CREATE DIRECTORY DDL_EXPORT_DIR AS '{}';",
            directory_path
        ),
        "--   2. Grant access: GRANT READ, WRITE ON DIRECTORY DDL_EXPORT_DIR TO <user>;".to_string(),
        "--".to_string(),
        "-- Run as a user with UTL_FILE and DBMS_METADATA privileges.".to_string(),
        String::new(),
        "SET SERVEROUTPUT ON SIZE UNLIMITED".to_string(),
        String::new(),
        "DECLARE".to_string(),
        "    v_ddl CLOB;".to_string(),
        "    v_filename VARCHAR2(255);".to_string(),
        "    v_dir_name VARCHAR2(30) := 'DDL_EXPORT_DIR';".to_string(),
        String::new(),
        "    PROCEDURE write_clob_to_file(p_dir VARCHAR2, p_filename VARCHAR2, p_clob CLOB) IS".to_string(),
        "        l_file UTL_FILE.FILE_TYPE;".to_string(),
        "        l_buffer VARCHAR2(32767);".to_string(),
        "        l_amount INTEGER := 32767;".to_string(),
        "        l_offset INTEGER := 1;".to_string(),
        "        l_clob_len INTEGER;".to_string(),
        "    BEGIN".to_string(),
        "        l_clob_len := DBMS_LOB.GETLENGTH(p_clob);".to_string(),
        "        IF l_clob_len > 0 THEN".to_string(),
        "            l_file := UTL_FILE.FOPEN(p_dir, p_filename, 'w', 32767);".to_string(),
        "            WHILE l_offset <= l_clob_len LOOP".to_string(),
        "                DBMS_LOB.READ(p_clob, l_amount, l_offset, l_buffer);".to_string(),
        "                UTL_FILE.PUT(l_file, l_buffer);".to_string(),
        "                l_offset := l_offset + l_amount;".to_string(),
        "            END LOOP;".to_string(),
        "            UTL_FILE.FCLOSE(l_file);".to_string(),
        "        END IF;".to_string(),
        "    EXCEPTION".to_string(),
        "        WHEN OTHERS THEN".to_string(),
        "            IF UTL_FILE.IS_OPEN(l_file) THEN".to_string(),
        "                UTL_FILE.FCLOSE(l_file);".to_string(),
        "            END IF;".to_string(),
        "            DBMS_OUTPUT.PUT_LINE('Error writing ' || p_filename || ': ' || SQLERRM);".to_string(),
        "    END;".to_string(),
        String::new(),
        "BEGIN".to_string(),
        "    -- Configure DBMS_METADATA transforms".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'SEGMENT_ATTRIBUTES', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'STORAGE', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'TABLESPACE', FALSE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'PRETTY', TRUE);".to_string(),
        "    DBMS_METADATA.SET_TRANSFORM_PARAM(DBMS_METADATA.SESSION_TRANSFORM, 'SQLTERMINATOR', TRUE);".to_string(),
        String::new(),
    ];

    for schema in schemas {
        let schema_upper = schema.to_uppercase();
        let schema_lower = schema.to_lowercase();

        for object_type in ObjectType::ALL {
            let enumeration = queries::list_sql_literal(object_type, &schema_upper)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");

            lines.push(format!(
                "    DBMS_OUTPUT.PUT_LINE('Extracting {}s from {}...');",
                object_type, schema_upper
            ));
            lines.push(format!("    FOR obj IN ({}) LOOP", enumeration));
            lines.push("        BEGIN".to_string());
            lines.push(format!(
                "            v_ddl := DBMS_METADATA.GET_DDL('{}', obj.object_name, '{}');",
                object_type.metadata_type(),
                schema_upper
            ));

            // Two-part types get the body appended when one exists.
            if let Some(kind) = object_type.body_kind() {
                lines.push("            BEGIN".to_string());
                lines.push(format!(
                    "                v_ddl := v_ddl || CHR(10) || CHR(10) || DBMS_METADATA.GET_DDL('{}', obj.object_name, '{}');",
                    kind.metadata_type(),
                    schema_upper
                ));
                lines.push("            EXCEPTION WHEN OTHERS THEN NULL; END;".to_string());
            }

            lines.push(format!(
                "            v_filename := '{}_{}_' || LOWER(obj.object_name) || '.sql';",
                schema_lower,
                object_type.folder()
            ));
            lines.push(
                "            write_clob_to_file(v_dir_name, v_filename, v_ddl);".to_string(),
            );
            lines.push(
                "            DBMS_OUTPUT.PUT_LINE('  Extracted: ' || obj.object_name);"
                    .to_string(),
            );
            lines.push("        EXCEPTION WHEN OTHERS THEN".to_string());
            lines.push(
                "            DBMS_OUTPUT.PUT_LINE('  Failed: ' || obj.object_name || ' - ' || SQLERRM);"
                    .to_string(),
            );
            lines.push("        END;".to_string());
            lines.push("    END LOOP;".to_string());
            lines.push(String::new());
        }
    }

    lines.push("    DBMS_OUTPUT.PUT_LINE('Extraction complete.');".to_string());
    lines.push("END;".to_string());
    lines.push("/".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schemas(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sqlplus_script_covers_all_types() {
        let script = generate_sqlplus_script(&schemas(&["HR"]), "/data/staging");
        for object_type in ObjectType::ALL {
            assert!(
                script.contains(&format!("Extracting {}s from HR", object_type)),
                "missing section for {}",
                object_type
            );
        }
        assert!(script.contains("SET_TRANSFORM_PARAM"));
        assert!(script.contains("DBMS_METADATA.GET_DDL('DB_LINK'"));
        assert!(script.contains("EXIT"));
    }

    #[test]
    fn test_sqlplus_script_multiple_schemas() {
        let script = generate_sqlplus_script(&schemas(&["HR", "finance"]), "/tmp/out");
        assert!(script.contains("owner = 'HR'"));
        assert!(script.contains("owner = 'FINANCE'"));
    }

    #[test]
    fn test_plsql_script_appends_bodies_for_two_part_types() {
        let script = generate_plsql_script(&schemas(&["HR"]), "/oracle/export");
        assert!(script.contains("write_clob_to_file"));
        assert!(script.contains("GET_DDL('PACKAGE_BODY'"));
        assert!(script.contains("GET_DDL('TYPE_BODY'"));
        assert!(script.contains("CREATE DIRECTORY DDL_EXPORT_DIR AS '/oracle/export'"));
    }

    #[test]
    fn test_plsql_script_filenames_use_schema_and_folder() {
        let script = generate_plsql_script(&schemas(&["HR"]), "/oracle/export");
        assert!(script.contains("'hr_tables_' || LOWER(obj.object_name) || '.sql'"));
        assert!(script.contains("'hr_db_links_' || LOWER(obj.object_name) || '.sql'"));
    }
}
