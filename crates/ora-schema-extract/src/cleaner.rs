//! DDL cleanup: removal of Oracle storage and placement clauses.
//!
//! DBMS_METADATA output is littered with physical-storage syntax (PCTFREE,
//! TABLESPACE, STORAGE blocks, LOB segments) that carries no meaning for
//! migration analysis. The cleaner strips those clauses with an ordered
//! rule table while leaving the logical SQL (columns, constraints, keys,
//! view queries) untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered clause-removal rules. Each pattern consumes the clause together
/// with its leading whitespace. Invariant: the negated form of every toggle
/// (NOLOGGING, NOCACHE, ...) is listed before its bare form, and bare
/// keywords are word-boundary anchored, so removing `LOGGING` can never
/// corrupt a `NOLOGGING` elsewhere in the text.
static CLAUSE_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\s+PCTFREE\s+\d+",
        r"(?i)\s+PCTUSED\s+\d+",
        r"(?i)\s+INITRANS\s+\d+",
        r"(?i)\s+MAXTRANS\s+\d+",
        r"(?i)\s+NOCOMPRESS\b",
        r"(?i)\s+COMPRESS(?:\s+\d+)?\b",
        r"(?i)\s+NOLOGGING\b",
        r"(?i)\s+LOGGING\b",
        r"(?i)\s+NOCACHE\b",
        r"(?i)\s+CACHE(?:\s+\d+)?\b",
        r"(?i)\s+NOPARALLEL\b",
        r"(?i)\s+PARALLEL(?:\s+\d+)?\b",
        r"(?i)\s+NOMONITORING\b",
        r"(?i)\s+MONITORING\b",
        r"(?i)\s+SEGMENT\s+CREATION\s+(?:IMMEDIATE|DEFERRED)\b",
        r"(?i)\s+FLASH_CACHE\s+\w+",
        r"(?i)\s+CELL_FLASH_CACHE\s+\w+",
        r"(?i)\s+ENABLE\s+ROW\s+MOVEMENT\b",
        r"(?i)\s+DISABLE\s+ROW\s+MOVEMENT\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static clause rule"))
    .collect()
});

// USING INDEX TABLESPACE must run before the bare TABLESPACE rule so the
// whole clause is removed as one unit instead of leaving `USING INDEX`
// behind.
static USING_INDEX_TABLESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+USING\s+INDEX\s+TABLESPACE\s+"?[A-Za-z_][A-Za-z0-9_$#]*"?"#)
        .expect("static rule")
});

static TABLESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\s+TABLESPACE\s+"?[A-Za-z_][A-Za-z0-9_$#]*"?"#).expect("static rule")
});

// STORAGE parameter blocks. `[^)]*` spans line breaks, so multi-line
// key/value lists are removed as one unit; it stops at the first `)`,
// which keeps the match non-greedy per block.
static STORAGE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+STORAGE\s*\([^)]*\)").expect("static rule"));

// LOB (col) STORE AS segment(params), removed as one unit across lines.
static LOB_STORAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+LOB\s*\([^)]*\)\s+STORE\s+AS\s+[^(]*\([^)]*\)").expect("static rule")
});

static EXCESS_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("static rule"));
static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("static rule"));
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +\n").expect("static rule"));
static EMPTY_PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*\)").expect("static rule"));

/// Statement terminator appended to every non-empty cleaned DDL.
const TERMINATOR: char = ';';

/// Clean one object's raw DDL.
///
/// Applies the clause rules in order, removes tablespace references and
/// storage blocks, normalizes whitespace and guarantees exactly one
/// trailing terminator. Empty input stays empty. The function is
/// idempotent: cleaning already-clean DDL is a no-op.
pub fn clean(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut cleaned = raw.to_string();

    for rule in CLAUSE_RULES.iter() {
        cleaned = rule.replace_all(&cleaned, "").into_owned();
    }

    cleaned = USING_INDEX_TABLESPACE.replace_all(&cleaned, "").into_owned();
    cleaned = TABLESPACE.replace_all(&cleaned, "").into_owned();
    cleaned = STORAGE_BLOCK.replace_all(&cleaned, "").into_owned();
    cleaned = LOB_STORAGE.replace_all(&cleaned, "").into_owned();

    // Whitespace pass: collapse blank-line runs, squeeze horizontal
    // whitespace, strip trailing spaces, drop parens emptied by removals.
    cleaned = EXCESS_BLANK_LINES.replace_all(&cleaned, "\n\n").into_owned();
    cleaned = HORIZONTAL_WS.replace_all(&cleaned, " ").into_owned();
    cleaned = TRAILING_WS.replace_all(&cleaned, "\n").into_owned();
    cleaned = EMPTY_PARENS.replace_all(&cleaned, "").into_owned();

    let mut cleaned = cleaned.trim().to_string();
    if !cleaned.is_empty() && !cleaned.ends_with(TERMINATOR) {
        cleaned.push(TERMINATOR);
    }

    cleaned
}

/// Combine a two-part object (specification + body) into one cleaned unit.
///
/// Each present part is cleaned and emitted under its section marker;
/// sections are separated by exactly one blank line. An absent part emits
/// nothing at all, not even its marker, which keeps "body does not exist"
/// distinct from "body exists but is empty".
pub fn combine_spec_and_body(
    kind: &str,
    spec_ddl: Option<&str>,
    body_ddl: Option<&str>,
) -> String {
    let mut sections = Vec::new();

    if let Some(spec) = spec_ddl {
        sections.push(format!("-- {} Specification\n{}", kind, clean(spec)));
    }
    if let Some(body) = body_ddl {
        sections.push(format!("-- {} Body\n{}", kind, clean(body)));
    }

    sections.join("\n\n")
}

/// Strip `SCHEMA.` / `"SCHEMA".` prefixes from object references.
///
/// Useful when the extracted DDL is re-targeted at a different schema. The
/// unquoted form is word-boundary anchored so a schema named `HR` does not
/// eat the tail of `CHR.`.
pub fn remove_schema_prefix(ddl: &str, schema: &str) -> String {
    if ddl.is_empty() || schema.is_empty() {
        return ddl.to_string();
    }

    let escaped = regex::escape(schema);
    let pattern = format!(r#"(?i)"{}"\.|\b{}\."#, escaped, escaped);
    let re = Regex::new(&pattern).expect("escaped schema pattern");
    re.replace_all(ddl, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_empty_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n  "), "");
    }

    #[test]
    fn test_clean_appends_single_terminator() {
        assert_eq!(clean("CREATE SEQUENCE seq1"), "CREATE SEQUENCE seq1;");
        assert_eq!(clean("CREATE SEQUENCE seq1;"), "CREATE SEQUENCE seq1;");
        assert_eq!(clean("CREATE SEQUENCE seq1;\n"), "CREATE SEQUENCE seq1;");
    }

    #[test]
    fn test_clean_removes_pctfree_case_insensitively() {
        let ddl = "CREATE TABLE t (id NUMBER) PCTFREE 10 pctused 40";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("PCTFREE"));
        assert!(!cleaned.to_uppercase().contains("PCTUSED"));
        assert!(cleaned.contains("CREATE TABLE t (id NUMBER)"));
    }

    #[test]
    fn test_clean_removes_trans_hints() {
        let ddl = "CREATE TABLE t (id NUMBER) INITRANS 1 MAXTRANS 255";
        let cleaned = clean(ddl);
        assert!(!cleaned.contains("INITRANS"));
        assert!(!cleaned.contains("MAXTRANS"));
    }

    #[test]
    fn test_clean_removes_tablespace_quoted_and_unquoted() {
        let cleaned = clean("CREATE TABLE t (id NUMBER) TABLESPACE \"USERS\"");
        assert!(!cleaned.to_uppercase().contains("TABLESPACE"));
        assert!(!cleaned.contains("USERS"));

        let cleaned = clean("CREATE INDEX i ON t (id) TABLESPACE idx_ts01");
        assert!(!cleaned.to_uppercase().contains("TABLESPACE"));
        assert!(!cleaned.contains("idx_ts01"));
    }

    #[test]
    fn test_clean_removes_using_index_tablespace_as_one_unit() {
        let ddl = "ALTER TABLE t ADD CONSTRAINT pk PRIMARY KEY (id)\n USING INDEX TABLESPACE \"INDX\" ENABLE";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("TABLESPACE"));
        assert!(!cleaned.to_uppercase().contains("USING INDEX"));
        assert!(cleaned.contains("PRIMARY KEY (id)"));
    }

    #[test]
    fn test_clean_removes_multiline_storage_block() {
        let ddl = "CREATE TABLE t (id NUMBER)\n STORAGE(INITIAL 65536 NEXT 1048576\n MINEXTENTS 1 MAXEXTENTS 2147483645\n BUFFER_POOL DEFAULT)";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("STORAGE"));
        assert!(!cleaned.contains("65536"));
        // No dangling parenthesis from the removed block
        assert_eq!(cleaned.matches('(').count(), cleaned.matches(')').count());
    }

    #[test]
    fn test_clean_removes_lob_storage_clause() {
        let ddl = "CREATE TABLE t (doc CLOB)\n LOB (doc) STORE AS SECUREFILE\n (TABLESPACE users ENABLE STORAGE IN ROW)";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("STORE AS"));
        assert!(!cleaned.to_uppercase().contains("LOB ("));
        assert!(cleaned.contains("doc CLOB"));
    }

    #[test]
    fn test_clean_nologging_before_logging_word_boundaries() {
        // Regression: NOLOGGING is removed first, and neither rule may
        // partial-match inside the other keyword.
        let ddl = "CREATE INDEX i ON t (id) NOLOGGING;\nCREATE TABLE t2 (id NUMBER) LOGGING";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("NOLOGGING"));
        assert!(!cleaned.to_uppercase().contains("LOGGING"));
        assert!(cleaned.contains("CREATE INDEX i ON t (id)"));
        assert!(cleaned.contains("CREATE TABLE t2 (id NUMBER)"));
    }

    #[test]
    fn test_clean_removes_toggle_clauses() {
        let ddl = "CREATE TABLE t (id NUMBER) COMPRESS 2 NOCACHE NOPARALLEL MONITORING";
        let cleaned = clean(ddl);
        for keyword in ["COMPRESS", "NOCACHE", "NOPARALLEL", "MONITORING"] {
            assert!(!cleaned.to_uppercase().contains(keyword), "{}", keyword);
        }
    }

    #[test]
    fn test_clean_sequence_cache_with_argument() {
        let ddl = "CREATE SEQUENCE \"HR\".\"EMP_SEQ\" MINVALUE 1 INCREMENT BY 1 CACHE 20 NOORDER";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("CACHE"));
        assert!(!cleaned.contains(" 20"));
        assert!(cleaned.contains("MINVALUE 1"));
        assert!(cleaned.contains("INCREMENT BY 1"));
    }

    #[test]
    fn test_clean_removes_segment_creation_and_flash_cache() {
        let ddl = "CREATE TABLE t (id NUMBER) SEGMENT CREATION IMMEDIATE FLASH_CACHE DEFAULT CELL_FLASH_CACHE DEFAULT";
        let cleaned = clean(ddl);
        assert!(!cleaned.to_uppercase().contains("SEGMENT CREATION"));
        assert!(!cleaned.to_uppercase().contains("FLASH_CACHE"));
    }

    #[test]
    fn test_clean_removes_row_movement() {
        let ddl = "CREATE TABLE t (id NUMBER) ENABLE ROW MOVEMENT";
        assert!(!clean(ddl).to_uppercase().contains("ROW MOVEMENT"));
        let ddl = "CREATE TABLE t (id NUMBER) DISABLE ROW MOVEMENT";
        assert!(!clean(ddl).to_uppercase().contains("ROW MOVEMENT"));
    }

    #[test]
    fn test_clean_collapses_blank_lines_and_spaces() {
        let ddl = "CREATE TABLE t (\n  id    NUMBER\n)\n\n\n\n;";
        let cleaned = clean(ddl);
        assert!(!cleaned.contains("\n\n\n"));
        assert!(!cleaned.contains("  "));
    }

    #[test]
    fn test_clean_preserves_structural_sql() {
        let ddl = r#"CREATE TABLE "HR"."EMPLOYEES"
 ( "EMPLOYEE_ID" NUMBER(6,0),
   "LAST_NAME" VARCHAR2(25) NOT NULL ENABLE,
   CONSTRAINT "EMP_PK" PRIMARY KEY ("EMPLOYEE_ID"),
   CONSTRAINT "EMP_DEPT_FK" FOREIGN KEY ("DEPARTMENT_ID")
     REFERENCES "HR"."DEPARTMENTS" ("DEPARTMENT_ID")
 ) SEGMENT CREATION IMMEDIATE
 PCTFREE 10 PCTUSED 40 INITRANS 1 MAXTRANS 255
 NOCOMPRESS LOGGING
 STORAGE(INITIAL 65536 NEXT 1048576 MINEXTENTS 1 MAXEXTENTS 2147483645
  PCTINCREASE 0 FREELISTS 1 FREELIST GROUPS 1
  BUFFER_POOL DEFAULT FLASH_CACHE DEFAULT CELL_FLASH_CACHE DEFAULT)
 TABLESPACE "USERS""#;

        let cleaned = clean(ddl);
        assert!(cleaned.contains("CREATE TABLE"));
        assert!(cleaned.contains("NOT NULL"));
        assert!(cleaned.contains("PRIMARY KEY"));
        assert!(cleaned.contains("FOREIGN KEY"));
        assert!(cleaned.contains("REFERENCES"));
        for removed in ["PCTFREE", "TABLESPACE", "STORAGE(", "NOCOMPRESS", "SEGMENT CREATION"] {
            assert!(!cleaned.contains(removed), "still contains {}", removed);
        }
        // Column order is preserved
        let id_pos = cleaned.find("EMPLOYEE_ID").unwrap();
        let name_pos = cleaned.find("LAST_NAME").unwrap();
        assert!(id_pos < name_pos);
        assert!(cleaned.ends_with(';'));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let ddl = "CREATE TABLE t (id NUMBER, name VARCHAR2(30)) PCTFREE 10 TABLESPACE \"USERS\"";
        let once = clean(ddl);
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_combine_spec_only() {
        let out = combine_spec_and_body("Package", Some("CREATE PACKAGE p AS END"), None);
        assert!(out.contains("-- Package Specification"));
        assert!(!out.contains("-- Package Body"));
    }

    #[test]
    fn test_combine_body_only() {
        let out = combine_spec_and_body("Package", None, Some("CREATE PACKAGE BODY p AS END"));
        assert!(!out.contains("-- Package Specification"));
        assert!(out.contains("-- Package Body"));
    }

    #[test]
    fn test_combine_both_sections_in_order() {
        let out = combine_spec_and_body(
            "Package",
            Some("CREATE PACKAGE p AS END;"),
            Some("CREATE PACKAGE BODY p AS END;"),
        );
        let spec_pos = out.find("-- Package Specification").unwrap();
        let body_pos = out.find("-- Package Body").unwrap();
        assert!(spec_pos < body_pos);
        // Exactly one blank line between the sections
        assert!(out.contains("END;\n\n-- Package Body"));
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_combine_both_absent_is_empty() {
        assert_eq!(combine_spec_and_body("Type", None, None), "");
    }

    #[test]
    fn test_combine_type_sections() {
        let out = combine_spec_and_body(
            "Type",
            Some("CREATE TYPE t AS OBJECT (id NUMBER);"),
            Some("CREATE TYPE BODY t AS END;"),
        );
        assert!(out.contains("-- Type Specification"));
        assert!(out.contains("-- Type Body"));
    }

    #[test]
    fn test_remove_schema_prefix() {
        let ddl = "CREATE VIEW v AS SELECT * FROM \"HR\".\"EMPLOYEES\" JOIN HR.DEPARTMENTS d ON 1=1";
        let out = remove_schema_prefix(ddl, "HR");
        assert!(!out.contains("\"HR\"."));
        assert!(!out.contains("HR.DEPARTMENTS"));
        assert!(out.contains("\"EMPLOYEES\""));
        assert!(out.contains("DEPARTMENTS"));
    }

    #[test]
    fn test_remove_schema_prefix_word_boundary() {
        let ddl = "SELECT CHR.X FROM dual";
        assert_eq!(remove_schema_prefix(ddl, "HR"), ddl);
    }
}
