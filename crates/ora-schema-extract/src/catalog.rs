//! Object type catalog: the closed set of supported schema object types.
//!
//! Each type carries its output folder, file extension and the identifier
//! used when talking to DBMS_METADATA. The catalog is a flat compile-time
//! mapping rather than a runtime registry: the set of supported types is
//! fixed, and an identifier outside it must fail loudly with
//! [`ExtractError::UnsupportedType`].

use crate::error::{ExtractError, Result};
use std::fmt;

/// A supported schema object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Table,
    View,
    MaterializedView,
    Procedure,
    Function,
    Package,
    Trigger,
    Sequence,
    Synonym,
    Type,
    Index,
    DatabaseLink,
}

/// The body part of a two-part (specification + body) object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    PackageBody,
    TypeBody,
}

impl ObjectType {
    /// All supported types, in catalog registration order. Extraction
    /// iterates this order per schema; it is stable and not alphabetical.
    pub const ALL: [ObjectType; 12] = [
        ObjectType::Table,
        ObjectType::View,
        ObjectType::MaterializedView,
        ObjectType::Procedure,
        ObjectType::Function,
        ObjectType::Package,
        ObjectType::Trigger,
        ObjectType::Sequence,
        ObjectType::Synonym,
        ObjectType::Type,
        ObjectType::Index,
        ObjectType::DatabaseLink,
    ];

    /// Catalog identifier, used as the manifest key and in progress output.
    pub fn type_id(&self) -> &'static str {
        match self {
            ObjectType::Table => "TABLE",
            ObjectType::View => "VIEW",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::Procedure => "PROCEDURE",
            ObjectType::Function => "FUNCTION",
            ObjectType::Package => "PACKAGE",
            ObjectType::Trigger => "TRIGGER",
            ObjectType::Sequence => "SEQUENCE",
            ObjectType::Synonym => "SYNONYM",
            ObjectType::Type => "TYPE",
            ObjectType::Index => "INDEX",
            ObjectType::DatabaseLink => "DATABASE LINK",
        }
    }

    /// Output folder beneath each schema directory.
    pub fn folder(&self) -> &'static str {
        match self {
            ObjectType::Table => "tables",
            ObjectType::View => "views",
            ObjectType::MaterializedView => "materialized_views",
            ObjectType::Procedure => "procedures",
            ObjectType::Function => "functions",
            ObjectType::Package => "packages",
            ObjectType::Trigger => "triggers",
            ObjectType::Sequence => "sequences",
            ObjectType::Synonym => "synonyms",
            ObjectType::Type => "types",
            ObjectType::Index => "indexes",
            ObjectType::DatabaseLink => "db_links",
        }
    }

    /// Output file extension, including the leading dot.
    pub fn extension(&self) -> &'static str {
        ".sql"
    }

    /// Identifier passed to DBMS_METADATA.GET_DDL. Two types are renamed
    /// (the catalog name and the DBMS_METADATA name differ); the rest map
    /// to themselves.
    pub fn metadata_type(&self) -> &'static str {
        match self {
            ObjectType::MaterializedView => "MATERIALIZED_VIEW",
            ObjectType::DatabaseLink => "DB_LINK",
            other => other.type_id(),
        }
    }

    /// The body part for two-part types (packages and object types).
    pub fn body_kind(&self) -> Option<BodyKind> {
        match self {
            ObjectType::Package => Some(BodyKind::PackageBody),
            ObjectType::Type => Some(BodyKind::TypeBody),
            _ => None,
        }
    }

    /// Resolve a catalog identifier, failing for anything outside the
    /// fixed set. Matching is case-insensitive and tolerates underscores
    /// in place of spaces (`MATERIALIZED_VIEW`, `DATABASE_LINK`).
    pub fn parse(id: &str) -> Result<Self> {
        let normalized = id.trim().to_uppercase().replace('_', " ");
        ObjectType::ALL
            .iter()
            .copied()
            .find(|t| t.type_id().replace('_', " ") == normalized)
            .ok_or_else(|| ExtractError::UnsupportedType(id.to_string()))
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_id())
    }
}

impl BodyKind {
    /// Catalog object type of the body, as found in ALL_OBJECTS.
    pub fn object_type(&self) -> &'static str {
        match self {
            BodyKind::PackageBody => "PACKAGE BODY",
            BodyKind::TypeBody => "TYPE BODY",
        }
    }

    /// Identifier passed to DBMS_METADATA.GET_DDL for the body part.
    pub fn metadata_type(&self) -> &'static str {
        match self {
            BodyKind::PackageBody => "PACKAGE_BODY",
            BodyKind::TypeBody => "TYPE_BODY",
        }
    }

    /// Section label used by the composite combinator.
    pub fn label(&self) -> &'static str {
        match self {
            BodyKind::PackageBody => "Package",
            BodyKind::TypeBody => "Type",
        }
    }
}
