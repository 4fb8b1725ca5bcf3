//! Schema dumps: table descriptions exported from a database.
//!
//! The layout mirrors what Laravel's schema inspector reports for a table:
//!
//! ```yaml
//! tables:
//!   tasks:
//!     columns:
//!       - { name: id, type: "bigint unsigned", nullable: false }
//!       - { name: title, type: "varchar(255)", nullable: false, default: "'New'" }
//!     indexes:
//!       - { name: primary, columns: [id], primary: true }
//!     foreign_keys:
//!       - { columns: [user_id], foreign_table: users, foreign_columns: [id] }
//! ```
//!
//! Both JSON and YAML are accepted; the format is picked from the extension.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BuilderError, BuilderResult};
use crate::types::SqlType;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaDump {
    #[serde(default)]
    pub tables: BTreeMap<String, TableSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
    #[serde(default)]
    pub indexes: Vec<IndexSchema>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeySchema>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexSchema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForeignKeySchema {
    pub columns: Vec<String>,
    pub foreign_table: String,
    pub foreign_columns: Vec<String>,
}

impl SchemaDump {
    pub fn from_path(path: &Path) -> BuilderResult<Self> {
        if !path.is_file() {
            return Err(BuilderError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let dump = if is_json {
            serde_json::from_str(&contents).map_err(|e| BuilderError::Json {
                path: path.to_path_buf(),
                source: e,
            })?
        } else {
            serde_yaml::from_str(&contents).map_err(|e| BuilderError::Yaml {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        tracing::debug!(?path, "Loaded schema dump");
        Ok(dump)
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl TableSchema {
    /// Primary key column: the index flagged primary or named `primary`, else `fallback`.
    pub fn primary_key<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.indexes
            .iter()
            .find(|index| index.primary || index.name == "primary")
            .and_then(|index| index.columns.first())
            .map(String::as_str)
            .unwrap_or(fallback)
    }

    /// Foreign key declared on a single `column`, if any.
    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKeySchema> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.columns.first().is_some_and(|c| c == column))
    }
}

/// A schema column reduced to its semantic type and a cleaned-up default.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NormalizedColumn {
    pub ty: SqlType,
    pub default: Option<String>,
}

/// Normalize a raw schema column.
///
/// The primary key becomes `id` without a default, PostgreSQL `::type`
/// suffixes are stripped, `tinyint(1)` becomes a boolean with a `true`/`false`
/// default and current-timestamp defaults become empty.
pub(crate) fn normalize_column(
    column: &ColumnSchema,
    primary_key: &str,
) -> BuilderResult<NormalizedColumn> {
    if column.name == primary_key {
        return Ok(NormalizedColumn {
            ty: SqlType::Id,
            default: None,
        });
    }

    let mut default = column.default.clone().and_then(|value| match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    });

    if let Some(value) = default.as_mut() {
        if let Some(idx) = value.find("::") {
            value.truncate(idx);
        }
    }

    let ty = SqlType::from_sql_type(&column.ty).map_err(|_| BuilderError::UnknownSqlType {
        column: column.name.clone(),
        sql_type: column.ty.clone(),
    })?;

    if ty == SqlType::Boolean {
        default = default.map(|value| {
            let falsy = matches!(value.trim_matches('\'').to_lowercase().as_str(), "" | "0" | "false");
            if falsy { "false" } else { "true" }.to_string()
        });
    }

    if default
        .as_deref()
        .is_some_and(|value| value.eq_ignore_ascii_case("current_timestamp()") || value == "CURRENT_TIMESTAMP")
    {
        default = Some(String::new());
    }

    Ok(NormalizedColumn { ty, default })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, ty: &str, default: Option<serde_json::Value>) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            ty: ty.to_string(),
            nullable: false,
            default,
        }
    }

    #[test]
    fn test_parse_yaml_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(
            &path,
            r#"
tables:
  tasks:
    columns:
      - { name: id, type: "bigint unsigned" }
      - { name: user_id, type: "bigint unsigned" }
    indexes:
      - { name: tasks_pkey, columns: [id], primary: true }
    foreign_keys:
      - { columns: [user_id], foreign_table: users, foreign_columns: [id] }
"#,
        )
        .unwrap();

        let dump = SchemaDump::from_path(&path).unwrap();
        let table = dump.table("tasks").unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.primary_key("id"), "id");
        assert_eq!(table.foreign_key("user_id").unwrap().foreign_table, "users");
        assert!(table.foreign_key("id").is_none());
    }

    #[test]
    fn test_parse_json_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"tables":{"tags":{"columns":[{"name":"uuid","type":"uuid"}],"indexes":[{"name":"primary","columns":["uuid"]}]}}}"#,
        )
        .unwrap();

        let dump = SchemaDump::from_path(&path).unwrap();
        assert_eq!(dump.table("tags").unwrap().primary_key("id"), "uuid");
        assert_eq!(dump.table_names().collect::<Vec<_>>(), ["tags"]);
    }

    #[test]
    fn test_missing_dump() {
        let err = SchemaDump::from_path(Path::new("/nonexistent/schema.yaml")).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound(_)));
    }

    #[test]
    fn test_normalize_primary_key() {
        let normalized = normalize_column(
            &column("id", "bigint", Some(serde_json::json!("nextval('tasks_id_seq'::regclass)"))),
            "id",
        )
        .unwrap();
        assert_eq!(normalized.ty, SqlType::Id);
        assert_eq!(normalized.default, None);
    }

    #[test]
    fn test_normalize_defaults() {
        let pg = normalize_column(
            &column("status", "character varying", Some(serde_json::json!("'new'::character varying"))),
            "id",
        )
        .unwrap();
        assert_eq!(pg.default.as_deref(), Some("'new'"));

        let flag = normalize_column(&column("active", "tinyint(1)", Some(serde_json::json!("1"))), "id").unwrap();
        assert_eq!(flag.ty, SqlType::Boolean);
        assert_eq!(flag.default.as_deref(), Some("true"));

        let off = normalize_column(&column("active", "boolean", Some(serde_json::json!(false))), "id").unwrap();
        assert_eq!(off.default.as_deref(), Some("false"));

        let now = normalize_column(
            &column("created_at", "timestamp", Some(serde_json::json!("current_timestamp()"))),
            "id",
        )
        .unwrap();
        assert_eq!(now.default.as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_unknown_type() {
        let err = normalize_column(&column("shape", "hstore", None), "id").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown SQL column type 'hstore' for column 'shape'"
        );
    }
}
