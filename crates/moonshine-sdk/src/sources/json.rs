//! JSON build files.
//!
//! ```json
//! {
//!   "resources": [
//!     {
//!       "name": "Task",
//!       "timestamps": true,
//!       "fields": [
//!         { "column": "id", "type": "id" },
//!         { "column": "title", "type": "string", "name": "Title", "hasFilter": true }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::MakeStructures;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::NameStr;
use crate::structure::{CodeStructure, CodeStructureList, ColumnStructure, RelationStructure};
use crate::types::SqlType;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<ResourceSpec>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_model: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_migration: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_resource: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<bool>,
    #[serde(
        default,
        rename = "soft_deletes",
        skip_serializing_if = "Option::is_none"
    )]
    pub soft_deletes: Option<bool>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    pub column: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(
        default,
        rename = "hasFilter",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_filter: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationSpec {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationSpec {
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
}

/// Migration options are written as PHP literals; numbers are accepted too.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(scalar_to_string).collect())
}

fn scalar_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Structures described by a JSON build file.
#[derive(Debug)]
pub struct JsonSource {
    path: Option<PathBuf>,
    file: BuildFile,
}

impl JsonSource {
    pub fn from_path(path: &Path) -> BuilderResult<Self> {
        if !path.is_file() {
            return Err(BuilderError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;
        let file = serde_json::from_str(&contents).map_err(|e| BuilderError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(?path, "Loaded JSON build file");
        Ok(Self {
            path: Some(path.to_path_buf()),
            file,
        })
    }

    pub fn from_build_file(file: BuildFile) -> Self {
        Self { path: None, file }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl MakeStructures for JsonSource {
    fn make_structures(&self) -> BuilderResult<CodeStructureList> {
        let resources = self
            .file
            .resources
            .as_ref()
            .ok_or(BuilderError::MissingResources)?;

        resources.iter().map(make_structure).collect()
    }
}

fn make_structure(resource: &ResourceSpec) -> BuilderResult<CodeStructure> {
    let table = resource
        .table
        .clone()
        .unwrap_or_else(|| NameStr::new(resource.name.as_str()).plural_snake());

    let mut structure = CodeStructure::new(table, resource.name.clone());
    if let Some(value) = resource.with_model {
        structure.set_with_model(value);
    }
    if let Some(value) = resource.with_migration {
        structure.set_with_migration(value);
    }
    if let Some(value) = resource.with_resource {
        structure.set_with_resource(value);
    }
    structure.set_menu_name(resource.menu_name.clone());
    structure.set_column_name(resource.column.clone());

    for field in &resource.fields {
        structure.add_column(make_column(field)?);
    }

    if resource.timestamps == Some(true) {
        structure.add_column(timestamp_column("created_at", "Created at"));
        structure.add_column(timestamp_column("updated_at", "Updated at"));
    }
    if resource.soft_deletes == Some(true) {
        structure.add_column(timestamp_column("deleted_at", "Deleted at"));
    }

    Ok(structure)
}

pub(crate) fn timestamp_column(column: &str, name: &str) -> ColumnStructure {
    ColumnStructure::new(column, name, SqlType::Timestamp).nullable(true)
}

fn make_column(field: &FieldSpec) -> BuilderResult<ColumnStructure> {
    let ty: SqlType = field
        .ty
        .parse()
        .map_err(|_| BuilderError::WrongColumnType {
            column: field.column.clone(),
            ty: field.ty.clone(),
        })?;

    let default = field.default.clone().map(scalar_to_string);

    let mut column = ColumnStructure::new(
        field.column.clone(),
        field.name.clone().unwrap_or_default(),
        ty,
    )
    .with_default(default.clone())
    .nullable(field.nullable.unwrap_or(false))
    .required(field.required.unwrap_or(false));

    if let Some(relation) = &field.relation {
        let foreign_key = match (&relation.foreign_key, ty) {
            (Some(key), _) => key.clone(),
            (None, SqlType::BelongsTo | SqlType::BelongsToMany) => "id".to_string(),
            (None, _) => return Err(BuilderError::MissingForeignKey(field.column.clone())),
        };
        column.set_relation(RelationStructure::new(foreign_key, relation.table.clone()));

        if let Some(name) = relation.relation_name.as_ref().filter(|n| !n.is_empty()) {
            column.set_relation_name(Some(name.clone()));
        }
    }

    if let Some(has_filter) = field.has_filter {
        column.set_has_filter(has_filter);
    }

    let mut methods = field.methods.clone();
    let mut migration_methods = field
        .migration
        .as_ref()
        .map(|m| m.methods.clone())
        .unwrap_or_default();

    if let Some(default) = &default {
        let method = if column.input_type() == "text" {
            format!("default('{default}')")
        } else {
            format!("default({default})")
        };
        methods.insert(0, method.clone());
        migration_methods.insert(0, method);
    }

    if let Some(migration) = &field.migration {
        if !migration.options.is_empty() {
            column.set_migration_options(migration.options.clone());
        }
    }
    if !migration_methods.is_empty() {
        column.set_migration_methods(migration_methods);
    }

    column.set_resource_class(field.resource_class.clone().filter(|s| !s.is_empty()));
    column.set_model_class(field.model_class.clone().filter(|s| !s.is_empty()));
    if field.cast.is_some() {
        column.set_cast(field.cast.clone());
    }
    if !methods.is_empty() {
        column.set_resource_methods(methods);
    }
    if let Some(alias) = field.field.clone().filter(|s| !s.is_empty()) {
        column.set_field_class(Some(alias));
    }

    Ok(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(json: &str) -> JsonSource {
        JsonSource::from_build_file(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_missing_resources() {
        let err = source("{}").make_structures().unwrap_err();
        assert_eq!(err.to_string(), "No resources array found.");
    }

    #[test]
    fn test_wrong_type() {
        let err = source(
            r#"{"resources":[{"name":"Task","fields":[{"column":"title","type":"varchar"}]}]}"#,
        )
        .make_structures()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "For column 'title' the wrong type 'varchar' is set."
        );
    }

    #[test]
    fn test_table_defaults_to_snake_plural() {
        let list = source(r#"{"resources":[{"name":"TaskAttachment","fields":[]}]}"#)
            .make_structures()
            .unwrap();
        assert_eq!(list.structures()[0].table(), "task_attachments");
    }

    #[test]
    fn test_relation_foreign_key_rules() {
        let list = source(
            r#"{"resources":[{"name":"Comment","fields":[
                {"column":"post_id","type":"BelongsTo","relation":{"table":"posts"}}
            ]}]}"#,
        )
        .make_structures()
        .unwrap();
        let column = &list.structures()[0].columns()[0];
        assert_eq!(column.relation().unwrap().foreign_column(), "id");

        let err = source(
            r#"{"resources":[{"name":"Post","fields":[
                {"column":"comments","type":"HasMany","relation":{"table":"comments"}}
            ]}]}"#,
        )
        .make_structures()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "For column 'comments' in the relation parameter, you must specify 'foreign_key'."
        );
    }

    #[test]
    fn test_default_prepended_to_methods() {
        let list = source(
            r#"{"resources":[{"name":"Task","fields":[
                {"column":"priority","type":"string","default":"Низкий","methods":["sortable"],
                 "migration":{"methods":["index()"]}},
                {"column":"sort","type":"integer","default":10}
            ]}]}"#,
        )
        .make_structures()
        .unwrap();
        let columns = list.structures()[0].columns();

        assert_eq!(columns[0].resource_methods(), ["default('Низкий')", "sortable"]);
        assert_eq!(columns[0].migration_methods(), ["default('Низкий')", "index()"]);
        assert_eq!(columns[1].resource_methods(), ["default(10)"]);
        assert_eq!(columns[1].default(), Some("10"));
    }

    #[test]
    fn test_timestamps_and_soft_deletes() {
        let list = source(
            r#"{"resources":[{"name":"Task","timestamps":true,"soft_deletes":true,"fields":[
                {"column":"id","type":"id"}
            ]}]}"#,
        )
        .make_structures()
        .unwrap();
        let structure = &list.structures()[0];
        assert_eq!(structure.columns().len(), 4);
        assert!(structure.is_timestamps());
        assert!(structure.is_soft_deletes());
        assert!(structure.column("deleted_at").unwrap().is_nullable());
    }

    #[test]
    fn test_options_and_field_alias() {
        let list = source(
            r#"{"resources":[{"name":"Product","withMigration":false,"menuName":"Товары","column":"title","fields":[
                {"column":"price","type":"decimal","migration":{"options":[10, 2]}},
                {"column":"images","type":"json","field":"Image","methods":["multiple()"]}
            ]}]}"#,
        )
        .make_structures()
        .unwrap();
        let structure = &list.structures()[0];
        assert!(!structure.with_migration());
        assert!(structure.with_resource());
        assert_eq!(structure.menu_name(), Some("Товары"));
        assert_eq!(structure.column_name(), Some("title"));
        assert_eq!(structure.columns()[0].migration_options(), ["10", "2"]);
        assert_eq!(structure.columns()[1].cast(), Some("json"));
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = JsonSource::from_path(Path::new("/nonexistent/build.json")).unwrap_err();
        assert!(matches!(err, BuilderError::FileNotFound(_)));
    }
}
