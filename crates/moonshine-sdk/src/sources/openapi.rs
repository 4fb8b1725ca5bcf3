//! Structures read from an OpenAPI document.
//!
//! Operations tagged `<Name>Resource` contribute their parameters and JSON
//! request-body properties to the `<Name>` structure. Only the resource side
//! is generated: model and migration are disabled.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use heck::ToSnakeCase;
use serde_yaml::{Mapping, Value};

use super::MakeStructures;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::{pluralize, uc_first};
use crate::structure::{CodeStructure, CodeStructureList, ColumnStructure};
use crate::types::SqlType;

#[derive(Debug)]
pub struct OpenApiSource {
    path: Option<PathBuf>,
    root: Value,
}

impl OpenApiSource {
    pub fn from_path(path: &Path) -> BuilderResult<Self> {
        if !path.is_file() {
            return Err(BuilderError::FileNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;
        let root = serde_yaml::from_str(&contents).map_err(|e| BuilderError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(?path, "Loaded OpenAPI document");
        Ok(Self {
            path: Some(path.to_path_buf()),
            root,
        })
    }

    pub fn from_value(root: Value) -> Self {
        Self { path: None, root }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn components(&self) -> Option<&Mapping> {
        self.root.get("components")?.get("schemas")?.as_mapping()
    }

    /// Columns of a `#/components/schemas/<Name>` reference.
    fn resolve_ref(&self, reference: &str) -> Vec<ColumnStructure> {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        self.components()
            .and_then(|schemas| schemas.get(name))
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_mapping)
            .map(property_columns)
            .unwrap_or_default()
    }

    fn operation_columns(&self, operation: &Value) -> Vec<ColumnStructure> {
        let mut columns = Vec::new();

        if let Some(parameters) = operation.get("parameters").and_then(Value::as_sequence) {
            for parameter in parameters {
                let (Some(name), Some(schema)) = (
                    parameter.get("name").and_then(Value::as_str),
                    parameter.get("schema"),
                ) else {
                    continue;
                };
                columns.push(make_column(name, schema_type(schema)));
            }
        }

        let body = operation
            .get("requestBody")
            .and_then(|b| b.get("content"))
            .and_then(|c| c.get("application/json"))
            .and_then(|j| j.get("schema"))
            .filter(|s| s.is_mapping());

        if let Some(schema) = body {
            if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
                columns.extend(self.resolve_ref(reference));
            } else if let Some(properties) = schema.get("properties").and_then(Value::as_mapping) {
                columns.extend(property_columns(properties));
            }
        }

        columns
    }
}

fn schema_type(schema: &Value) -> &str {
    schema.get("type").and_then(Value::as_str).unwrap_or("string")
}

fn property_columns(properties: &Mapping) -> Vec<ColumnStructure> {
    properties
        .iter()
        .filter_map(|(name, schema)| Some(make_column(name.as_str()?, schema_type(schema))))
        .collect()
}

fn make_column(column: &str, property_type: &str) -> ColumnStructure {
    let ty = if column == "id" {
        SqlType::Id
    } else {
        match property_type {
            "integer" => SqlType::Integer,
            "boolean" => SqlType::Boolean,
            "number" | "float" | "double" => SqlType::Float,
            _ => SqlType::String,
        }
    };
    ColumnStructure::new(column, column, ty)
}

impl MakeStructures for OpenApiSource {
    fn make_structures(&self) -> BuilderResult<CodeStructureList> {
        let paths = self
            .root
            .get("paths")
            .and_then(Value::as_mapping)
            .ok_or_else(|| BuilderError::OpenApi("missing \"paths\"".to_string()))?;

        // Keyed by lowercased resource name so tags differing only in case merge.
        let mut resources: BTreeMap<String, CodeStructure> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();

        for operations in paths.values().filter_map(Value::as_mapping) {
            for operation in operations.values() {
                let Some(tags) = operation.get("tags").and_then(Value::as_sequence) else {
                    continue;
                };

                for tag in tags.iter().filter_map(Value::as_str) {
                    let Some(resource_name) = tag.strip_suffix("Resource") else {
                        continue;
                    };
                    if resource_name.is_empty() {
                        return Err(BuilderError::OpenApi(format!(
                            "tag \"{tag}\" names no resource before \"Resource\""
                        )));
                    }
                    let key = resource_name.to_lowercase();

                    let structure = resources.entry(key.clone()).or_insert_with(|| {
                        order.push(key.clone());
                        let mut structure = CodeStructure::new(
                            pluralize(&key.to_snake_case()),
                            uc_first(resource_name),
                        );
                        structure.set_with_model(false);
                        structure.set_with_migration(false);
                        structure
                    });

                    for column in self.operation_columns(operation) {
                        if structure.column(column.column()).is_some() {
                            tracing::debug!(column = column.column(), "Skipping repeated OpenAPI column");
                            continue;
                        }
                        structure.add_column(column);
                    }
                }
            }
        }

        let mut list = CodeStructureList::new();
        for key in order {
            let Some(mut structure) = resources.remove(&key) else {
                continue;
            };
            if !structure.columns().iter().any(ColumnStructure::is_id) {
                structure.add_column(ColumnStructure::new("id", "id", SqlType::Id));
            }
            list.push(structure);
        }

        Ok(list)
    }
}
