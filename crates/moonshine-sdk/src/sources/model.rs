//! Structures read from existing Eloquent model classes.
//!
//! Models are scanned statically: the PHP source is matched against a small
//! set of patterns for the class declaration, the model properties that
//! affect the table (`$table`, `$primaryKey`, `$timestamps`, `$fillable`,
//! casts) and zero-argument relation methods such as
//!
//! ```php
//! public function role(): BelongsTo
//! {
//!     return $this->belongsTo(Role::class, 'role_id');
//! }
//! ```
//!
//! When a schema dump is available the columns come from the model's table;
//! otherwise they are synthesized from `$fillable`, the casts and the
//! timestamp conventions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use heck::ToSnakeCase;
use regex::Regex;
use walkdir::WalkDir;

use super::schema::{normalize_column, SchemaDump};
use super::MakeStructures;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::NameStr;
use crate::structure::{CodeStructure, CodeStructureList, ColumnStructure, RelationStructure};
use crate::types::SqlType;

/// Framework models that are never scaffolded.
const EXCLUDED_MODELS: [&str; 2] = ["MoonshineUser", "MoonshineUserRole"];

const MODEL_BASES: [&str; 5] = ["Model", "Authenticatable", "Pivot", "MorphPivot", "User"];

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRelation {
    pub kind: SqlType,
    pub method: String,
    /// Class basename of the related model.
    pub related: String,
    /// String arguments after the related class, in call order.
    pub args: Vec<String>,
}

/// What a scan learned about one model class.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelClass {
    pub path: PathBuf,
    pub namespace: Option<String>,
    pub name: String,
    pub extends: Option<String>,
    pub is_abstract: bool,
    pub table: Option<String>,
    pub primary_key: Option<String>,
    pub timestamps: bool,
    pub soft_deletes: bool,
    pub fillable: Vec<String>,
    /// Declared casts; class casts are resolved to qualified names.
    pub casts: Vec<(String, String)>,
    pub relations: Vec<ModelRelation>,
}

impl ModelClass {
    /// Table name, defaulting to the snake plural of the class.
    pub fn table_name(&self) -> String {
        self.table
            .clone()
            .unwrap_or_else(|| NameStr::new(self.name.as_str()).plural_snake())
    }

    pub fn key_name(&self) -> &str {
        self.primary_key.as_deref().unwrap_or("id")
    }

    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}\\{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Foreign key other tables use to point at this model (`user_id`).
    pub fn foreign_key(&self) -> String {
        format!("{}_{}", self.name.to_snake_case(), self.key_name())
    }

    fn cast(&self, column: &str) -> Option<&str> {
        self.casts
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cast)| cast.as_str())
    }

    fn extends_framework_model(&self) -> bool {
        self.extends.as_deref().is_some_and(|base| {
            let base = class_basename(base);
            MODEL_BASES.contains(&base) || base.ends_with("Model")
        })
    }
}

fn class_basename(class: &str) -> &str {
    class.rsplit('\\').next().unwrap_or(class)
}

/// Compiled patterns for scanning PHP model sources.
#[derive(Debug)]
pub struct PhpScanner {
    namespace: Regex,
    import: Regex,
    class: Regex,
    trait_use: Regex,
    table: Regex,
    primary_key: Regex,
    no_timestamps: Regex,
    fillable: Regex,
    casts_property: Regex,
    casts_method: Regex,
    cast_pair: Regex,
    quoted: Regex,
    relation: Regex,
}

impl PhpScanner {
    pub fn new() -> BuilderResult<Self> {
        Ok(Self {
            namespace: Regex::new(r"(?m)^\s*namespace\s+([\w\\]+)\s*;")?,
            import: Regex::new(r"(?m)^\s*use\s+\\?([\w\\]+)(?:\s+as\s+(\w+))?\s*;")?,
            class: Regex::new(
                r"(?m)^\s*((?:(?:abstract|final|readonly)\s+)*)class\s+(\w+)(?:\s+extends\s+\\?([\w\\]+))?",
            )?,
            trait_use: Regex::new(r"(?m)^\s*use\s+([\w\\,\s]+?)\s*[;{]")?,
            table: Regex::new(r#"(?:protected|public)\s+(?:\??string\s+)?\$table\s*=\s*['"]([^'"]+)['"]"#)?,
            primary_key: Regex::new(
                r#"(?:protected|public)\s+(?:\??string\s+)?\$primaryKey\s*=\s*['"]([^'"]+)['"]"#,
            )?,
            no_timestamps: Regex::new(r"(?:protected|public)\s+(?:bool\s+)?\$timestamps\s*=\s*false")?,
            fillable: Regex::new(r"(?s)\$fillable\s*=\s*\[(.*?)\]")?,
            casts_property: Regex::new(r"(?s)\$casts\s*=\s*\[(.*?)\]\s*;")?,
            casts_method: Regex::new(r"(?s)function\s+casts\s*\(\s*\)[^{]*\{.*?return\s*\[(.*?)\]\s*;")?,
            cast_pair: Regex::new(
                r#"['"]([^'"]+)['"]\s*=>\s*(?:['"]([^'"]+)['"]|\\?([\w\\]+)::class)"#,
            )?,
            quoted: Regex::new(r#"['"]([^'"]*)['"]"#)?,
            relation: Regex::new(
                r#"(?s)public\s+function\s+(\w+)\s*\(\s*\)[^{;]*\{\s*return\s+\$this\s*->\s*(belongsToMany|belongsTo|hasMany|hasOne)\s*\(\s*\\?([\w\\]+)::class((?:\s*,\s*['"][^'"]*['"])*)"#,
            )?,
        })
    }

    pub fn parse_file(&self, path: &Path) -> BuilderResult<ModelClass> {
        let source = std::fs::read_to_string(path).map_err(|e| BuilderError::io(path, e))?;
        self.parse(path, &source)
    }

    /// Scan one PHP source file.
    pub fn parse(&self, path: &Path, source: &str) -> BuilderResult<ModelClass> {
        let class = self.class.captures(source).ok_or_else(|| BuilderError::ModelParse {
            path: path.to_path_buf(),
            reason: "no class declaration".to_string(),
        })?;
        let class_start = class.get(0).map_or(0, |m| m.start());
        let (header, body) = source.split_at(class_start);

        let namespace = self
            .namespace
            .captures(header)
            .map(|c| c[1].to_string());

        let mut imports: HashMap<String, String> = HashMap::new();
        for import in self.import.captures_iter(header) {
            let full = import[1].to_string();
            let alias = import
                .get(2)
                .map(|a| a.as_str().to_string())
                .unwrap_or_else(|| class_basename(&full).to_string());
            imports.insert(alias, full);
        }
        let resolve = |name: &str| -> String {
            if name.contains('\\') {
                return name.to_string();
            }
            match imports.get(name) {
                Some(full) => full.clone(),
                None => match &namespace {
                    Some(ns) => format!("{ns}\\{name}"),
                    None => name.to_string(),
                },
            }
        };

        let extends = class.get(3).map(|e| resolve(e.as_str()));

        let soft_deletes = self.trait_use.captures_iter(body).any(|traits| {
            traits[1]
                .split(',')
                .map(str::trim)
                .any(|t| class_basename(&resolve(t)) == "SoftDeletes")
        });

        let fillable: Vec<String> = self
            .fillable
            .captures(body)
            .map(|c| {
                self.quoted
                    .captures_iter(&c[1])
                    .map(|q| q[1].to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut casts = Vec::new();
        let cast_blocks = self
            .casts_property
            .captures_iter(body)
            .chain(self.casts_method.captures_iter(body));
        for block in cast_blocks {
            for pair in self.cast_pair.captures_iter(&block[1]) {
                let value = match (pair.get(2), pair.get(3)) {
                    (Some(cast), _) => cast.as_str().to_string(),
                    (None, Some(class)) => resolve(class.as_str()),
                    (None, None) => continue,
                };
                casts.push((pair[1].to_string(), value));
            }
        }

        let relations = self
            .relation
            .captures_iter(body)
            .filter_map(|relation| {
                let kind = match &relation[2] {
                    "belongsTo" => SqlType::BelongsTo,
                    "hasMany" => SqlType::HasMany,
                    "hasOne" => SqlType::HasOne,
                    "belongsToMany" => SqlType::BelongsToMany,
                    _ => return None,
                };
                let related = resolve(&relation[3]);
                Some(ModelRelation {
                    kind,
                    method: relation[1].to_string(),
                    related: class_basename(&related).to_string(),
                    args: self
                        .quoted
                        .captures_iter(relation.get(4).map_or("", |a| a.as_str()))
                        .map(|q| q[1].to_string())
                        .collect(),
                })
            })
            .collect();

        Ok(ModelClass {
            path: path.to_path_buf(),
            namespace: namespace.clone(),
            name: class[2].to_string(),
            extends,
            is_abstract: class[1].contains("abstract"),
            table: self.table.captures(body).map(|c| c[1].to_string()),
            primary_key: self.primary_key.captures(body).map(|c| c[1].to_string()),
            timestamps: !self.no_timestamps.is_match(body),
            soft_deletes,
            fillable,
            casts,
            relations,
        })
    }
}

/// Normalize a declared cast to the value written in build files.
///
/// Unknown string casts are dropped; class casts keep their qualified name.
pub fn normalize_cast(cast: &str) -> Option<String> {
    let normalized = match cast {
        "int" | "integer" => "int",
        "real" | "float" | "double" => "float",
        "string" => "string",
        "bool" | "boolean" => "bool",
        "array" | "json" => "array",
        "collection" => "collection",
        "date" | "datetime" | "immutable_date" | "immutable_datetime" => "datetime",
        "timestamp" => "timestamp",
        other if other.contains('\\') => other,
        _ => return None,
    };
    Some(normalized.to_string())
}

/// Column type for a synthesized column with the given raw cast.
fn type_for_cast(cast: Option<&str>) -> SqlType {
    let Some(cast) = cast else {
        return SqlType::String;
    };
    match cast {
        "int" | "integer" => SqlType::Integer,
        "real" | "float" | "double" => SqlType::Float,
        "bool" | "boolean" => SqlType::Boolean,
        "array" | "json" | "collection" | "object" => SqlType::Json,
        "date" | "immutable_date" => SqlType::Date,
        "timestamp" => SqlType::Timestamp,
        c if c.starts_with("decimal") => SqlType::Decimal,
        c if c.starts_with("datetime") || c.starts_with("immutable_datetime") => {
            SqlType::DateTime
        }
        _ => SqlType::String,
    }
}

/// Structures built from scanned Eloquent models.
#[derive(Debug)]
pub struct ModelSource {
    models: Vec<ModelClass>,
    /// Class basename to (table, key name) across every scanned model.
    index: HashMap<String, (String, String)>,
    schema: Option<SchemaDump>,
}

impl ModelSource {
    /// Scan `dir` recursively for models whose class name contains `filter`
    /// (case-insensitive).
    pub fn discover(
        dir: &Path,
        filter: Option<&str>,
        schema: Option<SchemaDump>,
    ) -> BuilderResult<Self> {
        let scanner = PhpScanner::new()?;
        let mut classes = Vec::new();

        if !dir.is_dir() {
            tracing::warn!(?dir, "Models directory not found");
        }

        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
        {
            match scanner.parse_file(entry.path()) {
                Ok(class) => classes.push(class),
                Err(BuilderError::ModelParse { path, reason }) => {
                    tracing::debug!(?path, %reason, "Skipping PHP file");
                }
                Err(e) => return Err(e),
            }
        }

        let mut models = select_models(classes);
        let index = build_index(&models);

        models.retain(|model| {
            !model.is_abstract
                && !EXCLUDED_MODELS
                    .iter()
                    .any(|excluded| excluded.eq_ignore_ascii_case(&model.name))
                && filter.map_or(true, |f| model.name.to_lowercase().contains(&f.to_lowercase()))
        });

        tracing::debug!(?dir, models = models.len(), "Discovered models");
        Ok(Self {
            models,
            index,
            schema,
        })
    }

    pub fn from_models(models: Vec<ModelClass>, schema: Option<SchemaDump>) -> Self {
        let index = build_index(&models);
        Self {
            models,
            index,
            schema,
        }
    }

    pub fn models(&self) -> &[ModelClass] {
        &self.models
    }

    fn related(&self, class: &str) -> (String, String) {
        self.index.get(class).cloned().unwrap_or_else(|| {
            (NameStr::new(class).plural_snake(), "id".to_string())
        })
    }

    pub fn make_structure(&self, model: &ModelClass) -> BuilderResult<CodeStructure> {
        let table = model.table_name();
        let mut structure = CodeStructure::new(table.clone(), model.name.clone());

        match self.schema.as_ref().and_then(|s| s.table(&table)) {
            Some(table_schema) => {
                let primary_key = table_schema.primary_key(model.key_name());
                for raw in &table_schema.columns {
                    let normalized = normalize_column(raw, primary_key)?;
                    structure.add_column(
                        ColumnStructure::new(raw.name.clone(), raw.name.clone(), normalized.ty)
                            .with_default(normalized.default)
                            .nullable(raw.nullable),
                    );
                }
            }
            None => self.synthesize_columns(model, &mut structure),
        }

        for column in structure.columns_mut() {
            if let Some(cast) = model.cast(column.column()) {
                column.set_cast(normalize_cast(cast));
            }
        }

        for relation in &model.relations {
            self.apply_relation(model, relation, &mut structure);
        }

        Ok(structure)
    }

    fn synthesize_columns(&self, model: &ModelClass, structure: &mut CodeStructure) {
        let key = model.key_name();
        push_missing(structure, ColumnStructure::new(key, key, SqlType::Id));

        for column in &model.fillable {
            let ty = type_for_cast(model.cast(column));
            push_missing(structure, ColumnStructure::new(column.as_str(), column.as_str(), ty));
        }

        for (column, cast) in &model.casts {
            let ty = type_for_cast(Some(cast));
            push_missing(
                structure,
                ColumnStructure::new(column.as_str(), column.as_str(), ty).nullable(true),
            );
        }

        for relation in model.relations.iter().filter(|r| r.kind == SqlType::BelongsTo) {
            let column = self.belongs_to_key(relation);
            push_missing(
                structure,
                ColumnStructure::new(column.as_str(), column.as_str(), SqlType::UnsignedBigInteger),
            );
        }

        if model.timestamps {
            for column in ["created_at", "updated_at"] {
                push_missing(
                    structure,
                    ColumnStructure::new(column, column, SqlType::Timestamp).nullable(true),
                );
            }
        }
        if model.soft_deletes {
            push_missing(
                structure,
                ColumnStructure::new("deleted_at", "deleted_at", SqlType::Timestamp).nullable(true),
            );
        }
    }

    fn belongs_to_key(&self, relation: &ModelRelation) -> String {
        relation.args.first().cloned().unwrap_or_else(|| {
            let (_, key) = self.related(&relation.related);
            format!("{}_{}", relation.method.to_snake_case(), key)
        })
    }

    fn apply_relation(&self, model: &ModelClass, relation: &ModelRelation, structure: &mut CodeStructure) {
        let (related_table, related_key) = self.related(&relation.related);

        match relation.kind {
            SqlType::BelongsTo => {
                let foreign_key = self.belongs_to_key(relation);
                let owner_key = relation.args.get(1).cloned().unwrap_or(related_key);
                let Some(existing) = structure.column(&foreign_key) else {
                    tracing::debug!(
                        model = %model.name,
                        column = %foreign_key,
                        "BelongsTo foreign key not found in columns"
                    );
                    return;
                };

                let mut column = existing.retyped(SqlType::BelongsTo);
                column.set_relation(
                    RelationStructure::new(owner_key, related_table)
                        .with_model_relation_name(relation.method.as_str()),
                );
                structure.replace_column(&foreign_key, column);
            }
            SqlType::HasMany | SqlType::HasOne | SqlType::BelongsToMany => {
                // belongsToMany(Related::class, 'pivot_table', 'foreign_pivot_key')
                let foreign_key = match relation.kind {
                    SqlType::BelongsToMany => relation.args.get(1).cloned(),
                    _ => relation.args.first().cloned(),
                }
                .unwrap_or_else(|| model.foreign_key());

                let (column_name, default) = if relation.kind == SqlType::HasOne {
                    (NameStr::new(related_table.as_str()).singular().to_snake_case(), None)
                } else {
                    (related_table.clone(), Some("[]".to_string()))
                };

                let mut column = ColumnStructure::new(column_name.clone(), column_name, relation.kind)
                    .with_default(default);
                column.set_relation(
                    RelationStructure::new(foreign_key, related_table)
                        .with_model_relation_name(relation.method.as_str()),
                );
                structure.add_column(column);
            }
            _ => {}
        }
    }
}

fn push_missing(structure: &mut CodeStructure, column: ColumnStructure) {
    if structure.column(column.column()).is_none() {
        structure.add_column(column);
    }
}

/// Keep the classes that are models: those extending a framework model base
/// or, transitively, another scanned model.
fn select_models(classes: Vec<ModelClass>) -> Vec<ModelClass> {
    let mut is_model: Vec<bool> = classes.iter().map(ModelClass::extends_framework_model).collect();

    loop {
        let known: Vec<&str> = classes
            .iter()
            .zip(&is_model)
            .filter(|(_, model)| **model)
            .map(|(class, _)| class.name.as_str())
            .collect();

        let mut changed = false;
        for (class, model) in classes.iter().zip(is_model.iter_mut()) {
            if *model {
                continue;
            }
            if class
                .extends
                .as_deref()
                .is_some_and(|base| known.contains(&class_basename(base)))
            {
                *model = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    classes
        .into_iter()
        .zip(is_model)
        .filter_map(|(class, model)| model.then_some(class))
        .collect()
}

fn build_index(models: &[ModelClass]) -> HashMap<String, (String, String)> {
    models
        .iter()
        .map(|m| (m.name.clone(), (m.table_name(), m.key_name().to_string())))
        .collect()
}

impl MakeStructures for ModelSource {
    fn make_structures(&self) -> BuilderResult<CodeStructureList> {
        self.models.iter().map(|m| self.make_structure(m)).collect()
    }
}
