//! Admin-panel fragments derived from a structure: field declarations,
//! their imports, validation rules and the eager-load list.

use crate::error::BuilderResult;
use crate::field_map::FieldMap;
use crate::naming::NameStr;
use crate::structure::{CodeStructure, ColumnStructure, DATE_COLUMNS};

const FIELD_INDENT: &str = "            ";
const METHOD_INDENT: &str = "                ";

#[derive(Debug, Clone, Copy)]
pub struct MoonShineStructure<'a> {
    structure: &'a CodeStructure,
}

impl<'a> MoonShineStructure<'a> {
    pub fn new(structure: &'a CodeStructure) -> Self {
        Self { structure }
    }

    fn visible_columns(&self) -> impl Iterator<Item = &'a ColumnStructure> {
        self.structure
            .columns()
            .iter()
            .filter(|c| !c.is_laravel_timestamp())
    }

    /// Unique `use` lines for every field class and related resource.
    pub fn uses_for_fields(&self) -> BuilderResult<Vec<String>> {
        let mut uses: Vec<String> = Vec::new();
        let mut push = |line: String| {
            if !uses.contains(&line) {
                uses.push(line);
            }
        };

        for column in self.visible_columns() {
            push(format!("use {};", field_class(column)?));
            if column.relation().is_some() {
                push(format!("use {};", related_resource_import(column)));
            }
        }

        Ok(uses)
    }

    /// One `Field::make(...)` expression per visible column.
    pub fn fields(&self, only_filters: bool) -> BuilderResult<Vec<String>> {
        let mut fields = Vec::new();

        for column in self.visible_columns() {
            if only_filters && !column.has_filter() {
                continue;
            }

            let class = field_class(column)?;
            let short = class_basename(&class);

            let field = if column.relation().is_some() {
                format!(
                    "{short}::make('{}', '{}', resource: {}::class){}",
                    column.name(),
                    column.model_relation_name(),
                    related_resource_class(column),
                    resource_methods(column, false),
                )
            } else if column.is_id() {
                format!("{short}::make('{}'){}", column.column(), resource_methods(column, true))
            } else {
                format!(
                    "{short}::make('{}', '{}'){}",
                    column.name(),
                    column.column(),
                    resource_methods(column, true),
                )
            };

            fields.push(field);
        }

        Ok(fields)
    }

    /// Validation rules, `'column' => ['type', 'required'|'nullable']`.
    pub fn rules(&self) -> Vec<String> {
        self.structure
            .columns()
            .iter()
            .filter(|c| !c.is_id())
            .filter(|c| !DATE_COLUMNS.contains(&c.column()))
            .filter(|c| !c.ty().is_many_relation())
            .map(|c| {
                let required = if c.is_required() { "required" } else { "nullable" };
                format!("'{}' => ['{}', '{required}']", c.column(), c.rules_type())
            })
            .collect()
    }

    /// Relation names to eager-load.
    pub fn with_property(&self) -> Vec<String> {
        self.structure
            .columns()
            .iter()
            .filter(|c| c.relation().is_some())
            .map(ColumnStructure::model_relation_name)
            .collect()
    }
}

/// Newline-prefixed, indented list items (`\n            item,`).
pub(crate) fn list_fragment(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\n{FIELD_INDENT}{item},"))
        .collect()
}

fn field_class(column: &ColumnStructure) -> BuilderResult<String> {
    match column.field_class() {
        Some(alias) => FieldMap::field_from_alias(alias),
        None => Ok(FieldMap::field_for_type(column.ty())),
    }
}

fn class_basename(class: &str) -> &str {
    class.rsplit('\\').next().unwrap_or(class)
}

/// Resource class name for a related table (`task_attachments` → `TaskAttachmentResource`).
fn related_resource_class(column: &ColumnStructure) -> String {
    if let Some(class) = column.resource_class() {
        return class_basename(class).to_string();
    }
    format!("{}Resource", related_resource_name(column))
}

fn related_resource_name(column: &ColumnStructure) -> String {
    let table = column
        .relation()
        .map(|r| r.table().camel())
        .unwrap_or_else(|| column.column().to_string());
    NameStr::new(table)
        .uc_first_singular()
        .replace("Moonshine", "MoonShine")
}

fn related_resource_import(column: &ColumnStructure) -> String {
    match column.resource_class() {
        Some(class) => class.trim_start_matches('\\').to_string(),
        None => {
            let name = related_resource_name(column);
            format!("App\\MoonShine\\Resources\\{name}\\{name}Resource")
        }
    }
}

fn resource_methods(column: &ColumnStructure, new_lines: bool) -> String {
    column
        .resource_methods()
        .iter()
        .map(|method| {
            let call = if method.contains('(') {
                method.clone()
            } else {
                format!("{method}()")
            };
            if new_lines {
                format!("\n{METHOD_INDENT}->{call}")
            } else {
                format!("->{call}")
            }
        })
        .collect()
}
