//! Structures described by field specs given on the command line.

use std::str::FromStr;

use heck::ToSnakeCase;

use super::json::timestamp_column;
use super::MakeStructures;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::NameStr;
use crate::structure::{CodeStructure, CodeStructureList, ColumnStructure, RelationStructure};
use crate::types::SqlType;

/// One `column:type[:name[:relation_table]]` spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleField {
    pub column: String,
    pub ty: SqlType,
    pub name: String,
    pub relation_table: Option<String>,
}

impl FromStr for ConsoleField {
    type Err = BuilderError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let mut parts = spec.split(':').map(str::trim);

        let column = parts.next().filter(|c| !c.is_empty());
        let ty = parts.next().filter(|t| !t.is_empty());
        let (Some(column), Some(ty)) = (column, ty) else {
            return Err(BuilderError::InvalidFieldSpec {
                spec: spec.to_string(),
                reason: "expected column:type[:name[:relation_table]]".to_string(),
            });
        };

        let ty = ty.parse().map_err(|_| BuilderError::WrongColumnType {
            column: column.to_string(),
            ty: ty.to_string(),
        })?;

        Ok(Self {
            column: column.to_string(),
            ty,
            name: parts.next().unwrap_or_default().to_string(),
            relation_table: parts.next().filter(|t| !t.is_empty()).map(str::to_string),
        })
    }
}

#[derive(Debug)]
pub struct ConsoleSource {
    entity: String,
    fields: Vec<ConsoleField>,
    migration: bool,
    timestamps: bool,
    soft_deletes: bool,
}

impl ConsoleSource {
    /// `entity` may carry a trailing `Resource` (`ProductResource`).
    pub fn new(entity: &str, fields: Vec<ConsoleField>) -> Self {
        let entity = entity.strip_suffix("Resource").unwrap_or(entity);
        Self {
            entity: entity.to_string(),
            fields,
            migration: false,
            timestamps: false,
            soft_deletes: false,
        }
    }

    pub fn with_migration(mut self, migration: bool) -> Self {
        self.migration = migration;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_soft_deletes(mut self, soft_deletes: bool) -> Self {
        self.soft_deletes = soft_deletes;
        self
    }
}

impl MakeStructures for ConsoleSource {
    fn make_structures(&self) -> BuilderResult<CodeStructureList> {
        let entity = NameStr::new(self.entity.as_str());
        let mut structure = CodeStructure::new(entity.plural_snake(), self.entity.clone());
        structure.set_with_migration(self.migration);
        structure.set_with_model(true);
        structure.set_with_resource(true);

        let owner_key = format!("{}_id", entity.singular().to_snake_case());

        for field in &self.fields {
            let mut column = ColumnStructure::new(field.column.clone(), field.name.clone(), field.ty)
                .required(true);

            if let Some(table) = &field.relation_table {
                let foreign_key = match field.ty {
                    SqlType::BelongsTo | SqlType::BelongsToMany => "id".to_string(),
                    _ => owner_key.clone(),
                };
                column.set_relation(RelationStructure::new(foreign_key, table.clone()));
            }

            structure.add_column(column);
        }

        if self.timestamps {
            structure.add_column(timestamp_column("created_at", "Created at"));
            structure.add_column(timestamp_column("updated_at", "Updated at"));
        }
        if self.soft_deletes {
            structure.add_column(timestamp_column("deleted_at", "Deleted at"));
        }

        Ok(std::iter::once(structure).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_spec() {
        let field: ConsoleField = "category_id:BelongsTo:Category:categories".parse().unwrap();
        assert_eq!(field.column, "category_id");
        assert_eq!(field.ty, SqlType::BelongsTo);
        assert_eq!(field.name, "Category");
        assert_eq!(field.relation_table.as_deref(), Some("categories"));

        let short: ConsoleField = "title:string".parse().unwrap();
        assert_eq!(short.name, "");
        assert_eq!(short.relation_table, None);
    }

    #[test]
    fn test_parse_field_spec_errors() {
        let err = "title".parse::<ConsoleField>().unwrap_err();
        assert!(matches!(err, BuilderError::InvalidFieldSpec { .. }));

        let err = "title:varchar".parse::<ConsoleField>().unwrap_err();
        assert_eq!(err.to_string(), "For column 'title' the wrong type 'varchar' is set.");
    }

    #[test]
    fn test_console_structure() {
        let fields = vec![
            "id:id".parse().unwrap(),
            "title:string:Название".parse().unwrap(),
            "category_id:BelongsTo:Category:categories".parse().unwrap(),
            "comments:HasMany:Comments:comments".parse().unwrap(),
        ];
        let list = ConsoleSource::new("ProductResource", fields)
            .with_timestamps(true)
            .make_structures()
            .unwrap();
        let structure = &list.structures()[0];

        assert_eq!(structure.table(), "products");
        assert_eq!(structure.entity().raw(), "Product");
        assert!(!structure.with_migration());
        assert!(structure.is_timestamps());
        assert!(!structure.is_soft_deletes());

        let title = structure.column("title").unwrap();
        assert_eq!(title.name(), "Название");
        assert!(title.is_required());

        let category = structure.column("category_id").unwrap();
        assert_eq!(category.relation().unwrap().foreign_column(), "id");

        let comments = structure.column("comments").unwrap();
        assert_eq!(comments.relation().unwrap().foreign_column(), "product_id");
    }

    #[test]
    fn test_console_migration_and_soft_deletes() {
        let list = ConsoleSource::new("TaskAttachment", vec![])
            .with_migration(true)
            .with_soft_deletes(true)
            .make_structures()
            .unwrap();
        let structure = &list.structures()[0];
        assert_eq!(structure.table(), "task_attachments");
        assert!(structure.with_migration());
        assert!(structure.is_soft_deletes());
    }
}
