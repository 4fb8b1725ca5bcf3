//! Structures built from a table in a schema dump.

use super::schema::{normalize_column, SchemaDump};
use super::MakeStructures;
use crate::error::{BuilderError, BuilderResult};
use crate::naming::NameStr;
use crate::structure::{CodeStructure, CodeStructureList, ColumnStructure, RelationStructure};
use crate::types::SqlType;

#[derive(Debug)]
pub struct TableSource {
    schema: SchemaDump,
    table: String,
    entity: String,
    belongs_to: bool,
    has_many: Vec<String>,
    has_one: Vec<String>,
    belongs_to_many: Vec<String>,
}

impl TableSource {
    /// Source for `table`; the entity is named after the table.
    pub fn new(schema: SchemaDump, table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            schema,
            entity: table.clone(),
            table,
            belongs_to: true,
            has_many: Vec::new(),
            has_one: Vec::new(),
            belongs_to_many: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = entity.into();
        self
    }

    /// Whether foreign keys become `BelongsTo` columns.
    pub fn with_belongs_to(mut self, belongs_to: bool) -> Self {
        self.belongs_to = belongs_to;
        self
    }

    pub fn with_has_many(mut self, tables: Vec<String>) -> Self {
        self.has_many = tables;
        self
    }

    pub fn with_has_one(mut self, tables: Vec<String>) -> Self {
        self.has_one = tables;
        self
    }

    pub fn with_belongs_to_many(mut self, tables: Vec<String>) -> Self {
        self.belongs_to_many = tables;
        self
    }

    pub fn make_structure(&self) -> BuilderResult<CodeStructure> {
        let table = self
            .schema
            .table(&self.table)
            .ok_or_else(|| BuilderError::TableNotFound(self.table.clone()))?;
        let primary_key = table.primary_key("id");

        let mut structure = CodeStructure::new(self.table.clone(), self.entity.clone());
        // The table already exists.
        structure.set_with_migration(false);

        for raw in &table.columns {
            let normalized = normalize_column(raw, primary_key)?;
            let foreign = if self.belongs_to {
                table.foreign_key(&raw.name)
            } else {
                None
            };

            let ty = if foreign.is_some() {
                SqlType::BelongsTo
            } else {
                normalized.ty
            };

            let mut column = ColumnStructure::new(raw.name.clone(), raw.name.clone(), ty)
                .with_default(normalized.default)
                .nullable(raw.nullable);

            if let Some(fk) = foreign {
                let foreign_column = fk
                    .foreign_columns
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "id".to_string());
                column.set_relation(RelationStructure::new(
                    foreign_column,
                    fk.foreign_table.clone(),
                ));
            }

            structure.add_column(column);
        }

        let foreign_column = format!("{}_id", NameStr::new(self.table.as_str()).singular());

        for related in &self.has_many {
            let mut column = ColumnStructure::new(related.clone(), related.clone(), SqlType::HasMany)
                .with_default(Some("[]".to_string()));
            column.set_relation(RelationStructure::new(foreign_column.clone(), related.clone()));
            structure.add_column(column);
        }

        for related in &self.has_one {
            let name = NameStr::new(related.as_str()).singular();
            let mut column = ColumnStructure::new(name.clone(), name, SqlType::HasOne);
            column.set_relation(RelationStructure::new(foreign_column.clone(), related.clone()));
            structure.add_column(column);
        }

        for related in &self.belongs_to_many {
            let mut column =
                ColumnStructure::new(related.clone(), related.clone(), SqlType::BelongsToMany)
                    .with_default(Some("[]".to_string()));
            column.set_relation(RelationStructure::new(foreign_column.clone(), related.clone()));
            structure.add_column(column);
        }

        tracing::debug!(table = %self.table, columns = structure.columns().len(), "Built structure from table");
        Ok(structure)
    }
}

impl MakeStructures for TableSource {
    fn make_structures(&self) -> BuilderResult<CodeStructureList> {
        Ok(std::iter::once(self.make_structure()?).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SchemaDump {
        serde_yaml::from_str(
            r#"
tables:
  comments:
    columns:
      - { name: id, type: "bigint unsigned", default: "nextval('comments_id_seq'::regclass)" }
      - { name: body, type: text }
      - { name: post_id, type: "bigint unsigned" }
      - { name: is_visible, type: "tinyint(1)", default: "1" }
      - { name: created_at, type: timestamp, nullable: true, default: CURRENT_TIMESTAMP }
      - { name: updated_at, type: timestamp, nullable: true }
    indexes:
      - { name: primary, columns: [id] }
    foreign_keys:
      - { columns: [post_id], foreign_table: posts, foreign_columns: [id] }
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_make_structure_from_table() {
        let structure = TableSource::new(schema(), "comments").make_structure().unwrap();

        assert_eq!(structure.table(), "comments");
        assert_eq!(structure.entity().uc_first_singular(), "Comment");
        assert!(!structure.with_migration());
        assert!(structure.is_timestamps());

        let id = structure.column("id").unwrap();
        assert_eq!(id.ty(), SqlType::Id);
        assert_eq!(id.default(), None);

        let post = structure.column("post_id").unwrap();
        assert_eq!(post.ty(), SqlType::BelongsTo);
        assert_eq!(post.relation().unwrap().table().raw(), "posts");
        assert_eq!(post.model_relation_name(), "post");

        let visible = structure.column("is_visible").unwrap();
        assert_eq!(visible.ty(), SqlType::Boolean);
        assert_eq!(visible.default(), Some("true"));

        assert_eq!(structure.column("created_at").unwrap().default(), Some(""));
        assert!(structure.column("created_at").unwrap().is_nullable());
    }

    #[test]
    fn test_foreign_keys_ignored_without_belongs_to() {
        let structure = TableSource::new(schema(), "comments")
            .with_belongs_to(false)
            .make_structure()
            .unwrap();
        assert_eq!(structure.column("post_id").unwrap().ty(), SqlType::UnsignedBigInteger);
    }

    #[test]
    fn test_relation_lists() {
        let structure = TableSource::new(schema(), "comments")
            .with_has_many(vec!["reactions".to_string()])
            .with_has_one(vec!["comment_stats".to_string()])
            .with_belongs_to_many(vec!["tags".to_string()])
            .make_structure()
            .unwrap();

        let reactions = structure.column("reactions").unwrap();
        assert_eq!(reactions.ty(), SqlType::HasMany);
        assert_eq!(reactions.relation().unwrap().foreign_column(), "comment_id");
        assert_eq!(reactions.default(), Some("[]"));

        let stats = structure.column("comment_stat").unwrap();
        assert_eq!(stats.ty(), SqlType::HasOne);

        assert_eq!(structure.column("tags").unwrap().ty(), SqlType::BelongsToMany);
        assert!(structure.has_has_many() && structure.has_has_one() && structure.has_belongs_to_many());
    }

    #[test]
    fn test_unknown_table() {
        let err = TableSource::new(schema(), "missing").make_structure().unwrap_err();
        assert!(matches!(err, BuilderError::TableNotFound(t) if t == "missing"));
    }
}
