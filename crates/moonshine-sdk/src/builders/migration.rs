use tera::Context;

use super::{Builder, RenderedFile};
use crate::code_path::{BuildType, CodePath};
use crate::error::BuilderResult;
use crate::naming::NameStr;
use crate::stubs::{Stub, StubRenderer};
use crate::structure::{CodeStructure, ColumnStructure, RelationStructure};
use crate::types::SqlType;

const LINE_INDENT: &str = "            ";
const CHAIN_INDENT: &str = "                ";

/// Renders the `create_<table>` migration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationBuilder;

impl Builder for MigrationBuilder {
    fn build_type(&self) -> BuildType {
        BuildType::Migration
    }

    fn build(
        &self,
        structure: &CodeStructure,
        paths: &CodePath,
        stubs: &StubRenderer,
    ) -> BuilderResult<RenderedFile> {
        let path = paths.path(BuildType::Migration)?;
        let timestamps = structure.is_timestamps();
        let soft_deletes = structure.is_soft_deletes();

        let mut context = Context::new();
        context.insert("table", structure.table());
        context.insert("columns", &columns(structure));
        context.insert("is_timestamps", &timestamps);
        context.insert("is_soft_deletes", &soft_deletes);
        context.insert(
            "timestamps",
            &if timestamps {
                format!("\n{LINE_INDENT}$table->timestamps();")
            } else {
                String::new()
            },
        );
        context.insert(
            "soft_deletes",
            &if soft_deletes {
                format!("\n{LINE_INDENT}$table->softDeletes();")
            } else {
                String::new()
            },
        );

        let content = stubs.render(Stub::Migration, &context)?;
        Ok(RenderedFile::new(path.file(), content))
    }
}

fn columns(structure: &CodeStructure) -> String {
    let timestamps = structure.is_timestamps();
    let soft_deletes = structure.is_soft_deletes();

    structure
        .columns()
        .iter()
        .filter(|c| !c.ty().is_many_relation())
        .filter(|c| !(timestamps && (c.is_created_at() || c.is_updated_at())))
        .filter(|c| !(soft_deletes && c.is_deleted_at()))
        .map(|c| format!("{LINE_INDENT}$table->{}{};", definition(c), methods(c)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn definition(column: &ColumnStructure) -> String {
    if column.ty() == SqlType::BelongsTo {
        return foreign_id_for(column);
    }

    let mut args = Vec::new();
    if !(column.column() == "id" && column.ty() == SqlType::Id) {
        args.push(format!("'{}'", column.column()));
    }
    args.extend(column.migration_options().iter().cloned());

    format!("{}({})", column.ty(), args.join(", "))
}

fn foreign_id_for(column: &ColumnStructure) -> String {
    let model = match column.model_class() {
        Some(class) => class.to_string(),
        None => {
            let class = column.relation().map(RelationStructure::model).unwrap_or_else(|| {
                NameStr::new(column.column().trim_end_matches("_id")).uc_first_singular()
            });
            format!("\\App\\Models\\{class}")
        }
    };

    format!(
        "foreignIdFor({model}::class)\n{CHAIN_INDENT}->constrained()\n{CHAIN_INDENT}->cascadeOnDelete()\n{CHAIN_INDENT}->cascadeOnUpdate()"
    )
}

fn methods(column: &ColumnStructure) -> String {
    let mut calls: Vec<String> = column
        .migration_methods()
        .iter()
        .map(|method| {
            if method.contains('(') {
                method.clone()
            } else {
                format!("{method}()")
            }
        })
        .collect();

    if column.is_nullable() && !calls.iter().any(|m| m.starts_with("nullable(")) {
        calls.push("nullable()".to_string());
    }

    calls.iter().map(|call| format!("->{call}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::Path;

    fn render(structure: &CodeStructure) -> (String, String) {
        let now = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let paths = CodePath::init(structure, Path::new("/app"), 2, now);
        let stubs = StubRenderer::embedded().unwrap();
        let file = MigrationBuilder.build(structure, &paths, &stubs).unwrap();
        (file.path.display().to_string(), file.content)
    }

    #[test]
    fn test_tasks_migration() {
        let mut structure = CodeStructure::new("tasks", "Task");
        structure.add_column(ColumnStructure::new("id", "", SqlType::Id));

        let mut priority = ColumnStructure::new("priority", "", SqlType::String);
        priority.set_migration_methods(vec!["default('Низкий')".to_string()]);
        structure.add_column(priority);

        let mut price = ColumnStructure::new("price", "", SqlType::Decimal).nullable(true);
        price.set_migration_options(vec!["10".to_string(), "2".to_string()]);
        structure.add_column(price);

        let mut attachments = ColumnStructure::new("attachments", "", SqlType::HasMany);
        attachments.set_relation(RelationStructure::new("task_id", "task_attachments"));
        structure.add_column(attachments);

        for column in ["created_at", "updated_at", "deleted_at"] {
            structure.add_column(ColumnStructure::new(column, "", SqlType::Timestamp).nullable(true));
        }

        let (path, migration) = render(&structure);
        assert_eq!(path, "/app/database/migrations/2024_03_09_083002_create_tasks.php");
        assert!(migration.contains("Schema::create('tasks', function (Blueprint $table) {"));
        assert!(migration.contains("            $table->id();\n"));
        assert!(migration.contains("$table->string('priority')->default('Низкий');"));
        assert!(migration.contains("$table->decimal('price', 10, 2)->nullable();"));
        assert!(migration.contains("$table->timestamps();"));
        assert!(migration.contains("$table->softDeletes();"));
        assert!(!migration.contains("attachments"));
        assert!(!migration.contains("created_at"));
        assert!(migration.contains("Schema::dropIfExists('tasks');"));
    }

    #[test]
    fn test_belongs_to_migration() {
        let mut structure = CodeStructure::new("task_attachments", "TaskAttachment");
        let mut task = ColumnStructure::new("task_id", "", SqlType::BelongsTo);
        task.set_relation(RelationStructure::new("id", "tasks"));
        structure.add_column(task);

        let mut author = ColumnStructure::new("author_id", "", SqlType::BelongsTo).nullable(true);
        author.set_relation(RelationStructure::new("id", "users"));
        author.set_model_class(Some("\\App\\Models\\Admin".to_string()));
        author.set_migration_methods(vec!["nullable".to_string()]);
        structure.add_column(author);

        let (_, migration) = render(&structure);
        assert!(migration.contains(
            "$table->foreignIdFor(\\App\\Models\\Task::class)\n                ->constrained()\n                ->cascadeOnDelete()\n                ->cascadeOnUpdate();"
        ));
        assert!(migration.contains("foreignIdFor(\\App\\Models\\Admin::class)"));
        assert!(migration.contains("->cascadeOnUpdate()->nullable();"));
        assert_eq!(migration.matches("nullable()").count(), 1);
        assert!(!migration.contains("timestamps()"));
    }

    #[test]
    fn test_belongs_to_multi_word_table() {
        let mut structure = CodeStructure::new("attachment_comments", "AttachmentComment");
        let mut attachment = ColumnStructure::new("task_attachment_id", "", SqlType::BelongsTo);
        attachment.set_relation(RelationStructure::new("id", "task_attachments"));
        structure.add_column(attachment);

        let mut reviewer = ColumnStructure::new("review_category_id", "", SqlType::BelongsTo);
        reviewer.set_relation(RelationStructure::new("id", "review_categories"));
        structure.add_column(reviewer);

        let (_, migration) = render(&structure);
        assert!(migration.contains("foreignIdFor(\\App\\Models\\TaskAttachment::class)"));
        assert!(migration.contains("foreignIdFor(\\App\\Models\\ReviewCategory::class)"));
        assert!(!migration.contains("_attachment::class"));
    }
}
