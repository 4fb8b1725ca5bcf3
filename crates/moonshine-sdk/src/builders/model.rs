use tera::Context;

use super::{Builder, RenderedFile};
use crate::code_path::{BuildType, CodePath};
use crate::error::BuilderResult;
use crate::naming::NameStr;
use crate::stubs::{Stub, StubRenderer};
use crate::structure::{CodeStructure, ColumnStructure};
use crate::types::SqlType;

/// Renders the Eloquent model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelBuilder;

impl Builder for ModelBuilder {
    fn build_type(&self) -> BuildType {
        BuildType::Model
    }

    fn build(
        &self,
        structure: &CodeStructure,
        paths: &CodePath,
        stubs: &StubRenderer,
    ) -> BuilderResult<RenderedFile> {
        let path = paths.path(BuildType::Model)?;

        let soft_deletes = structure.is_soft_deletes();
        let timestamps = structure.is_timestamps();
        let custom_table = structure.table() != structure.entity().plural_snake();
        let has_casts = structure.columns().iter().any(|c| c.cast().is_some());

        let mut context = Context::new();
        context.insert("namespace", path.namespace());
        context.insert("class", &structure.entity().uc_first_singular());
        context.insert("is_soft_deletes", &soft_deletes);
        context.insert("is_timestamps", &timestamps);
        context.insert(
            "use_soft_deletes",
            when(soft_deletes, "\nuse Illuminate\\Database\\Eloquent\\SoftDeletes;"),
        );
        context.insert(
            "use_belongs_to",
            when(
                structure.has_belongs_to(),
                "\nuse Illuminate\\Database\\Eloquent\\Relations\\BelongsTo;",
            ),
        );
        context.insert(
            "use_has_many",
            when(
                structure.has_has_many(),
                "\nuse Illuminate\\Database\\Eloquent\\Relations\\HasMany;",
            ),
        );
        context.insert(
            "use_has_one",
            when(
                structure.has_has_one(),
                "\nuse Illuminate\\Database\\Eloquent\\Relations\\HasOne;",
            ),
        );
        context.insert(
            "use_belongs_to_many",
            when(
                structure.has_belongs_to_many(),
                "\nuse Illuminate\\Database\\Eloquent\\Relations\\BelongsToMany;",
            ),
        );
        context.insert("soft_deletes", when(soft_deletes, "    use SoftDeletes;\n\n"));
        context.insert(
            "table",
            &if custom_table {
                format!("    protected $table = '{}';\n\n", structure.table())
            } else {
                String::new()
            },
        );
        context.insert(
            "timestamps",
            when(!timestamps, "    public $timestamps = false;\n\n"),
        );
        context.insert("fillable", &fillable(structure));
        context.insert(
            "casts",
            &if has_casts {
                format!("\n\n    protected $casts = [{}\n    ];", casts(structure))
            } else {
                String::new()
            },
        );
        context.insert("relations", &relations(structure, stubs)?);

        let content = stubs.render(Stub::Model, &context)?;
        Ok(RenderedFile::new(path.file(), content))
    }
}

fn when(condition: bool, fragment: &str) -> &str {
    if condition {
        fragment
    } else {
        ""
    }
}

fn fillable(structure: &CodeStructure) -> String {
    structure
        .columns()
        .iter()
        .filter(|c| !c.is_id() && !c.ty().is_many_relation() && !c.is_laravel_timestamp())
        .map(|c| format!("\n        '{}',", c.column()))
        .collect()
}

fn casts(structure: &CodeStructure) -> String {
    structure
        .columns()
        .iter()
        .filter_map(|c| c.cast().map(|cast| format!("\n        '{}' => '{cast}',", c.column())))
        .collect()
}

fn relations(structure: &CodeStructure, stubs: &StubRenderer) -> BuilderResult<String> {
    let mut result = String::new();

    for column in structure.columns() {
        let Some(relation) = column.relation() else {
            continue;
        };
        let stub = match column.ty() {
            SqlType::BelongsTo => Stub::BelongsTo,
            SqlType::HasMany => Stub::HasMany,
            SqlType::HasOne => Stub::HasOne,
            SqlType::BelongsToMany => Stub::BelongsToMany,
            _ => continue,
        };

        let relation_column = match column.ty() {
            SqlType::HasMany | SqlType::HasOne => relation.foreign_column(),
            _ => column.column(),
        };
        let relation_id = if column.ty() == SqlType::BelongsTo && relation.foreign_column() != "id" {
            format!(", '{}'", relation.foreign_column())
        } else {
            String::new()
        };

        let mut context = Context::new();
        context.insert("relation", &column.model_relation_name());
        context.insert("relation_model", &relation_model(column));
        context.insert("relation_column", relation_column);
        context.insert("relation_id", &relation_id);

        let method = stubs.render(stub, &context)?;
        result.push_str("\n\n");
        result.push_str(method.trim_end());
    }

    Ok(result)
}

fn relation_model(column: &ColumnStructure) -> String {
    if let Some(class) = column.model_class() {
        return class.to_string();
    }
    column
        .relation()
        .map(|r| r.model())
        .unwrap_or_else(|| NameStr::new(column.column()).uc_first_singular())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::RelationStructure;
    use chrono::NaiveDate;
    use std::path::Path;

    fn render(structure: &CodeStructure) -> String {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let paths = CodePath::init(structure, Path::new("/app"), 0, now);
        let stubs = StubRenderer::embedded().unwrap();
        ModelBuilder.build(structure, &paths, &stubs).unwrap().content
    }

    fn task() -> CodeStructure {
        let mut structure = CodeStructure::new("tasks", "Task");
        structure.add_column(ColumnStructure::new("id", "", SqlType::Id));
        structure.add_column(ColumnStructure::new("title", "", SqlType::String));

        let mut attachments = ColumnStructure::new("attachments", "", SqlType::HasMany);
        attachments.set_relation(RelationStructure::new("task_id", "task_attachments"));
        structure.add_column(attachments);

        for column in ["created_at", "updated_at", "deleted_at"] {
            structure.add_column(ColumnStructure::new(column, "", SqlType::Timestamp).nullable(true));
        }
        structure
    }

    #[test]
    fn test_task_model() {
        let model = render(&task());

        assert!(model.contains("namespace App\\Models;"));
        assert!(model.contains("class Task extends Model"));
        assert!(model.contains("use Illuminate\\Database\\Eloquent\\SoftDeletes;"));
        assert!(model.contains("use Illuminate\\Database\\Eloquent\\Relations\\HasMany;"));
        assert!(!model.contains("Relations\\BelongsTo;"));
        assert!(model.contains("    use SoftDeletes;"));
        assert!(model.contains("protected $fillable = [\n        'title',\n    ];"));
        assert!(model.contains("return $this->hasMany(TaskAttachment::class, 'task_id');"));
        assert!(!model.contains("$timestamps"));
        assert!(!model.contains("$table"));
        assert!(!model.contains("$casts"));
    }

    #[test]
    fn test_belongs_to_with_casts_and_custom_table() {
        let mut structure = CodeStructure::new("attachments_of_tasks", "TaskAttachment");
        structure.add_column(ColumnStructure::new("id", "", SqlType::Id));

        let mut task = ColumnStructure::new("task_uuid", "", SqlType::BelongsTo);
        task.set_relation(RelationStructure::new("uuid", "tasks"));
        structure.add_column(task);

        let mut file = ColumnStructure::new("attachment", "", SqlType::String);
        file.set_cast(Some("json".to_string()));
        structure.add_column(file);

        let model = render(&structure);
        assert!(model.contains("protected $table = 'attachments_of_tasks';"));
        assert!(model.contains("public $timestamps = false;"));
        assert!(model.contains("'attachment' => 'json',"));
        assert!(model.contains("public function task(): BelongsTo"));
        assert!(model.contains("return $this->belongsTo(Task::class, 'uuid');"));
        assert!(model.contains("'task_uuid',"));
    }

    #[test]
    fn test_model_class_override() {
        let mut structure = CodeStructure::new("posts", "Post");
        let mut tags = ColumnStructure::new("tags", "", SqlType::BelongsToMany);
        tags.set_relation(RelationStructure::new("id", "tags"));
        tags.set_model_class(Some("\\App\\Models\\Blog\\Tag".to_string()));
        structure.add_column(tags);

        let model = render(&structure);
        assert!(model.contains("return $this->belongsToMany(\\App\\Models\\Blog\\Tag::class);"));
        assert!(!model.contains("'tags',"));
    }
}
