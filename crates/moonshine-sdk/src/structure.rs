//! Normalized code structure shared by every input source and builder.
//!
//! A [`CodeStructure`] describes one entity: its table, its ordered columns
//! and the generation options. Flags such as `is_timestamps` are derived from
//! the columns on demand so they stay correct after [`CodeStructure::replace_column`].

use heck::{ToLowerCamelCase, ToPascalCase};

use crate::error::{BuilderError, BuilderResult};
use crate::naming::{uc_first, NameStr};
use crate::sources::json::{BuildFile, FieldSpec, MigrationSpec, RelationSpec, ResourceSpec};
use crate::types::SqlType;

/// Columns Laravel manages itself.
pub const DATE_COLUMNS: [&str; 3] = ["created_at", "updated_at", "deleted_at"];

const FILE_FIELDS: [&str; 2] = ["File", "Image"];

#[derive(Debug, Clone, PartialEq)]
pub struct RelationStructure {
    foreign_column: String,
    model_relation_name: Option<String>,
    table: NameStr,
}

impl RelationStructure {
    pub fn new(foreign_column: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            foreign_column: foreign_column.into(),
            model_relation_name: None,
            table: NameStr::new(table.into()),
        }
    }

    /// Name of the relation method on the model, when known from the source.
    pub fn with_model_relation_name(mut self, name: impl Into<String>) -> Self {
        self.model_relation_name = Some(name.into());
        self
    }

    pub fn foreign_column(&self) -> &str {
        &self.foreign_column
    }

    pub fn model_relation_name(&self) -> Option<&str> {
        self.model_relation_name.as_deref()
    }

    pub fn table(&self) -> &NameStr {
        &self.table
    }

    /// Class name of the related model (`task_attachments` → `TaskAttachment`).
    pub fn model(&self) -> String {
        NameStr::new(self.table.camel()).uc_first_singular()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStructure {
    column: String,
    name: String,
    ty: SqlType,
    default: Option<String>,
    nullable: bool,
    required: bool,
    input_type: String,
    field_class: Option<String>,
    has_filter: bool,
    relation: Option<RelationStructure>,
    resource_class: Option<String>,
    relation_name: Option<String>,
    resource_methods: Vec<String>,
    migration_methods: Vec<String>,
    migration_options: Vec<String>,
    model_class: Option<String>,
    cast: Option<String>,
}

impl ColumnStructure {
    /// Create a column. An empty `name` defaults to the StudlyCase column name.
    pub fn new(column: impl Into<String>, name: impl Into<String>, ty: SqlType) -> Self {
        let column = column.into();
        let mut name = name.into();
        if name.is_empty() {
            name = column.to_pascal_case();
        }

        let input_type = match column.as_str() {
            "email" | "password" => column.clone(),
            _ => ty.input_type().to_string(),
        };

        Self {
            column,
            name,
            ty,
            default: None,
            nullable: false,
            required: false,
            input_type,
            field_class: None,
            has_filter: false,
            relation: None,
            resource_class: None,
            relation_name: None,
            resource_methods: Vec::new(),
            migration_methods: Vec::new(),
            migration_options: Vec::new(),
            model_class: None,
            cast: None,
        }
    }

    pub fn with_default(mut self, default: Option<String>) -> Self {
        self.default = default;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Copy of this column with another type, keeping every other attribute.
    pub fn retyped(&self, ty: SqlType) -> Self {
        let mut column = Self::new(self.column.clone(), self.name.clone(), ty)
            .with_default(self.default.clone())
            .nullable(self.nullable)
            .required(self.required);
        column.field_class = self.field_class.clone();
        column.has_filter = self.has_filter;
        column.relation = self.relation.clone();
        column.resource_class = self.resource_class.clone();
        column.relation_name = self.relation_name.clone();
        column.resource_methods = self.resource_methods.clone();
        column.migration_methods = self.migration_methods.clone();
        column.migration_options = self.migration_options.clone();
        column.model_class = self.model_class.clone();
        column.cast = self.cast.clone();
        column
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> SqlType {
        self.ty
    }

    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn input_type(&self) -> &str {
        &self.input_type
    }

    pub fn relation(&self) -> Option<&RelationStructure> {
        self.relation.as_ref()
    }

    pub fn set_relation(&mut self, relation: RelationStructure) {
        self.relation = Some(relation);
    }

    pub fn is_id(&self) -> bool {
        self.ty.is_id_type()
    }

    pub fn is_created_at(&self) -> bool {
        self.column == "created_at"
    }

    pub fn is_updated_at(&self) -> bool {
        self.column == "updated_at"
    }

    pub fn is_deleted_at(&self) -> bool {
        self.column == "deleted_at"
    }

    pub fn is_laravel_timestamp(&self) -> bool {
        self.is_created_at() || self.is_updated_at() || self.is_deleted_at()
    }

    pub fn is_file_type(&self) -> bool {
        self.field_class
            .as_deref()
            .is_some_and(|field| FILE_FIELDS.contains(&field))
    }

    pub fn has_multiple(&self) -> bool {
        self.resource_methods
            .iter()
            .any(|method| method == "multiple" || method.starts_with("multiple("))
    }

    /// Laravel validation rule for the column value.
    pub fn rules_type(&self) -> &str {
        if self.is_file_type() {
            return if self.has_multiple() { "array" } else { "file" };
        }

        match self.input_type.as_str() {
            "number" if self.ty.is_float() => "numeric",
            "number" => "int",
            "text" if matches!(self.ty, SqlType::Json | SqlType::Jsonb) => "array",
            "text" | "password" | "time" => "string",
            "checkbox" => "accepted",
            "date" | "datetime-local" => "date",
            other => other,
        }
    }

    /// PHP scalar type of the column value.
    pub fn php_type(&self) -> String {
        match self.ty {
            SqlType::HasMany | SqlType::BelongsToMany => return "array".to_string(),
            SqlType::HasOne => {
                let model = self
                    .relation
                    .as_ref()
                    .map(|relation| relation.table().uc_first_singular())
                    .unwrap_or_else(|| self.column.to_pascal_case());
                return format!("{model}DTO");
            }
            _ => {}
        }

        if matches!(self.input_type.as_str(), "text" | "email" | "password") {
            return "string".to_string();
        }
        if self.ty == SqlType::Boolean {
            return "bool".to_string();
        }
        if self.ty.is_float() {
            return "float".to_string();
        }
        if self.input_type == "number" {
            return "int".to_string();
        }

        self.input_type.clone()
    }

    /// Default value formatted as a PHP literal.
    pub fn default_in_stub(&self) -> Option<String> {
        let default = self.default.as_deref()?;
        let php_type = self.php_type();
        match php_type.as_str() {
            "string" => Some(format!("'{}'", default.trim_matches('\''))),
            "float" | "int" => Some(default.trim_matches('\'').to_string()),
            _ => Some(default.to_string()),
        }
    }

    pub fn field_class(&self) -> Option<&str> {
        self.field_class.as_deref()
    }

    /// Set the field alias. A multiple file field without a cast gets `json`.
    pub fn set_field_class(&mut self, field_class: Option<String>) {
        self.field_class = field_class;
        if self.cast.is_none() && self.is_file_type() && self.has_multiple() {
            self.cast = Some("json".to_string());
        }
    }

    pub fn resource_class(&self) -> Option<&str> {
        self.resource_class.as_deref()
    }

    pub fn set_resource_class(&mut self, resource_class: Option<String>) {
        self.resource_class = resource_class;
    }

    pub fn model_class(&self) -> Option<&str> {
        self.model_class.as_deref()
    }

    pub fn set_model_class(&mut self, model_class: Option<String>) {
        self.model_class = model_class;
    }

    pub fn relation_name(&self) -> Option<&str> {
        self.relation_name.as_deref()
    }

    pub fn set_relation_name(&mut self, relation_name: Option<String>) {
        self.relation_name = relation_name;
    }

    pub fn resource_methods(&self) -> &[String] {
        &self.resource_methods
    }

    pub fn set_resource_methods(&mut self, methods: Vec<String>) {
        self.resource_methods = methods;
    }

    pub fn migration_methods(&self) -> &[String] {
        &self.migration_methods
    }

    pub fn set_migration_methods(&mut self, methods: Vec<String>) {
        self.migration_methods = methods;
    }

    pub fn migration_options(&self) -> &[String] {
        &self.migration_options
    }

    pub fn set_migration_options(&mut self, options: Vec<String>) {
        self.migration_options = options;
    }

    pub fn cast(&self) -> Option<&str> {
        self.cast.as_deref()
    }

    pub fn set_cast(&mut self, cast: Option<String>) {
        self.cast = cast;
    }

    pub fn has_filter(&self) -> bool {
        self.has_filter
    }

    pub fn set_has_filter(&mut self, has_filter: bool) {
        self.has_filter = has_filter;
    }

    /// Name of the relation method on the model.
    ///
    /// An explicit override wins, then the name reported by the source, then
    /// a name derived from the related table (`BelongsTo`/`HasOne`) or from
    /// the column (`HasMany`/`BelongsToMany`).
    pub fn model_relation_name(&self) -> String {
        if let Some(name) = self.relation_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        let Some(relation) = &self.relation else {
            return self.column.to_lower_camel_case();
        };

        if let Some(name) = relation.model_relation_name() {
            return name.to_string();
        }

        match self.ty {
            SqlType::BelongsTo | SqlType::HasOne => {
                NameStr::new(relation.table().camel()).singular()
            }
            _ => self.column.to_lower_camel_case(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeStructure {
    table: String,
    entity: NameStr,
    columns: Vec<ColumnStructure>,
    with_model: Option<bool>,
    with_migration: Option<bool>,
    with_resource: Option<bool>,
    menu_name: Option<String>,
    column_name: Option<String>,
}

impl CodeStructure {
    pub fn new(table: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            entity: NameStr::new(entity.into()),
            columns: Vec::new(),
            with_model: None,
            with_migration: None,
            with_resource: None,
            menu_name: None,
            column_name: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn entity(&self) -> &NameStr {
        &self.entity
    }

    pub fn columns(&self) -> &[ColumnStructure] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut [ColumnStructure] {
        &mut self.columns
    }

    pub fn add_column(&mut self, column: ColumnStructure) {
        self.columns.push(column);
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStructure> {
        self.columns.iter().find(|c| c.column() == name)
    }

    /// Swap the column named `name` for `column`, keeping its position.
    ///
    /// Returns `false` when no such column exists.
    pub fn replace_column(&mut self, name: &str, column: ColumnStructure) -> bool {
        match self.columns.iter_mut().find(|c| c.column() == name) {
            Some(slot) => {
                *slot = column;
                true
            }
            None => false,
        }
    }

    pub fn is_timestamps(&self) -> bool {
        self.columns.iter().any(ColumnStructure::is_created_at)
            && self.columns.iter().any(ColumnStructure::is_updated_at)
    }

    pub fn is_soft_deletes(&self) -> bool {
        self.columns.iter().any(ColumnStructure::is_deleted_at)
    }

    fn has_type(&self, ty: SqlType) -> bool {
        self.columns.iter().any(|c| c.ty() == ty)
    }

    pub fn has_belongs_to(&self) -> bool {
        self.has_type(SqlType::BelongsTo)
    }

    pub fn has_has_many(&self) -> bool {
        self.has_type(SqlType::HasMany)
    }

    pub fn has_has_one(&self) -> bool {
        self.has_type(SqlType::HasOne)
    }

    pub fn has_belongs_to_many(&self) -> bool {
        self.has_type(SqlType::BelongsToMany)
    }

    pub fn with_model(&self) -> bool {
        self.with_model.unwrap_or(true)
    }

    pub fn set_with_model(&mut self, value: bool) {
        self.with_model = Some(value);
    }

    pub fn with_migration(&self) -> bool {
        self.with_migration.unwrap_or(true)
    }

    pub fn set_with_migration(&mut self, value: bool) {
        self.with_migration = Some(value);
    }

    pub fn with_resource(&self) -> bool {
        self.with_resource.unwrap_or(true)
    }

    pub fn set_with_resource(&mut self, value: bool) {
        self.with_resource = Some(value);
    }

    pub fn menu_name(&self) -> Option<&str> {
        self.menu_name.as_deref()
    }

    pub fn set_menu_name(&mut self, menu_name: Option<String>) {
        self.menu_name = menu_name;
    }

    /// Column used as the resource title.
    pub fn column_name(&self) -> Option<&str> {
        self.column_name.as_deref()
    }

    pub fn set_column_name(&mut self, column_name: Option<String>) {
        self.column_name = column_name;
    }

    fn to_resource_spec(&self, is_pivot: bool) -> ResourceSpec {
        let timestamps = self.is_timestamps();
        let soft_deletes = self.is_soft_deletes();

        let fields = self
            .columns
            .iter()
            .filter(|c| !(timestamps && (c.is_created_at() || c.is_updated_at())))
            .filter(|c| !(soft_deletes && c.is_deleted_at()))
            .map(field_spec)
            .collect();

        ResourceSpec {
            name: self.entity.uc_first_singular(),
            table: Some(self.table.clone()),
            column: self.column_name.clone(),
            menu_name: self.menu_name.clone(),
            with_model: self.with_model,
            with_migration: self.with_migration,
            with_resource: if is_pivot {
                Some(false)
            } else {
                self.with_resource
            },
            timestamps: timestamps.then_some(true),
            soft_deletes: soft_deletes.then_some(true),
            fields,
        }
    }
}

fn field_spec(column: &ColumnStructure) -> FieldSpec {
    let relation = column.relation().map(|relation| RelationSpec {
        table: relation.table().raw().to_string(),
        foreign_key: Some(relation.foreign_column().to_string()),
        relation_name: Some(column.model_relation_name()),
    });

    let default = column
        .default()
        .filter(|d| !d.is_empty() && !column.is_id() && !column.ty().is_many_relation())
        .map(|d| serde_json::Value::String(d.to_string()));

    let migration = (!column.migration_options().is_empty()).then(|| MigrationSpec {
        options: column.migration_options().to_vec(),
        methods: Vec::new(),
    });

    FieldSpec {
        column: column.column().to_string(),
        ty: column.ty().to_string(),
        name: Some(column.name().to_string()),
        default,
        nullable: column.is_nullable().then_some(true),
        required: column.is_required().then_some(true),
        has_filter: column.has_filter().then_some(true),
        relation,
        migration,
        methods: column.resource_methods().to_vec(),
        field: column.field_class().map(str::to_string),
        resource_class: column.resource_class().map(str::to_string),
        model_class: column.model_class().map(str::to_string),
        cast: column.cast().map(str::to_string),
    }
}

/// Ordered set of structures produced by one source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeStructureList {
    structures: Vec<CodeStructure>,
}

impl CodeStructureList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, structure: CodeStructure) {
        self.structures.push(structure);
    }

    pub fn structures(&self) -> &[CodeStructure] {
        &self.structures
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodeStructure> {
        self.structures.iter()
    }

    /// Export the list as a JSON build file.
    ///
    /// Structures whose table is listed in `pivot_tables` are written with
    /// `withResource: false`.
    pub fn to_json(&self, pivot_tables: &[String]) -> BuilderResult<String> {
        let file = BuildFile {
            resources: Some(
                self.structures
                    .iter()
                    .map(|s| s.to_resource_spec(pivot_tables.iter().any(|p| p == s.table())))
                    .collect(),
            ),
        };

        serde_json::to_string_pretty(&file).map_err(BuilderError::Serialize)
    }
}

impl IntoIterator for CodeStructureList {
    type Item = CodeStructure;
    type IntoIter = std::vec::IntoIter<CodeStructure>;

    fn into_iter(self) -> Self::IntoIter {
        self.structures.into_iter()
    }
}

impl<'a> IntoIterator for &'a CodeStructureList {
    type Item = &'a CodeStructure;
    type IntoIter = std::slice::Iter<'a, CodeStructure>;

    fn into_iter(self) -> Self::IntoIter {
        self.structures.iter()
    }
}

impl FromIterator<CodeStructure> for CodeStructureList {
    fn from_iter<T: IntoIterator<Item = CodeStructure>>(iter: T) -> Self {
        Self {
            structures: iter.into_iter().collect(),
        }
    }
}

/// Resource title: the menu name, or the entity with its first letter uppercased.
pub fn resource_title(structure: &CodeStructure) -> String {
    structure
        .menu_name()
        .map(str::to_string)
        .unwrap_or_else(|| uc_first(structure.entity().raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks() -> CodeStructure {
        let mut structure = CodeStructure::new("tasks", "Task");
        structure.add_column(ColumnStructure::new("id", "", SqlType::Id));
        structure.add_column(ColumnStructure::new("title", "Title", SqlType::String));
        structure.add_column(ColumnStructure::new("created_at", "", SqlType::Timestamp).nullable(true));
        structure.add_column(ColumnStructure::new("updated_at", "", SqlType::Timestamp).nullable(true));
        structure
    }

    #[test]
    fn test_column_defaults() {
        let column = ColumnStructure::new("first_name", "", SqlType::String);
        assert_eq!(column.name(), "FirstName");
        assert_eq!(column.input_type(), "text");
        assert_eq!(column.rules_type(), "string");
        assert_eq!(column.php_type(), "string");
        assert!(!column.is_nullable());
    }

    #[test]
    fn test_email_and_password_override_input_type() {
        let email = ColumnStructure::new("email", "", SqlType::String);
        assert_eq!(email.input_type(), "email");
        assert_eq!(email.rules_type(), "email");

        let password = ColumnStructure::new("password", "", SqlType::String);
        assert_eq!(password.input_type(), "password");
        assert_eq!(password.rules_type(), "string");
        assert_eq!(password.php_type(), "string");
    }

    #[test]
    fn test_rules_type() {
        assert_eq!(ColumnStructure::new("age", "", SqlType::Integer).rules_type(), "int");
        assert_eq!(ColumnStructure::new("price", "", SqlType::Decimal).rules_type(), "numeric");
        assert_eq!(ColumnStructure::new("active", "", SqlType::Boolean).rules_type(), "accepted");
        assert_eq!(ColumnStructure::new("born", "", SqlType::Date).rules_type(), "date");
        assert_eq!(ColumnStructure::new("meta", "", SqlType::Json).rules_type(), "array");
    }

    #[test]
    fn test_rules_type_is_a_laravel_rule_for_every_input() {
        let published = ColumnStructure::new("published_at", "", SqlType::DateTime);
        assert_eq!(published.input_type(), "datetime-local");
        assert_eq!(published.rules_type(), "date");

        let starts = ColumnStructure::new("starts", "", SqlType::Time);
        assert_eq!(starts.input_type(), "time");
        assert_eq!(starts.rules_type(), "string");

        assert_eq!(ColumnStructure::new("ratio", "", SqlType::Float).rules_type(), "numeric");
        assert_eq!(ColumnStructure::new("email", "", SqlType::String).rules_type(), "email");
        assert_eq!(ColumnStructure::new("password", "", SqlType::String).rules_type(), "string");
    }

    #[test]
    fn test_file_field_with_multiple_gets_json_cast() {
        let mut column = ColumnStructure::new("attachment", "Файл", SqlType::String);
        column.set_resource_methods(vec!["multiple()".to_string()]);
        column.set_field_class(Some("File".to_string()));

        assert!(column.is_file_type());
        assert!(column.has_multiple());
        assert_eq!(column.cast(), Some("json"));
        assert_eq!(column.rules_type(), "array");
    }

    #[test]
    fn test_explicit_cast_is_kept_for_file_field() {
        let mut column = ColumnStructure::new("images", "", SqlType::Json);
        column.set_cast(Some("array".to_string()));
        column.set_resource_methods(vec!["multiple()".to_string()]);
        column.set_field_class(Some("Image".to_string()));
        assert_eq!(column.cast(), Some("array"));
    }

    #[test]
    fn test_single_file_field() {
        let mut column = ColumnStructure::new("avatar", "", SqlType::String);
        column.set_field_class(Some("Image".to_string()));
        assert_eq!(column.rules_type(), "file");
        assert_eq!(column.cast(), None);
    }

    #[test]
    fn test_default_in_stub() {
        let text = ColumnStructure::new("status", "", SqlType::String)
            .with_default(Some("new".to_string()));
        assert_eq!(text.default_in_stub().as_deref(), Some("'new'"));

        let number = ColumnStructure::new("sort", "", SqlType::Integer)
            .with_default(Some("'5'".to_string()));
        assert_eq!(number.default_in_stub().as_deref(), Some("5"));

        let flag = ColumnStructure::new("active", "", SqlType::Boolean)
            .with_default(Some("true".to_string()));
        assert_eq!(flag.default_in_stub().as_deref(), Some("true"));
    }

    #[test]
    fn test_model_relation_name() {
        let mut belongs_to = ColumnStructure::new("task_id", "Task", SqlType::BelongsTo);
        belongs_to.set_relation(RelationStructure::new("id", "tasks"));
        assert_eq!(belongs_to.model_relation_name(), "task");

        let mut has_many = ColumnStructure::new("task_attachments", "", SqlType::HasMany);
        has_many.set_relation(RelationStructure::new("task_id", "task_attachments"));
        assert_eq!(has_many.model_relation_name(), "taskAttachments");

        let mut has_one = ColumnStructure::new("profile", "", SqlType::HasOne);
        has_one.set_relation(RelationStructure::new("user_id", "user_profiles"));
        assert_eq!(has_one.model_relation_name(), "userProfile");

        let mut named = ColumnStructure::new("role_id", "", SqlType::BelongsTo);
        named.set_relation(RelationStructure::new("id", "roles").with_model_relation_name("owner"));
        assert_eq!(named.model_relation_name(), "owner");

        named.set_relation_name(Some("author".to_string()));
        assert_eq!(named.model_relation_name(), "author");
    }

    #[test]
    fn test_relation_model() {
        assert_eq!(RelationStructure::new("id", "task_attachments").model(), "TaskAttachment");
        assert_eq!(RelationStructure::new("id", "categories").model(), "Category");
    }

    #[test]
    fn test_structure_flags() {
        let mut structure = tasks();
        assert!(structure.is_timestamps());
        assert!(!structure.is_soft_deletes());
        assert!(!structure.has_belongs_to());
        assert!(structure.with_model());
        assert!(structure.with_migration());

        structure.set_with_migration(false);
        assert!(!structure.with_migration());

        let mut author = ColumnStructure::new("title", "", SqlType::BelongsTo);
        author.set_relation(RelationStructure::new("id", "authors"));
        assert!(structure.replace_column("title", author));
        assert!(structure.has_belongs_to());
        assert_eq!(structure.columns()[1].ty(), SqlType::BelongsTo);
        assert!(!structure.replace_column("missing", ColumnStructure::new("x", "", SqlType::Text)));
    }

    #[test]
    fn test_retyped_keeps_attributes() {
        let mut column = ColumnStructure::new("role_id", "Role", SqlType::UnsignedBigInteger)
            .nullable(true);
        column.set_cast(Some("int".to_string()));
        let retyped = column.retyped(SqlType::BelongsTo);
        assert_eq!(retyped.ty(), SqlType::BelongsTo);
        assert!(retyped.is_nullable());
        assert_eq!(retyped.cast(), Some("int"));
        assert_eq!(retyped.name(), "Role");
    }

    #[test]
    fn test_resource_title() {
        let mut structure = tasks();
        assert_eq!(resource_title(&structure), "Task");
        structure.set_menu_name(Some("Задачи".to_string()));
        assert_eq!(resource_title(&structure), "Задачи");
    }

    #[test]
    fn test_to_json_exports_build_file() {
        let mut list = CodeStructureList::new();
        list.push(tasks());
        list.push(CodeStructure::new("task_tag", "TaskTag"));

        let json = list.to_json(&["task_tag".to_string()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let resources = value["resources"].as_array().unwrap();

        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0]["name"], "Task");
        assert_eq!(resources[0]["timestamps"], true);
        let fields = resources[0]["fields"].as_array().unwrap();
        assert_eq!(fields.len(), 2, "timestamps are folded into the flag");
        assert_eq!(fields[0]["type"], "id");
        assert!(resources[0].get("withResource").is_none());
        assert_eq!(resources[1]["withResource"], false);
    }
}
