//! Where each generated file goes and which namespace it declares.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};

use crate::error::{BuilderError, BuilderResult};
use crate::structure::CodeStructure;
use crate::stubs::Stub;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuildType {
    Model,
    Migration,
    Resource,
    IndexPage,
    FormPage,
    DetailPage,
}

impl BuildType {
    pub fn all() -> &'static [BuildType] {
        &[
            Self::Model,
            Self::Migration,
            Self::Resource,
            Self::IndexPage,
            Self::FormPage,
            Self::DetailPage,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Migration => "migration",
            Self::Resource => "resource",
            Self::IndexPage => "index-page",
            Self::FormPage => "form-page",
            Self::DetailPage => "detail-page",
        }
    }

    /// Stub rendered for this type.
    pub fn stub(&self) -> Stub {
        match self {
            Self::Model => Stub::Model,
            Self::Migration => Stub::Migration,
            Self::Resource => Stub::ModelResourceDefault,
            Self::IndexPage => Stub::IndexPage,
            Self::FormPage => Stub::FormPage,
            Self::DetailPage => Stub::DetailPage,
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|ty| ty.as_str() == s)
            .copied()
            .ok_or_else(|| BuilderError::UnknownBuildType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodePathItem {
    name: String,
    dir: PathBuf,
    namespace: String,
}

impl CodePathItem {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            namespace: namespace.into(),
        }
    }

    /// File name with extension (`TaskResource.php`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without extension, which is also the class name.
    pub fn raw_name(&self) -> &str {
        self.name.strip_suffix(".php").unwrap_or(&self.name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn file(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// Output locations for one structure.
#[derive(Debug, Clone, Default)]
pub struct CodePath {
    paths: BTreeMap<BuildType, CodePathItem>,
}

impl CodePath {
    /// Lay out every build type under `base`.
    ///
    /// The migration timestamp is `now + iteration` seconds so structures
    /// generated in one run get distinct, ordered migrations.
    pub fn init(structure: &CodeStructure, base: &Path, iteration: u32, now: NaiveDateTime) -> Self {
        let name = structure.entity().uc_first_singular();
        let app = base.join("app");
        let resource_dir = app.join("MoonShine").join("Resources").join(&name);
        let resource_namespace = format!("App\\MoonShine\\Resources\\{name}");
        let pages_dir = resource_dir.join("Pages");
        let pages_namespace = format!("{resource_namespace}\\Pages");

        let time = now + Duration::seconds(i64::from(iteration));
        let migration = format!(
            "{}_create_{}.php",
            time.format("%Y_%m_%d_%H%M%S"),
            structure.table()
        );

        let mut code_path = Self::default();
        code_path
            .set_path(
                BuildType::Model,
                CodePathItem::new(format!("{name}.php"), app.join("Models"), "App\\Models"),
            )
            .set_path(
                BuildType::Resource,
                CodePathItem::new(format!("{name}Resource.php"), &resource_dir, resource_namespace),
            )
            .set_path(
                BuildType::IndexPage,
                CodePathItem::new(format!("{name}IndexPage.php"), &pages_dir, pages_namespace.clone()),
            )
            .set_path(
                BuildType::FormPage,
                CodePathItem::new(format!("{name}FormPage.php"), &pages_dir, pages_namespace.clone()),
            )
            .set_path(
                BuildType::DetailPage,
                CodePathItem::new(format!("{name}DetailPage.php"), &pages_dir, pages_namespace),
            )
            .set_path(
                BuildType::Migration,
                CodePathItem::new(migration, base.join("database").join("migrations"), ""),
            );
        code_path
    }

    /// Register a path; the first registration for a type wins.
    pub fn set_path(&mut self, build_type: BuildType, item: CodePathItem) -> &mut Self {
        self.paths.entry(build_type).or_insert(item);
        self
    }

    pub fn path(&self, build_type: BuildType) -> BuilderResult<&CodePathItem> {
        self.paths
            .get(&build_type)
            .ok_or_else(|| BuilderError::CodePathNotFound(build_type.to_string()))
    }

    /// Look a path up by its alias (`index-page`).
    pub fn path_by_alias(&self, alias: &str) -> BuilderResult<&CodePathItem> {
        let build_type = alias
            .parse::<BuildType>()
            .map_err(|_| BuilderError::CodePathNotFound(alias.to_string()))?;
        self.path(build_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 59)
            .unwrap()
    }

    #[test]
    fn test_build_type_round_trip_names() {
        assert_eq!("index-page".parse::<BuildType>().unwrap(), BuildType::IndexPage);
        assert_eq!(BuildType::Resource.stub(), Stub::ModelResourceDefault);
        assert_eq!(BuildType::all().len(), 6);
        assert!("controller".parse::<BuildType>().is_err());
    }

    #[test]
    fn test_init_paths() {
        let structure = CodeStructure::new("task_attachments", "TaskAttachment");
        let paths = CodePath::init(&structure, Path::new("/project"), 0, now());

        let model = paths.path(BuildType::Model).unwrap();
        assert_eq!(model.file(), Path::new("/project/app/Models/TaskAttachment.php"));
        assert_eq!(model.namespace(), "App\\Models");
        assert_eq!(model.raw_name(), "TaskAttachment");

        let resource = paths.path(BuildType::Resource).unwrap();
        assert_eq!(
            resource.file(),
            Path::new("/project/app/MoonShine/Resources/TaskAttachment/TaskAttachmentResource.php")
        );
        assert_eq!(resource.namespace(), "App\\MoonShine\\Resources\\TaskAttachment");

        let form = paths.path_by_alias("form-page").unwrap();
        assert_eq!(form.raw_name(), "TaskAttachmentFormPage");
        assert_eq!(form.namespace(), "App\\MoonShine\\Resources\\TaskAttachment\\Pages");
    }

    #[test]
    fn test_migration_name_uses_iteration_offset() {
        let structure = CodeStructure::new("tasks", "Task");
        let first = CodePath::init(&structure, Path::new("/p"), 0, now());
        let second = CodePath::init(&structure, Path::new("/p"), 1, now());

        assert_eq!(
            first.path(BuildType::Migration).unwrap().name(),
            "2024_05_01_120059_create_tasks.php"
        );
        assert_eq!(
            second.path(BuildType::Migration).unwrap().name(),
            "2024_05_01_120100_create_tasks.php"
        );
    }

    #[test]
    fn test_unknown_alias() {
        let paths = CodePath::default();
        let err = paths.path_by_alias("controller").unwrap_err();
        assert_eq!(err.to_string(), "CodePath alias 'controller' not found");
        assert!(paths.path(BuildType::Model).is_err());
    }
}
