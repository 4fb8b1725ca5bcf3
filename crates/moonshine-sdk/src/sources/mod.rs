//! Input sources that produce code structures.
//!
//! Each source implements [`MakeStructures`]. [`make_source`] picks one from a
//! [`ParseType`] and a [`SourceRequest`] carrying everything the CLI collected.

pub mod console;
pub mod json;
pub mod model;
pub mod openapi;
pub mod schema;
pub mod table;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{BuilderError, BuilderResult};
use crate::structure::CodeStructureList;

pub use console::{ConsoleField, ConsoleSource};
pub use json::JsonSource;
pub use model::ModelSource;
pub use openapi::OpenApiSource;
pub use schema::SchemaDump;
pub use table::TableSource;

/// A source of entity descriptions.
pub trait MakeStructures {
    fn make_structures(&self) -> BuilderResult<CodeStructureList>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseType {
    Json,
    Table,
    Model,
    Console,
    OpenApi,
}

impl ParseType {
    pub fn all() -> &'static [ParseType] {
        &[
            Self::Json,
            Self::Table,
            Self::Model,
            Self::Console,
            Self::OpenApi,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Table => "table",
            Self::Model => "model",
            Self::Console => "console",
            Self::OpenApi => "openapi",
        }
    }

    /// Human label used when listing the types.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenApi => "openapi yaml (beta)",
            other => other.as_str(),
        }
    }

    /// Infer the type from a target file extension.
    pub fn from_target(target: &str) -> Option<Self> {
        let extension = Path::new(target).extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::OpenApi),
            _ => None,
        }
    }

    /// Extensions of build files this type reads from the builds directory.
    pub fn build_file_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["json"],
            Self::OpenApi => &["yaml", "yml"],
            _ => &[],
        }
    }
}

impl fmt::Display for ParseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|ty| ty.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| BuilderError::UnknownParseType(s.to_string()))
    }
}

/// Inputs collected for a single source.
#[derive(Debug, Clone, Default)]
pub struct SourceRequest {
    /// Build file, table name, model filter or entity name depending on the type.
    pub target: Option<String>,
    pub builds_dir: PathBuf,
    pub models_dir: PathBuf,
    pub schema: Option<PathBuf>,
    /// Console field specs (`column:type[:name[:relation_table]]`).
    pub fields: Vec<String>,
    pub has_many: Vec<String>,
    pub has_one: Vec<String>,
    pub belongs_to_many: Vec<String>,
    pub migration: bool,
    pub timestamps: bool,
    pub soft_deletes: bool,
}

impl SourceRequest {
    fn require_target(&self, parse_type: ParseType) -> BuilderResult<&str> {
        self.target
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BuilderError::MissingTarget(parse_type.to_string()))
    }

    fn load_schema(&self) -> BuilderResult<Option<SchemaDump>> {
        self.schema.as_deref().map(SchemaDump::from_path).transpose()
    }
}

/// Build the source selected by `parse_type`.
pub fn make_source(
    parse_type: ParseType,
    request: &SourceRequest,
) -> BuilderResult<Box<dyn MakeStructures>> {
    let source: Box<dyn MakeStructures> = match parse_type {
        ParseType::Json => {
            let target = request.require_target(parse_type)?;
            let path = resolve_build_file(&request.builds_dir, target)?;
            Box::new(JsonSource::from_path(&path)?)
        }
        ParseType::OpenApi => {
            let target = request.require_target(parse_type)?;
            let path = resolve_build_file(&request.builds_dir, target)?;
            Box::new(OpenApiSource::from_path(&path)?)
        }
        ParseType::Table => {
            let target = request.require_target(parse_type)?;
            let schema = request
                .load_schema()?
                .ok_or_else(|| BuilderError::MissingSchema(parse_type.to_string()))?;
            Box::new(
                TableSource::new(schema, target)
                    .with_has_many(request.has_many.clone())
                    .with_has_one(request.has_one.clone())
                    .with_belongs_to_many(request.belongs_to_many.clone()),
            )
        }
        ParseType::Model => Box::new(ModelSource::discover(
            &request.models_dir,
            request.target.as_deref(),
            request.load_schema()?,
        )?),
        ParseType::Console => {
            let target = request.require_target(parse_type)?;
            let fields = request
                .fields
                .iter()
                .map(|spec| spec.parse())
                .collect::<BuilderResult<Vec<ConsoleField>>>()?;
            Box::new(
                ConsoleSource::new(target, fields)
                    .with_migration(request.migration)
                    .with_timestamps(request.timestamps)
                    .with_soft_deletes(request.soft_deletes),
            )
        }
    };

    tracing::debug!(%parse_type, target = ?request.target, "Resolved structure source");
    Ok(source)
}

/// Resolve a build file against the builds directory, then as a plain path.
pub fn resolve_build_file(builds_dir: &Path, target: &str) -> BuilderResult<PathBuf> {
    let in_builds_dir = builds_dir.join(target);
    if in_builds_dir.is_file() {
        return Ok(in_builds_dir);
    }

    let direct = PathBuf::from(target);
    if direct.is_file() {
        return Ok(direct);
    }

    Err(BuilderError::FileNotFound(in_builds_dir))
}

/// File names in `dir` with one of `extensions`, sorted.
pub fn available_build_files(dir: &Path, extensions: &[&str]) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
        })
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_type_from_str() {
        assert_eq!("json".parse::<ParseType>().unwrap(), ParseType::Json);
        assert_eq!("OpenAPI".parse::<ParseType>().unwrap(), ParseType::OpenApi);
        let err = "mysql".parse::<ParseType>().unwrap_err();
        assert!(err.to_string().contains("mysql"));
    }

    #[test]
    fn test_parse_type_from_target() {
        assert_eq!(ParseType::from_target("project.json"), Some(ParseType::Json));
        assert_eq!(ParseType::from_target("api.yml"), Some(ParseType::OpenApi));
        assert_eq!(ParseType::from_target("tasks"), None);
    }

    #[test]
    fn test_resolve_build_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("todo.json"), "{}").unwrap();

        let path = resolve_build_file(dir.path(), "todo.json").unwrap();
        assert_eq!(path, dir.path().join("todo.json"));

        let err = resolve_build_file(dir.path(), "missing.json").unwrap_err();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_available_build_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        assert_eq!(available_build_files(dir.path(), &["json"]), ["a.json", "b.json"]);
        assert!(available_build_files(&dir.path().join("nope"), &["json"]).is_empty());
    }

    #[test]
    fn test_make_source_requires_target() {
        let request = SourceRequest::default();
        let err = make_source(ParseType::Console, &request).err().unwrap();
        assert!(matches!(err, BuilderError::MissingTarget(_)));
    }

    #[test]
    fn test_make_source_table_requires_schema() {
        let request = SourceRequest {
            target: Some("tasks".to_string()),
            ..Default::default()
        };
        let err = make_source(ParseType::Table, &request).err().unwrap();
        assert!(matches!(err, BuilderError::MissingSchema(_)));
    }

    #[test]
    fn test_make_source_console() {
        let request = SourceRequest {
            target: Some("ProductResource".to_string()),
            fields: vec!["id:id".to_string(), "title:string:Title".to_string()],
            ..Default::default()
        };
        let list = make_source(ParseType::Console, &request)
            .unwrap()
            .make_structures()
            .unwrap();
        assert_eq!(list.structures()[0].table(), "products");
        assert_eq!(list.structures()[0].columns().len(), 2);
    }
}
