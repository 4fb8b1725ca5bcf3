//! Error type shared by every stage of the scaffolding pipeline.

use std::path::PathBuf;

/// Result alias used throughout the SDK.
pub type BuilderResult<T> = Result<T, BuilderError>;

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("For column '{column}' the wrong type '{ty}' is set.")]
    WrongColumnType { column: String, ty: String },

    #[error("unknown column type '{0}'")]
    UnknownType(String),

    #[error("unknown SQL column type '{sql_type}' for column '{column}'")]
    UnknownSqlType { column: String, sql_type: String },

    #[error("field alias '{0}' does not match any MoonShine field")]
    UnknownFieldAlias(String),

    #[error("No resources array found.")]
    MissingResources,

    #[error("For column '{0}' in the relation parameter, you must specify 'foreign_key'.")]
    MissingForeignKey(String),

    #[error("invalid field specification '{spec}': {reason}")]
    InvalidFieldSpec { spec: String, reason: String },

    #[error("parse type '{0}' not found")]
    UnknownParseType(String),

    #[error("build type '{0}' not found")]
    UnknownBuildType(String),

    #[error("a target is required for parse type '{0}'")]
    MissingTarget(String),

    #[error("a schema dump is required for parse type '{0}'")]
    MissingSchema(String),

    #[error("File {0} not found")]
    FileNotFound(PathBuf),

    #[error("CodePath alias '{0}' not found")]
    CodePathNotFound(String),

    #[error("table '{0}' not found in schema dump")]
    TableNotFound(String),

    #[error("failed to parse model {path}: {reason}")]
    ModelParse { path: PathBuf, reason: String },

    #[error("invalid scanner pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid OpenAPI specification: {0}")]
    OpenApi(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse YAML {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize build file: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("stub error for '{stub}': {source}")]
    Template { stub: String, source: tera::Error },
}

impl BuilderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
