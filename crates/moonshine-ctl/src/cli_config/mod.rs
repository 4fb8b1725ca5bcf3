//! CLI configuration: where the Laravel project, build files, models and
//! custom stubs live.

pub(crate) mod loader;

pub(crate) use loader::load_cli_config;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use loader::expand_path;

fn default_builds_dir() -> String {
    "builds".to_string()
}

fn default_models_dir() -> String {
    "app/Models".to_string()
}

/// Settings read from `.moonshine-builder.toml`.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct CliConfig {
    /// Laravel project root. Default: the working directory.
    pub project_root: Option<String>,

    /// Directory holding JSON and OpenAPI build files, relative to the project root.
    #[serde(default = "default_builds_dir")]
    pub builds_dir: String,

    /// Directory scanned for Eloquent models, relative to the project root.
    #[serde(default = "default_models_dir")]
    pub models_dir: String,

    /// Directory with stub overrides.
    pub stub_dir: Option<String>,

    /// Schema dump used by the `table` and `model` sources.
    pub schema: Option<String>,

    /// Build types generated by default (`model`, `migration`, `resource`, ...).
    #[serde(default)]
    pub builders: Vec<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            builds_dir: default_builds_dir(),
            models_dir: default_models_dir(),
            stub_dir: None,
            schema: None,
            builders: Vec::new(),
        }
    }
}

impl CliConfig {
    pub(crate) fn project_root(&self) -> PathBuf {
        self.project_root
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn builds_dir(&self) -> PathBuf {
        self.in_project(&self.builds_dir)
    }

    pub(crate) fn models_dir(&self) -> PathBuf {
        self.in_project(&self.models_dir)
    }

    pub(crate) fn stub_dir(&self) -> Option<PathBuf> {
        self.stub_dir.as_deref().map(|dir| self.in_project(dir))
    }

    pub(crate) fn schema(&self) -> Option<PathBuf> {
        self.schema.as_deref().map(|file| self.in_project(file))
    }

    /// Relative paths resolve against the project root.
    fn in_project(&self, path: &str) -> PathBuf {
        let expanded = expand_path(path);
        if expanded.is_absolute() {
            expanded
        } else {
            join(&self.project_root(), &expanded)
        }
    }
}

fn join(root: &Path, path: &Path) -> PathBuf {
    if root == Path::new(".") {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
