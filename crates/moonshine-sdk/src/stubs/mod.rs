//! Stub rendering.
//!
//! The default stubs are compiled into the crate. A stub directory may
//! override any of them by file name (`ModelResourceDefault.php.tera`);
//! stubs it does not provide fall back to the embedded ones.

mod filters;
mod loader;

use std::fmt;
use std::path::Path;

use tera::{Context, Tera};

use crate::error::{BuilderError, BuilderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stub {
    Model,
    Migration,
    ModelResourceDefault,
    IndexPage,
    FormPage,
    DetailPage,
    BelongsTo,
    HasMany,
    HasOne,
    BelongsToMany,
    MenuItem,
}

impl Stub {
    pub fn all() -> &'static [Stub] {
        &[
            Self::Model,
            Self::Migration,
            Self::ModelResourceDefault,
            Self::IndexPage,
            Self::FormPage,
            Self::DetailPage,
            Self::BelongsTo,
            Self::HasMany,
            Self::HasOne,
            Self::BelongsToMany,
            Self::MenuItem,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Model => "Model",
            Self::Migration => "Migration",
            Self::ModelResourceDefault => "ModelResourceDefault",
            Self::IndexPage => "IndexPage",
            Self::FormPage => "FormPage",
            Self::DetailPage => "DetailPage",
            Self::BelongsTo => "BelongsTo",
            Self::HasMany => "HasMany",
            Self::HasOne => "HasOne",
            Self::BelongsToMany => "BelongsToMany",
            Self::MenuItem => "MenuItem",
        }
    }

    /// Template name inside the renderer, also the override file name.
    pub fn file_name(&self) -> String {
        format!("{}.php.tera", self.name())
    }

    /// Embedded default source.
    fn source(&self) -> &'static str {
        match self {
            Self::Model => include_str!("../../stubs/Model.php.tera"),
            Self::Migration => include_str!("../../stubs/Migration.php.tera"),
            Self::ModelResourceDefault => include_str!("../../stubs/ModelResourceDefault.php.tera"),
            Self::IndexPage => include_str!("../../stubs/IndexPage.php.tera"),
            Self::FormPage => include_str!("../../stubs/FormPage.php.tera"),
            Self::DetailPage => include_str!("../../stubs/DetailPage.php.tera"),
            Self::BelongsTo => include_str!("../../stubs/BelongsTo.php.tera"),
            Self::HasMany => include_str!("../../stubs/HasMany.php.tera"),
            Self::HasOne => include_str!("../../stubs/HasOne.php.tera"),
            Self::BelongsToMany => include_str!("../../stubs/BelongsToMany.php.tera"),
            Self::MenuItem => include_str!("../../stubs/MenuItem.php.tera"),
        }
    }
}

impl fmt::Display for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders stubs with the filters registered.
#[derive(Debug, Clone)]
pub struct StubRenderer {
    tera: Tera,
}

impl StubRenderer {
    /// Renderer over the embedded stubs only.
    pub fn embedded() -> BuilderResult<Self> {
        let mut tera = Tera::default();
        let templates: Vec<(String, &str)> = Stub::all()
            .iter()
            .map(|stub| (stub.file_name(), stub.source()))
            .collect();
        tera.add_raw_templates(templates)
            .map_err(|e| BuilderError::Template {
                stub: "embedded".to_string(),
                source: e,
            })?;

        Ok(Self::with_filters(tera))
    }

    /// Renderer where stubs found in `stub_dir` replace the embedded ones.
    pub fn with_overrides(stub_dir: Option<&Path>) -> BuilderResult<Self> {
        let embedded = Self::embedded()?;
        let Some(dir) = stub_dir else {
            return Ok(embedded);
        };

        let mut tera = loader::load_stubs_from_dir(dir)?;
        let overridden: Vec<String> = tera.get_template_names().map(str::to_string).collect();
        // extend() keeps templates already present, so user stubs win.
        tera.extend(&embedded.tera).map_err(|e| BuilderError::Template {
            stub: dir.display().to_string(),
            source: e,
        })?;

        tracing::debug!(?dir, ?overridden, "Loaded stub overrides");
        Ok(Self::with_filters(tera))
    }

    fn with_filters(mut tera: Tera) -> Self {
        tera.register_filter("snake_case", filters::snake_case);
        tera.register_filter("pascal_case", filters::pascal_case);
        tera.register_filter("camel_case", filters::camel_case);
        tera.register_filter("kebab_case", filters::kebab_case);
        tera.register_filter("plural", filters::plural);
        tera.register_filter("singular", filters::singular);
        Self { tera }
    }

    pub fn render(&self, stub: Stub, context: &Context) -> BuilderResult<String> {
        self.tera
            .render(&stub.file_name(), context)
            .map_err(|e| BuilderError::Template {
                stub: stub.name().to_string(),
                source: e,
            })
    }
}
