//! One builder per [`BuildType`], each rendering a single file.
//!
//! Builders compute the text fragments a stub needs (imports, field lists,
//! migration lines) and hand them to the [`StubRenderer`]. Fragments whose
//! condition is false render as empty strings so stubs stay free of logic.

pub mod fields;
mod migration;
mod model;
mod pages;
mod resource;

use std::fmt;
use std::path::PathBuf;

use crate::code_path::{BuildType, CodePath};
use crate::error::BuilderResult;
use crate::stubs::StubRenderer;
use crate::structure::CodeStructure;

pub use fields::MoonShineStructure;
pub use migration::MigrationBuilder;
pub use model::ModelBuilder;
pub use pages::PageBuilder;
pub use resource::ResourceBuilder;

/// A rendered output file ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Absolute output path.
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

pub trait Builder: fmt::Debug {
    fn build_type(&self) -> BuildType;

    fn build(
        &self,
        structure: &CodeStructure,
        paths: &CodePath,
        stubs: &StubRenderer,
    ) -> BuilderResult<RenderedFile>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFactory;

impl BuildFactory {
    pub fn builder(build_type: BuildType) -> Box<dyn Builder> {
        match build_type {
            BuildType::Model => Box::new(ModelBuilder),
            BuildType::Migration => Box::new(MigrationBuilder),
            BuildType::Resource => Box::new(ResourceBuilder),
            BuildType::IndexPage => Box::new(PageBuilder::index()),
            BuildType::FormPage => Box::new(PageBuilder::form()),
            BuildType::DetailPage => Box::new(PageBuilder::detail()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_covers_every_build_type() {
        for build_type in BuildType::all() {
            assert_eq!(BuildFactory::builder(*build_type).build_type(), *build_type);
        }
    }
}
