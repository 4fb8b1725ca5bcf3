use tera::Context;

use super::fields::MoonShineStructure;
use super::{Builder, RenderedFile};
use crate::code_path::{BuildType, CodePath};
use crate::error::BuilderResult;
use crate::stubs::{Stub, StubRenderer};
use crate::structure::{resource_title, CodeStructure};

/// Renders the `ModelResource` class.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceBuilder;

impl Builder for ResourceBuilder {
    fn build_type(&self) -> BuildType {
        BuildType::Resource
    }

    fn build(
        &self,
        structure: &CodeStructure,
        paths: &CodePath,
        stubs: &StubRenderer,
    ) -> BuilderResult<RenderedFile> {
        let resource = paths.path(BuildType::Resource)?;
        let model = paths.path(BuildType::Model)?;
        let class = resource.raw_name();

        let with: Vec<String> = MoonShineStructure::new(structure)
            .with_property()
            .iter()
            .map(|relation| format!("'{relation}'"))
            .collect();

        let column = structure
            .column_name()
            .map(|name| format!("\n\n    protected string $column = '{name}';"))
            .unwrap_or_default();
        let with_array = if with.is_empty() {
            String::new()
        } else {
            format!("\n\n    protected array $with = [{}];", with.join(", "))
        };

        let mut context = Context::new();
        context.insert("namespace", resource.namespace());
        context.insert(
            "model_use",
            &format!("use {}\\{};", model.namespace(), model.raw_name()),
        );
        context.insert("class", class);
        context.insert("model", model.raw_name());
        context.insert("name", class.strip_suffix("Resource").unwrap_or(class));
        context.insert("resource_title", &resource_title(structure).replace('\'', "\\'"));
        context.insert("column", &column);
        context.insert("with_array", &with_array);

        let content = stubs.render(Stub::ModelResourceDefault, &context)?;
        Ok(RenderedFile::new(resource.file(), content))
    }
}
