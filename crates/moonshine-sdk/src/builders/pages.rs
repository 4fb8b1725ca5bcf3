use tera::Context;

use super::fields::{list_fragment, MoonShineStructure};
use super::{Builder, RenderedFile};
use crate::code_path::{BuildType, CodePath};
use crate::error::BuilderResult;
use crate::stubs::StubRenderer;
use crate::structure::CodeStructure;

/// Renders one of the three CRUD pages.
#[derive(Debug, Clone, Copy)]
pub struct PageBuilder {
    page: BuildType,
}

impl PageBuilder {
    pub fn index() -> Self {
        Self {
            page: BuildType::IndexPage,
        }
    }

    pub fn form() -> Self {
        Self {
            page: BuildType::FormPage,
        }
    }

    pub fn detail() -> Self {
        Self {
            page: BuildType::DetailPage,
        }
    }

    fn suffix(&self) -> &'static str {
        match self.page {
            BuildType::FormPage => "FormPage",
            BuildType::DetailPage => "DetailPage",
            _ => "IndexPage",
        }
    }
}

impl Builder for PageBuilder {
    fn build_type(&self) -> BuildType {
        self.page
    }

    fn build(
        &self,
        structure: &CodeStructure,
        paths: &CodePath,
        stubs: &StubRenderer,
    ) -> BuilderResult<RenderedFile> {
        let page = paths.path(self.page)?;
        let resource = paths.path(BuildType::Resource)?;
        let moonshine = MoonShineStructure::new(structure);
        let class = page.raw_name();

        let mut context = Context::new();
        context.insert("namespace", page.namespace());
        context.insert("resource_namespace", resource.namespace());
        context.insert("class", class);
        context.insert("name", class.strip_suffix(self.suffix()).unwrap_or(class));
        context.insert("field_uses", &moonshine.uses_for_fields()?.join("\n"));
        context.insert("fields", &list_fragment(&moonshine.fields(false)?));

        match self.page {
            BuildType::IndexPage => {
                context.insert("filters", &list_fragment(&moonshine.fields(true)?));
            }
            BuildType::FormPage => {
                context.insert("rules", &list_fragment(&moonshine.rules()));
            }
            _ => {}
        }

        let content = stubs.render(self.page.stub(), &context)?;
        Ok(RenderedFile::new(page.file(), content))
    }
}
