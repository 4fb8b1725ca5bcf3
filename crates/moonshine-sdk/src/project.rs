//! A full generation run over a list of structures.
//!
//! For every structure the run lays out code paths, picks the builders its
//! flags allow, asks before replacing files and writes the rendered output.
//! Registration hints for the MoonShine service provider and menu are
//! collected into the [`BuildReport`].

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tera::Context;

use crate::builders::BuildFactory;
use crate::code_path::{BuildType, CodePath};
use crate::error::{BuilderError, BuilderResult};
use crate::structure::{resource_title, CodeStructure, CodeStructureList};
use crate::stubs::{Stub, StubRenderer};

const GENERATION_GITIGNORE: &str = "*\n!.gitignore\n";

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Laravel project root files are written under.
    pub project_root: PathBuf,
    /// Write into this directory instead of the project root.
    pub generation_dir: Option<PathBuf>,
    pub build_types: Vec<BuildType>,
    pub stub_dir: Option<PathBuf>,
    /// Base time for migration file names.
    pub now: NaiveDateTime,
}

impl BuildOptions {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            generation_dir: None,
            build_types: BuildType::all().to_vec(),
            stub_dir: None,
            now: Local::now().naive_local(),
        }
    }

    pub fn with_generation_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.generation_dir = dir;
        self
    }

    /// Restrict the run to these types. An empty list keeps all of them.
    pub fn with_build_types(mut self, build_types: Vec<BuildType>) -> Self {
        if !build_types.is_empty() {
            self.build_types = build_types;
        }
        self
    }

    pub fn with_stub_dir(mut self, stub_dir: Option<PathBuf>) -> Self {
        self.stub_dir = stub_dir;
        self
    }

    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    fn base_dir(&self) -> &Path {
        self.generation_dir.as_deref().unwrap_or(&self.project_root)
    }
}

/// Asked before an existing file is replaced.
pub trait OverwritePrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOverwrite;

impl OverwritePrompt for AlwaysOverwrite {
    fn confirm_overwrite(&mut self, _path: &Path) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// `XResource::class,` lines to register in the service provider.
    pub resources: Vec<String>,
    /// Menu entries rendered from the `MenuItem` stub.
    pub menu_items: Vec<String>,
}

/// Build types `structure` allows out of `enabled`, in `enabled` order.
pub fn valid_build_types(structure: &CodeStructure, enabled: &[BuildType]) -> Vec<BuildType> {
    enabled
        .iter()
        .copied()
        .filter(|ty| match ty {
            BuildType::Model => structure.with_model(),
            BuildType::Migration => structure.with_migration(),
            BuildType::Resource
            | BuildType::IndexPage
            | BuildType::FormPage
            | BuildType::DetailPage => structure.with_resource(),
        })
        .collect()
}

pub fn build_structures(
    structures: &CodeStructureList,
    options: &BuildOptions,
    prompt: &mut dyn OverwritePrompt,
) -> BuilderResult<BuildReport> {
    let stubs = StubRenderer::with_overrides(options.stub_dir.as_deref())?;
    let base = options.base_dir();
    let prompts = options.generation_dir.is_none();

    if let Some(dir) = &options.generation_dir {
        prepare_generation_dir(dir)?;
    }

    let mut report = BuildReport::default();

    for (iteration, structure) in structures.iter().enumerate() {
        let iteration = u32::try_from(iteration).unwrap_or(u32::MAX);
        let paths = CodePath::init(structure, base, iteration, options.now);
        let build_types = valid_build_types(structure, &options.build_types);
        tracing::debug!(
            entity = structure.entity().raw(),
            table = structure.table(),
            ?build_types,
            "Building structure"
        );

        for build_type in &build_types {
            let file = paths.path(*build_type)?.file();
            if prompts && file.exists() && !prompt.confirm_overwrite(&file) {
                tracing::debug!(path = %file.display(), "Skipped existing file");
                report.skipped.push(file);
                continue;
            }

            let rendered = BuildFactory::builder(*build_type).build(structure, &paths, &stubs)?;
            write_file(&rendered.path, &rendered.content)?;
            tracing::info!(path = %rendered.path.display(), "Created file");
            report.created.push(rendered.path);
        }

        if build_types.contains(&BuildType::Resource) {
            let resource = paths.path(BuildType::Resource)?.raw_name().to_string();
            report.menu_items.push(menu_item(structure, &resource, &stubs)?);
            report.resources.push(format!("{resource}::class,"));
        }
    }

    Ok(report)
}

fn menu_item(structure: &CodeStructure, resource: &str, stubs: &StubRenderer) -> BuilderResult<String> {
    let mut context = Context::new();
    context.insert("title", &resource_title(structure).replace('\'', "\\'"));
    context.insert("resource", resource);
    Ok(stubs.render(Stub::MenuItem, &context)?.trim_end().to_string())
}

fn prepare_generation_dir(dir: &Path) -> BuilderResult<()> {
    fs::create_dir_all(dir).map_err(|e| BuilderError::io(dir, e))?;
    let gitignore = dir.join(".gitignore");
    if !gitignore.exists() {
        fs::write(&gitignore, GENERATION_GITIGNORE).map_err(|e| BuilderError::io(&gitignore, e))?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &str) -> BuilderResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuilderError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| BuilderError::io(path, e))
}
