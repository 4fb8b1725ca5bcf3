//! `moonshine-ctl model-schema`: export existing models as a JSON build file.

use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Args;
use moonshine_sdk::sources::model::ModelClass;
use moonshine_sdk::sources::{MakeStructures, ModelSource, SchemaDump};

use crate::cli_config::CliConfig;
use crate::error::{CtlError, CtlResult};
use crate::output;

#[derive(Debug, Args)]
pub(crate) struct ModelSchemaArgs {
    /// Models directory (default: the configured models dir)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Schema dump providing column types
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Only export models whose class name contains this text (case-insensitive)
    #[arg(long)]
    pub filter: Option<String>,

    /// Models exported with `withResource: false`
    #[arg(long = "pivot", value_name = "MODEL")]
    pub pivots: Vec<String>,
}

pub(crate) fn handle_model_schema_command(
    args: ModelSchemaArgs,
    cli_config: &CliConfig,
) -> CtlResult<()> {
    let models_dir = args.path.clone().unwrap_or_else(|| cli_config.models_dir());
    let schema = args
        .schema
        .clone()
        .or_else(|| cli_config.schema())
        .map(|path| SchemaDump::from_path(&path))
        .transpose()?;

    let source = ModelSource::discover(&models_dir, args.filter.as_deref(), schema)?;
    let structures = source.make_structures()?;
    if structures.is_empty() {
        output::warning(format!("No models found in {}", models_dir.display()));
        return Ok(());
    }

    let pivot_tables = pivot_tables(source.models(), &args.pivots);
    let json = structures.to_json(&pivot_tables)?;

    let builds_dir = cli_config.builds_dir();
    let file_name = format!("models_{}.json", Local::now().format("%Y%m%d%H%M%S"));
    let path = write_build_file(&builds_dir, &file_name, &json)?;

    output::created(&path);
    output::next_steps(
        "To generate resources from it, run:",
        [format!("moonshine-ctl build {file_name} --type json")],
    );

    Ok(())
}

/// Tables of the models named as pivots.
fn pivot_tables(models: &[ModelClass], pivots: &[String]) -> Vec<String> {
    models
        .iter()
        .filter(|model| pivots.iter().any(|p| p.eq_ignore_ascii_case(&model.name)))
        .map(ModelClass::table_name)
        .collect()
}

fn write_build_file(dir: &Path, file_name: &str, json: &str) -> CtlResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|source| CtlError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    std::fs::write(&path, json).map_err(|source| CtlError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Wrote model schema");
    Ok(path)
}
