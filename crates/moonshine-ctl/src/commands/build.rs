//! `moonshine-ctl build`: generate files from one input source.

use std::path::PathBuf;

use clap::Args;
use moonshine_sdk::code_path::BuildType;
use moonshine_sdk::project::{build_structures, BuildOptions};
use moonshine_sdk::sources::{available_build_files, make_source, ParseType, SourceRequest};
use moonshine_sdk::BuilderError;

use crate::cli_config::CliConfig;
use crate::error::CtlResult;
use crate::output;
use crate::prompt::ConsolePrompt;

#[derive(Debug, Args)]
pub(crate) struct BuildArgs {
    /// Build file, table name, model name or entity name depending on --type
    pub target: Option<String>,

    /// Input source: json, table, model, console or openapi
    #[arg(long = "type", short = 't')]
    pub parse_type: Option<String>,

    /// Replace existing files without asking
    #[arg(long, short)]
    pub force: bool,

    /// Write into this directory instead of the project root
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Only generate these build types (model, migration, resource, index-page, ...)
    #[arg(long = "only", value_name = "TYPE")]
    pub only: Vec<String>,

    /// Console field `column:type[:name[:relation_table]]`
    #[arg(long = "field", value_name = "SPEC")]
    pub fields: Vec<String>,

    /// Add created_at/updated_at (console source)
    #[arg(long)]
    pub timestamps: bool,

    /// Add deleted_at (console source)
    #[arg(long)]
    pub soft_deletes: bool,

    /// Generate a migration (console source)
    #[arg(long)]
    pub migration: bool,

    /// Related table for a HasMany relation (table source)
    #[arg(long, value_name = "TABLE")]
    pub has_many: Vec<String>,

    /// Related table for a HasOne relation (table source)
    #[arg(long, value_name = "TABLE")]
    pub has_one: Vec<String>,

    /// Related table for a BelongsToMany relation (table source)
    #[arg(long, value_name = "TABLE")]
    pub belongs_to_many: Vec<String>,

    /// Schema dump for the table and model sources
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

pub(crate) fn handle_build_command(args: BuildArgs, cli_config: &CliConfig) -> CtlResult<()> {
    let parse_type = resolve_parse_type(&args)?;
    let builds_dir = cli_config.builds_dir();

    if args.target.is_none() && !parse_type.build_file_extensions().is_empty() {
        list_build_files(parse_type, &builds_dir);
        return Err(BuilderError::MissingTarget(parse_type.to_string()).into());
    }

    let request = SourceRequest {
        target: args.target.clone(),
        builds_dir,
        models_dir: cli_config.models_dir(),
        schema: args.schema.clone().or_else(|| cli_config.schema()),
        fields: args.fields.clone(),
        has_many: args.has_many.clone(),
        has_one: args.has_one.clone(),
        belongs_to_many: args.belongs_to_many.clone(),
        migration: args.migration,
        timestamps: args.timestamps,
        soft_deletes: args.soft_deletes,
    };

    let structures = make_source(parse_type, &request)?.make_structures()?;
    if structures.is_empty() {
        output::warning("Nothing to build.");
        return Ok(());
    }

    let options = BuildOptions::new(cli_config.project_root())
        .with_generation_dir(args.output.clone())
        .with_build_types(build_types(&args.only, &cli_config.builders)?)
        .with_stub_dir(cli_config.stub_dir());

    let mut prompt = ConsolePrompt::new(args.force);
    let report = build_structures(&structures, &options, &mut prompt)?;
    output::report(&report);

    Ok(())
}

fn resolve_parse_type(args: &BuildArgs) -> CtlResult<ParseType> {
    if let Some(name) = &args.parse_type {
        return Ok(name.parse()?);
    }

    Ok(args
        .target
        .as_deref()
        .and_then(ParseType::from_target)
        .unwrap_or(ParseType::Json))
}

/// `--only` wins over the configured builders; both empty means all types.
fn build_types(only: &[String], configured: &[String]) -> CtlResult<Vec<BuildType>> {
    let names = if only.is_empty() { configured } else { only };
    let types = names
        .iter()
        .map(|name| name.parse::<BuildType>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(types)
}

fn list_build_files(parse_type: ParseType, builds_dir: &std::path::Path) {
    let files = available_build_files(builds_dir, parse_type.build_file_extensions());
    if files.is_empty() {
        output::warning(format!("No build files found in {}", builds_dir.display()));
        return;
    }

    output::listing(format!("Available build files in {}:", builds_dir.display()), files);
}
