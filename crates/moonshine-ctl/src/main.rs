//! MoonShine scaffolding CLI
//!
//! Generates Eloquent models, migrations, MoonShine resources and CRUD pages
//! from JSON build files, schema dumps, existing models, console field lists
//! or OpenAPI documents.

mod cli_config;
mod commands;
mod error;
mod output;
mod prompt;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ModelSchemaArgs};
use error::CtlResult;

#[derive(Debug, Parser)]
#[command(name = "moonshine-ctl", version, about = "Scaffolding for MoonShine admin panels")]
#[command(styles = output::clap_styles())]
struct Cli {
    /// Log decisions to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a model, migration, resource and pages
    Build(BuildArgs),

    /// Export existing Eloquent models as a JSON build file
    ModelSchema(ModelSchemaArgs),

    /// List every supported column type
    Types,

    /// Write a starter .moonshine-builder.toml into the working directory
    Init {
        /// Laravel project root recorded in the config
        #[arg(long, default_value = ".")]
        project_root: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        output::error(e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> CtlResult<()> {
    match command {
        Commands::Build(args) => {
            let cli_config = cli_config::load_cli_config();
            commands::handle_build_command(args, &cli_config)
        }
        Commands::ModelSchema(args) => {
            let cli_config = cli_config::load_cli_config();
            commands::handle_model_schema_command(args, &cli_config)
        }
        Commands::Types => {
            commands::handle_types_command();
            Ok(())
        }
        Commands::Init { project_root } => commands::handle_init_command(&project_root),
    }
}
