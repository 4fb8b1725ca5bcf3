//! Command handlers for the MoonShine scaffolding CLI.

pub(crate) mod build;
pub(crate) mod init;
pub(crate) mod model_schema;
pub(crate) mod types;

pub(crate) use build::{handle_build_command, BuildArgs};
pub(crate) use init::handle_init_command;
pub(crate) use model_schema::{handle_model_schema_command, ModelSchemaArgs};
pub(crate) use types::handle_types_command;
