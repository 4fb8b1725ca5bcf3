//! `moonshine-ctl init`: bootstrap a `.moonshine-builder.toml` with defaults.

use std::path::Path;

use askama::Template;

use crate::cli_config::loader::CONFIG_FILENAME;
use crate::error::{CtlError, CtlResult};
use crate::output;

/// Askama template for generating `.moonshine-builder.toml`.
///
/// Fields hold TOML string literals, quotes included.
#[derive(Template, Debug)]
#[template(path = "init-config.toml", escape = "none")]
struct InitConfigTemplate {
    project_root: String,
    builds_dir: String,
    models_dir: String,
}

impl InitConfigTemplate {
    fn new(project_root: &str, builds_dir: &str, models_dir: &str) -> Self {
        Self {
            project_root: toml_string(project_root),
            builds_dir: toml_string(builds_dir),
            models_dir: toml_string(models_dir),
        }
    }
}

/// Quoted and escaped TOML string literal.
fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

pub(crate) fn handle_init_command(project_root: &str) -> CtlResult<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        output::warning(format!(
            "{CONFIG_FILENAME} already exists in this directory. Remove it first to reinitialize."
        ));
        return Err(CtlError::Config(format!("{CONFIG_FILENAME} already exists")));
    }

    let template = InitConfigTemplate::new(project_root, "builds", "app/Models");
    let content = template.render()?;

    std::fs::write(config_path, content).map_err(|source| CtlError::Write {
        path: config_path.to_path_buf(),
        source,
    })?;

    output::created(config_path);
    output::next_steps(
        "Next steps:",
        [
            "mkdir builds                                  # Put JSON build files here",
            "moonshine-ctl build todo.json                 # Generate from a build file",
            "moonshine-ctl build Product --type console --field id:id --field title:string",
        ],
    );

    Ok(())
}
