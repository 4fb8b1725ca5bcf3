//! `moonshine-ctl types`: list every supported column type.

use moonshine_sdk::types::SqlType;

use crate::output;

pub(crate) fn handle_types_command() {
    output::listing("Available types:", SqlType::all());
}
