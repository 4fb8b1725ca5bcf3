//! Tera filters available to stubs.

use std::collections::HashMap;

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use tera::{Result, Value};

use crate::naming::{pluralize, singularize};

fn string_arg<'a>(value: &'a Value, filter: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{filter} filter expects a string")))
}

pub(crate) fn snake_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(string_arg(value, "snake_case")?.to_snake_case()))
}

pub(crate) fn pascal_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(string_arg(value, "pascal_case")?.to_pascal_case()))
}

pub(crate) fn camel_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(string_arg(value, "camel_case")?.to_lower_camel_case()))
}

pub(crate) fn kebab_case(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(string_arg(value, "kebab_case")?.to_kebab_case()))
}

pub(crate) fn plural(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(pluralize(string_arg(value, "plural")?)))
}

pub(crate) fn singular(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(singularize(string_arg(value, "singular")?)))
}
