//! MoonShine field classes for column types and field aliases.

use crate::error::{BuilderError, BuilderResult};
use crate::types::SqlType;

const UI_FIELDS: &str = "MoonShine\\UI\\Fields";
const LARAVEL_FIELDS: &str = "MoonShine\\Laravel\\Fields";
const RELATIONSHIPS: &str = "MoonShine\\Laravel\\Fields\\Relationships";

const UI_ALIASES: &[&str] = &[
    "Checkbox",
    "Code",
    "Color",
    "Date",
    "DateRange",
    "Email",
    "Enum",
    "File",
    "Hidden",
    "HiddenIds",
    "ID",
    "Image",
    "Json",
    "Markdown",
    "Number",
    "Password",
    "PasswordRepeat",
    "Phone",
    "Position",
    "Preview",
    "Range",
    "RangeSlider",
    "Select",
    "Switcher",
    "Template",
    "Text",
    "Textarea",
    "Url",
];

const LARAVEL_ALIASES: &[&str] = &["Slug"];

const RELATION_ALIASES: &[&str] = &[
    "BelongsTo",
    "BelongsToMany",
    "HasMany",
    "HasManyThrough",
    "HasOne",
    "HasOneThrough",
    "MorphMany",
    "MorphOne",
    "MorphTo",
    "MorphToMany",
    "RelationRepeater",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMap;

impl FieldMap {
    /// Default field class for a column type.
    pub fn field_for_type(ty: SqlType) -> String {
        let (module, field) = match ty {
            SqlType::Id
            | SqlType::BigIncrements
            | SqlType::MediumIncrements
            | SqlType::Increments
            | SqlType::SmallIncrements
            | SqlType::TinyIncrements => (UI_FIELDS, "ID"),
            SqlType::BigInteger
            | SqlType::MediumInteger
            | SqlType::Integer
            | SqlType::SmallInteger
            | SqlType::TinyInteger
            | SqlType::UnsignedBigInteger
            | SqlType::UnsignedMediumInteger
            | SqlType::UnsignedInteger
            | SqlType::UnsignedSmallInteger
            | SqlType::UnsignedTinyInteger
            | SqlType::Decimal
            | SqlType::Double
            | SqlType::Float
            | SqlType::Year
            | SqlType::ForeignId => (UI_FIELDS, "Number"),
            SqlType::Boolean => (UI_FIELDS, "Switcher"),
            SqlType::TinyText | SqlType::Text | SqlType::MediumText | SqlType::LongText => {
                (UI_FIELDS, "Textarea")
            }
            SqlType::Json | SqlType::Jsonb => (UI_FIELDS, "Json"),
            SqlType::Date
            | SqlType::DateTime
            | SqlType::DateTimeTz
            | SqlType::Timestamp
            | SqlType::TimestampTz => (UI_FIELDS, "Date"),
            SqlType::BelongsTo => (RELATIONSHIPS, "BelongsTo"),
            SqlType::HasMany => (RELATIONSHIPS, "HasMany"),
            SqlType::HasOne => (RELATIONSHIPS, "HasOne"),
            SqlType::BelongsToMany => (RELATIONSHIPS, "BelongsToMany"),
            _ => (UI_FIELDS, "Text"),
        };
        format!("{module}\\{field}")
    }

    /// Field class for a short alias such as `File` or `Select`.
    ///
    /// Values containing a backslash are taken as already qualified.
    pub fn field_from_alias(alias: &str) -> BuilderResult<String> {
        if alias.contains('\\') {
            return Ok(alias.trim_start_matches('\\').to_string());
        }

        let module = if UI_ALIASES.contains(&alias) {
            UI_FIELDS
        } else if LARAVEL_ALIASES.contains(&alias) {
            LARAVEL_FIELDS
        } else if RELATION_ALIASES.contains(&alias) {
            RELATIONSHIPS
        } else {
            return Err(BuilderError::UnknownFieldAlias(alias.to_string()));
        };

        Ok(format!("{module}\\{alias}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_for_type() {
        assert_eq!(FieldMap::field_for_type(SqlType::Id), "MoonShine\\UI\\Fields\\ID");
        assert_eq!(FieldMap::field_for_type(SqlType::String), "MoonShine\\UI\\Fields\\Text");
        assert_eq!(FieldMap::field_for_type(SqlType::LongText), "MoonShine\\UI\\Fields\\Textarea");
        assert_eq!(FieldMap::field_for_type(SqlType::Boolean), "MoonShine\\UI\\Fields\\Switcher");
        assert_eq!(FieldMap::field_for_type(SqlType::Decimal), "MoonShine\\UI\\Fields\\Number");
        assert_eq!(FieldMap::field_for_type(SqlType::Timestamp), "MoonShine\\UI\\Fields\\Date");
        assert_eq!(
            FieldMap::field_for_type(SqlType::BelongsTo),
            "MoonShine\\Laravel\\Fields\\Relationships\\BelongsTo"
        );
    }

    #[test]
    fn test_field_from_alias() {
        assert_eq!(FieldMap::field_from_alias("File").unwrap(), "MoonShine\\UI\\Fields\\File");
        assert_eq!(FieldMap::field_from_alias("Slug").unwrap(), "MoonShine\\Laravel\\Fields\\Slug");
        assert_eq!(
            FieldMap::field_from_alias("\\App\\MoonShine\\Fields\\Money").unwrap(),
            "App\\MoonShine\\Fields\\Money"
        );

        let err = FieldMap::field_from_alias("Wysiwyg").unwrap_err();
        assert!(matches!(err, BuilderError::UnknownFieldAlias(a) if a == "Wysiwyg"));
    }
}
