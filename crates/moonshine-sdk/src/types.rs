//! Semantic column types.
//!
//! Every column is tagged with the Laravel schema-builder method that creates
//! it (`string`, `bigInteger`, ...) or with one of the four relation
//! pseudo-types. The same value drives field selection, validation rules and
//! the migration line.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, BuilderResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SqlType {
    Id,
    BigIncrements,
    MediumIncrements,
    Increments,
    SmallIncrements,
    TinyIncrements,
    BigInteger,
    MediumInteger,
    Integer,
    SmallInteger,
    TinyInteger,
    UnsignedBigInteger,
    UnsignedMediumInteger,
    UnsignedInteger,
    UnsignedSmallInteger,
    UnsignedTinyInteger,
    Decimal,
    Double,
    Float,
    Boolean,
    Char,
    String,
    TinyText,
    Text,
    MediumText,
    LongText,
    Json,
    Jsonb,
    Enum,
    Set,
    Binary,
    Uuid,
    Ulid,
    IpAddress,
    MacAddress,
    Date,
    DateTime,
    DateTimeTz,
    Time,
    TimeTz,
    Timestamp,
    TimestampTz,
    Year,
    ForeignId,
    Geometry,
    Geography,
    RememberToken,
    BelongsTo,
    HasMany,
    HasOne,
    BelongsToMany,
}

const ALL: &[SqlType] = &[
    SqlType::Id,
    SqlType::BigIncrements,
    SqlType::MediumIncrements,
    SqlType::Increments,
    SqlType::SmallIncrements,
    SqlType::TinyIncrements,
    SqlType::BigInteger,
    SqlType::MediumInteger,
    SqlType::Integer,
    SqlType::SmallInteger,
    SqlType::TinyInteger,
    SqlType::UnsignedBigInteger,
    SqlType::UnsignedMediumInteger,
    SqlType::UnsignedInteger,
    SqlType::UnsignedSmallInteger,
    SqlType::UnsignedTinyInteger,
    SqlType::Decimal,
    SqlType::Double,
    SqlType::Float,
    SqlType::Boolean,
    SqlType::Char,
    SqlType::String,
    SqlType::TinyText,
    SqlType::Text,
    SqlType::MediumText,
    SqlType::LongText,
    SqlType::Json,
    SqlType::Jsonb,
    SqlType::Enum,
    SqlType::Set,
    SqlType::Binary,
    SqlType::Uuid,
    SqlType::Ulid,
    SqlType::IpAddress,
    SqlType::MacAddress,
    SqlType::Date,
    SqlType::DateTime,
    SqlType::DateTimeTz,
    SqlType::Time,
    SqlType::TimeTz,
    SqlType::Timestamp,
    SqlType::TimestampTz,
    SqlType::Year,
    SqlType::ForeignId,
    SqlType::Geometry,
    SqlType::Geography,
    SqlType::RememberToken,
    SqlType::BelongsTo,
    SqlType::HasMany,
    SqlType::HasOne,
    SqlType::BelongsToMany,
];

impl SqlType {
    /// Every supported type, in declaration order.
    pub fn all() -> &'static [SqlType] {
        ALL
    }

    /// The schema-builder method name (or relation name) for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::BigIncrements => "bigIncrements",
            Self::MediumIncrements => "mediumIncrements",
            Self::Increments => "increments",
            Self::SmallIncrements => "smallIncrements",
            Self::TinyIncrements => "tinyIncrements",
            Self::BigInteger => "bigInteger",
            Self::MediumInteger => "mediumInteger",
            Self::Integer => "integer",
            Self::SmallInteger => "smallInteger",
            Self::TinyInteger => "tinyInteger",
            Self::UnsignedBigInteger => "unsignedBigInteger",
            Self::UnsignedMediumInteger => "unsignedMediumInteger",
            Self::UnsignedInteger => "unsignedInteger",
            Self::UnsignedSmallInteger => "unsignedSmallInteger",
            Self::UnsignedTinyInteger => "unsignedTinyInteger",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::String => "string",
            Self::TinyText => "tinyText",
            Self::Text => "text",
            Self::MediumText => "mediumText",
            Self::LongText => "longText",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Enum => "enum",
            Self::Set => "set",
            Self::Binary => "binary",
            Self::Uuid => "uuid",
            Self::Ulid => "ulid",
            Self::IpAddress => "ipAddress",
            Self::MacAddress => "macAddress",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::DateTimeTz => "dateTimeTz",
            Self::Time => "time",
            Self::TimeTz => "timeTz",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestampTz",
            Self::Year => "year",
            Self::ForeignId => "foreignId",
            Self::Geometry => "geometry",
            Self::Geography => "geography",
            Self::RememberToken => "rememberToken",
            Self::BelongsTo => "BelongsTo",
            Self::HasMany => "HasMany",
            Self::HasOne => "HasOne",
            Self::BelongsToMany => "BelongsToMany",
        }
    }

    /// Map a raw database column type to a semantic type.
    ///
    /// Accepts MySQL, PostgreSQL and SQLite spellings. Length and precision
    /// (`varchar(255)`, `decimal(8,2)`) are ignored, `unsigned` selects the
    /// unsigned integer variants, `tinyint(1)` is a boolean and the marker
    /// `primary` is the id column.
    pub fn from_sql_type(raw: &str) -> BuilderResult<Self> {
        let lowered = raw.trim().to_lowercase();
        if lowered == "tinyint(1)" {
            return Ok(Self::Boolean);
        }

        let unsigned = lowered.contains("unsigned");
        let base = match lowered.find('(') {
            Some(idx) => {
                let tail = lowered[idx..]
                    .find(')')
                    .map(|end| &lowered[idx + end + 1..])
                    .unwrap_or("");
                format!("{}{}", &lowered[..idx], tail)
            }
            None => lowered.clone(),
        };
        let base = base.replace("unsigned", "");
        let base = base.split_whitespace().collect::<Vec<_>>().join(" ");

        let ty = match base.as_str() {
            "primary" => Self::Id,
            "bigint" | "int8" if unsigned => Self::UnsignedBigInteger,
            "bigint" | "int8" => Self::BigInteger,
            "int" | "integer" | "int4" if unsigned => Self::UnsignedInteger,
            "int" | "integer" | "int4" => Self::Integer,
            "mediumint" if unsigned => Self::UnsignedMediumInteger,
            "mediumint" => Self::MediumInteger,
            "smallint" | "int2" if unsigned => Self::UnsignedSmallInteger,
            "smallint" | "int2" => Self::SmallInteger,
            "tinyint" if unsigned => Self::UnsignedTinyInteger,
            "tinyint" => Self::TinyInteger,
            "serial" => Self::Increments,
            "bigserial" => Self::BigIncrements,
            "smallserial" => Self::SmallIncrements,
            "decimal" | "numeric" => Self::Decimal,
            "double" | "double precision" | "float8" => Self::Double,
            "float" | "real" | "float4" => Self::Float,
            "bool" | "boolean" | "bit" => Self::Boolean,
            "char" | "bpchar" | "character" => Self::Char,
            "varchar" | "character varying" | "string" | "nvarchar" => Self::String,
            "tinytext" => Self::TinyText,
            "text" | "citext" => Self::Text,
            "mediumtext" => Self::MediumText,
            "longtext" => Self::LongText,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "enum" => Self::Enum,
            "set" => Self::Set,
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary"
            | "bytea" => Self::Binary,
            "uuid" => Self::Uuid,
            "inet" => Self::IpAddress,
            "macaddr" => Self::MacAddress,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "time" | "time without time zone" => Self::Time,
            "timetz" | "time with time zone" => Self::TimeTz,
            "timestamp" | "timestamp without time zone" => Self::Timestamp,
            "timestamptz" | "timestamp with time zone" => Self::TimestampTz,
            "year" => Self::Year,
            "geometry" | "point" | "linestring" | "polygon" | "multipoint"
            | "multilinestring" | "multipolygon" | "geometrycollection" => Self::Geometry,
            "geography" => Self::Geography,
            _ => return Err(BuilderError::UnknownType(raw.to_string())),
        };

        Ok(ty)
    }

    pub fn is_id_type(&self) -> bool {
        matches!(
            self,
            Self::Id
                | Self::BigIncrements
                | Self::MediumIncrements
                | Self::Increments
                | Self::SmallIncrements
                | Self::TinyIncrements
        )
    }

    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::BelongsTo | Self::HasMany | Self::HasOne | Self::BelongsToMany
        )
    }

    /// Relations that have no physical column on the owning table.
    pub fn is_many_relation(&self) -> bool {
        matches!(self, Self::HasMany | Self::HasOne | Self::BelongsToMany)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Decimal | Self::Double | Self::Float)
    }

    /// HTML input type used for the column's form control.
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Id
            | Self::BigIncrements
            | Self::MediumIncrements
            | Self::Increments
            | Self::SmallIncrements
            | Self::TinyIncrements
            | Self::BigInteger
            | Self::MediumInteger
            | Self::Integer
            | Self::SmallInteger
            | Self::TinyInteger
            | Self::UnsignedBigInteger
            | Self::UnsignedMediumInteger
            | Self::UnsignedInteger
            | Self::UnsignedSmallInteger
            | Self::UnsignedTinyInteger
            | Self::Decimal
            | Self::Double
            | Self::Float
            | Self::Year
            | Self::ForeignId
            | Self::BelongsTo => "number",
            Self::Boolean => "checkbox",
            Self::Date => "date",
            Self::DateTime | Self::DateTimeTz | Self::Timestamp | Self::TimestampTz => {
                "datetime-local"
            }
            Self::Time | Self::TimeTz => "time",
            _ => "text",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .find(|ty| ty.as_str() == s)
            .copied()
            .ok_or_else(|| BuilderError::UnknownType(s.to_string()))
    }
}

impl TryFrom<String> for SqlType {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SqlType> for String {
    fn from(value: SqlType) -> Self {
        value.as_str().to_string()
    }
}
