//! Scaffolding SDK for MoonShine admin panels.
//!
//! Turns a description of a data entity into the PHP sources a MoonShine
//! project needs: an Eloquent model, a migration, a resource and its CRUD pages.
//!
//! # Modules
//!
//! ## Structure
//! - [`naming`]: Entity/table name inflection (plural, singular, case forms)
//! - [`types`]: Semantic column type table and raw SQL type mapping
//! - [`structure`]: Normalized code structure: columns, relations, flags
//! - [`field_map`]: Column type → MoonShine field class lookup
//!
//! ## Input
//! - [`sources`]: JSON build files, table schema dumps, PHP models, console fields, OpenAPI
//!
//! ## Output
//! - [`code_path`]: Output file locations and namespaces per build type
//! - [`stubs`]: Tera-based stub rendering with user overrides
//! - [`builders`]: One builder per generated file kind
//! - [`project`]: Full generation run with overwrite confirmation

pub mod builders;
pub mod code_path;
pub mod error;
pub mod field_map;
pub mod naming;
pub mod project;
pub mod sources;
pub mod structure;
pub mod stubs;
pub mod types;

pub use error::{BuilderError, BuilderResult};
