//! Tabula Fields - pluggable field types
//!
//! A field type governs how a column's values are displayed and edited,
//! independent of the storage primitive. This crate provides:
//!
//! - `FieldTypeDescriptor` - The plugin contract (id, default options,
//!   option schema, formatter, validator, editor)
//! - `FieldTypeRegistry` - Lookup by field-type id with a safe `text` fallback
//! - Built-in field types (`text`, `number`, `boolean`, `datetime`, `json`,
//!   `select`, `id`)
//! - A write-once process-wide registry (`init_global` / `global`)

mod builtins;
mod descriptor;
mod error;
mod options;
mod registry;

pub use builtins::*;
pub use descriptor::*;
pub use error::*;
pub use options::*;
pub use registry::*;
