//! Tabula Filters - composable filter expressions
//!
//! Filters are recursive trees: a root `FilterGroup` joins leaf `Filter`s and
//! nested groups with `and`/`or`. This crate provides:
//!
//! - `normalize` - Canonical form (empty groups pruned, single-item groups collapsed)
//! - `validate` - Per-leaf checks against a table's columns
//! - `encode` / `decode` - URL-safe, stable serialization for shareable links
//! - `FilterState` - Draft and applied filter slots with an atomic apply

mod codec;
mod error;
mod normalize;
mod operator;
mod state;
mod tree;
mod validate;
mod value;

pub use codec::*;
pub use error::*;
pub use normalize::*;
pub use operator::*;
pub use state::*;
pub use tree::*;
pub use validate::*;
pub use value::*;
