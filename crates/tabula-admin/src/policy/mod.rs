//! Permission model and tables
//!
//! A permission table maps each role to explicit grants plus an optional
//! parent role. Organization overrides layer on top of a base table and
//! produce an `EffectivePolicy`; the base is never modified.

mod model;
mod table;

#[cfg(test)]
mod tests;

pub use model::*;
pub use table::*;
