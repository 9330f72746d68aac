//! Access control evaluation
//!
//! `AccessControl::evaluate` is the single decision point. Everything that
//! gates a UI control goes through `AclHelpers`, whose methods are named
//! projections of `evaluate`.

mod evaluator;
mod helpers;

#[cfg(test)]
mod tests;

pub use evaluator::*;
pub use helpers::*;
