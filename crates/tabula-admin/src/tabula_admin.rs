//! Tabula Admin - access control
//!
//! This crate decides which actions a role may take:
//! - Roles, resources, actions and grants
//! - Static, versioned permission tables with per-organization overrides
//! - The evaluator (`AccessControl`) and the named projections UI code
//!   gates controls with (`AclHelpers`)

pub mod access;
mod error;
pub mod policy;

pub use access::*;
pub use error::*;
pub use policy::*;
