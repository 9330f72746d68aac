//! Tabula Services Layer
//!
//! This crate sits between the UI and the external data-access
//! collaborators. It owns per-session state and orchestrates the pure
//! models from the lower crates.
//!
//! # Architecture
//!
//! ```text
//! UI Layer (excluded)
//!     ↓
//! Service Layer (tabula-services) ← This crate
//!     ↓
//! Model Layer (tabula-fields, tabula-filters, tabula-admin)
//!     ↓
//! Core (tabula-core)
//! ```
//!
//! # Services
//!
//! - [`DataSourceSession`] - Context, cached columns, filters, selection and sidebar state
//! - [`RecordsService`] - Paged record fetches and bulk deletes
//! - [`ViewService`] - Creating and editing saved views
//! - [`OptionPersister`] - Coalesced persistence of column display options
//!
//! # Design Principles
//!
//! 1. **No global state** - Everything a UI session needs lives in its session object
//! 2. **Collaborators behind traits** - Columns, records, views and option storage are injected
//! 3. **One decision point** - Write paths authorize through `AccessControl`

mod collaborators;
mod context;
mod error;
mod option_persister;
mod records_service;
mod session;
mod view_service;

pub use collaborators::*;
pub use context::DataSourceContext;
pub use error::{ServiceError, ServiceResult};
pub use option_persister::{DEFAULT_QUIET_PERIOD, OptionPersister};
pub use records_service::RecordsService;
pub use session::DataSourceSession;
pub use view_service::{Actor, NewView, ViewService};
