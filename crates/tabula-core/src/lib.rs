//! Tabula Core - data-source abstractions shared by every Tabula crate
//!
//! This crate provides the normalized model a generic admin UI uses to talk
//! to heterogeneous external data sources. It defines:
//!
//! - `Column` - Normalized column description (type, field type, visibility)
//! - `DataSourceCapabilities` - Declared features of a data source
//! - `PaginationContract` - Offset or cursor paging, selected from capabilities
//! - `get_visible_columns` - Column selection per UI context
//! - Common types like `Value` and `TabulaError`

mod capabilities;
mod column;
mod error;
mod pagination;
mod types;
mod visibility;

pub use capabilities::*;
pub use column::*;
pub use error::*;
pub use pagination::*;
pub use types::*;
pub use visibility::*;
