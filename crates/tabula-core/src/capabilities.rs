//! Data source capabilities
//!
//! Declared once per data source by the columns collaborator. Fields are
//! permissive on input: a missing or unknown value never fails to parse.

use serde::{Deserialize, Serialize};

use crate::PaginationKind;

/// Declared features of a data source that gate UI affordances
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DataSourceCapabilities {
    /// Raw pagination capability, e.g. `"offset"` or `"cursor"`
    pub pagination: Option<String>,
    pub supports_filters: bool,
    pub supports_bulk_delete: bool,
}

impl DataSourceCapabilities {
    pub fn offset() -> Self {
        Self {
            pagination: Some("offset".to_string()),
            supports_filters: true,
            supports_bulk_delete: true,
        }
    }

    pub fn cursor() -> Self {
        Self {
            pagination: Some("cursor".to_string()),
            supports_filters: true,
            supports_bulk_delete: false,
        }
    }

    pub fn with_filters(mut self, supports: bool) -> Self {
        self.supports_filters = supports;
        self
    }

    pub fn with_bulk_delete(mut self, supports: bool) -> Self {
        self.supports_bulk_delete = supports;
        self
    }

    /// Paging strategy for this data source
    pub fn pagination_kind(&self) -> PaginationKind {
        PaginationKind::from_capability(self.pagination.as_deref())
    }
}
