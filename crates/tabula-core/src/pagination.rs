//! Pagination strategy selection
//!
//! Maps a data source's declared pagination capability to the paging
//! contract the records collaborator expects. Anything that isn't exactly
//! `"cursor"` pages by offset: every collaborator supports bounded
//! offset/limit at minimum.

use serde::{Deserialize, Serialize};

use crate::DataSourceCapabilities;

/// Paging strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationKind {
    #[default]
    Offset,
    Cursor,
}

impl PaginationKind {
    /// Resolve a raw capability string
    pub fn from_capability(raw: Option<&str>) -> Self {
        match raw {
            Some("offset") | None => Self::Offset,
            Some("cursor") => Self::Cursor,
            Some(other) => {
                tracing::warn!(
                    capability = %other,
                    "unrecognized pagination capability, using offset pagination"
                );
                Self::Offset
            }
        }
    }

    /// UI controls valid for this strategy
    pub fn affordances(&self) -> Affordances {
        match self {
            Self::Offset => Affordances {
                page_numbers: true,
                total_count: true,
                next_previous: true,
            },
            Self::Cursor => Affordances {
                page_numbers: false,
                total_count: false,
                next_previous: true,
            },
        }
    }
}

/// Select the paging strategy for a data source
pub fn select_pagination(capabilities: &DataSourceCapabilities) -> PaginationKind {
    capabilities.pagination_kind()
}

/// Which pagination controls the UI may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub page_numbers: bool,
    pub total_count: bool,
    pub next_previous: bool,
}

/// Offset/limit page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage {
    pub page: u64,
    pub page_size: u64,
}

impl OffsetPage {
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Cursor page request. `None` asks for the first page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage {
    pub cursor: Option<String>,
    pub page_size: u64,
}

/// Page request sent to the records collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaginationContract {
    Offset(OffsetPage),
    Cursor(CursorPage),
}

impl PaginationContract {
    /// First page for the given strategy
    pub fn first_page(kind: PaginationKind, page_size: u64) -> Self {
        let page_size = page_size.max(1);
        match kind {
            PaginationKind::Offset => Self::Offset(OffsetPage { page: 1, page_size }),
            PaginationKind::Cursor => Self::Cursor(CursorPage {
                cursor: None,
                page_size,
            }),
        }
    }

    /// First page for a data source, selected from its capabilities
    pub fn for_capabilities(capabilities: &DataSourceCapabilities, page_size: u64) -> Self {
        Self::first_page(select_pagination(capabilities), page_size)
    }

    pub fn kind(&self) -> PaginationKind {
        match self {
            Self::Offset(_) => PaginationKind::Offset,
            Self::Cursor(_) => PaginationKind::Cursor,
        }
    }

    pub fn page_size(&self) -> u64 {
        match self {
            Self::Offset(page) => page.page_size,
            Self::Cursor(page) => page.page_size,
        }
    }

    /// Request for the following page, if the collaborator reported one
    pub fn next(&self, info: &PageInfo) -> Option<Self> {
        match (self, info) {
            (Self::Offset(page), PageInfo::Offset { total }) => {
                (page.page < total_pages(*total, page.page_size)).then(|| {
                    Self::Offset(OffsetPage {
                        page: page.page + 1,
                        page_size: page.page_size,
                    })
                })
            }
            (Self::Cursor(page), PageInfo::Cursor { next, .. }) => {
                next.as_ref().map(|cursor| {
                    Self::Cursor(CursorPage {
                        cursor: Some(cursor.clone()),
                        page_size: page.page_size,
                    })
                })
            }
            _ => None,
        }
    }

    /// Request for the preceding page, if there is one
    pub fn previous(&self, info: &PageInfo) -> Option<Self> {
        match (self, info) {
            (Self::Offset(page), _) => (page.page > 1).then(|| {
                Self::Offset(OffsetPage {
                    page: page.page - 1,
                    page_size: page.page_size,
                })
            }),
            (Self::Cursor(page), PageInfo::Cursor { previous, .. }) => {
                previous.as_ref().map(|cursor| {
                    Self::Cursor(CursorPage {
                        cursor: Some(cursor.clone()),
                        page_size: page.page_size,
                    })
                })
            }
            _ => None,
        }
    }

    /// Jump to a page number. Only meaningful for offset paging.
    pub fn go_to_page(&self, page: u64) -> Option<Self> {
        match self {
            Self::Offset(current) => Some(Self::Offset(OffsetPage {
                page: page.max(1),
                page_size: current.page_size,
            })),
            Self::Cursor(_) => None,
        }
    }
}

/// Paging metadata returned alongside a page of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageInfo {
    Offset {
        total: u64,
    },
    Cursor {
        next: Option<String>,
        previous: Option<String>,
    },
}

/// Number of pages needed for `total` records, at least 1
pub fn total_pages(total: u64, page_size: u64) -> u64 {
    let page_size = page_size.max(1);
    (total.saturating_add(page_size - 1) / page_size).max(1)
}
