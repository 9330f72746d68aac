//! Contracts with the external data-access layer
//!
//! The services never talk to a database. Columns, records, saved views and
//! column options come from implementations of these traits.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabula_core::{ColumnOverrides, FieldOptions, PageInfo, PaginationContract, TableSnapshot, Value};
use tabula_filters::FilterGroup;

use crate::ServiceResult;

/// Which table (and optionally view) a columns request is for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsRequest {
    pub data_source_id: String,
    pub table_name: String,
    pub view_id: Option<String>,
}

/// A page request for the records collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsRequest {
    pub data_source_id: String,
    pub table_name: String,
    /// Encoded applied filters, empty for none
    pub filters: String,
    pub pagination: PaginationContract,
}

/// One record, column name → value
pub type Record = IndexMap<String, Value>;

/// A page of records plus paging metadata
#[derive(Debug, Clone, PartialEq)]
pub struct RecordsPage {
    pub records: Vec<Record>,
    pub page_info: PageInfo,
}

/// Records to delete in one call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    pub data_source_id: String,
    pub table_name: String,
    pub record_ids: Vec<String>,
}

/// A saved, named configuration of filters and columns over one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedView {
    pub id: String,
    pub name: String,
    pub data_source_id: String,
    pub table_name: String,
    #[serde(default)]
    pub filters: FilterGroup,
    #[serde(default)]
    pub column_overrides: ColumnOverrides,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Identifies one column's option set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnKey {
    pub data_source_id: String,
    pub table_name: String,
    pub column: String,
}

impl ColumnKey {
    pub fn new(
        data_source_id: impl Into<String>,
        table_name: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            data_source_id: data_source_id.into(),
            table_name: table_name.into(),
            column: column.into(),
        }
    }
}

#[async_trait]
pub trait ColumnsQuery: Send + Sync {
    /// Ordered columns plus data source capabilities
    async fn fetch_columns(&self, request: &ColumnsRequest) -> ServiceResult<TableSnapshot>;
}

#[async_trait]
pub trait RecordsQuery: Send + Sync {
    async fn fetch_records(&self, request: &RecordsRequest) -> ServiceResult<RecordsPage>;

    /// Returns the number of deleted records. May answer `ServiceError::Rejected`.
    async fn delete_records(&self, request: &BulkDeleteRequest) -> ServiceResult<u64>;
}

#[async_trait]
pub trait ViewStore: Send + Sync {
    async fn get_view(&self, view_id: &str) -> ServiceResult<Option<SavedView>>;

    async fn save_view(&self, view: &SavedView) -> ServiceResult<()>;
}

#[async_trait]
pub trait ColumnOptionsStore: Send + Sync {
    async fn persist_options(&self, column: &ColumnKey, options: &FieldOptions) -> ServiceResult<()>;
}
