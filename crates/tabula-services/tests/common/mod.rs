//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::Arc;
use tabula_core::{
    Column, DataSourceCapabilities, FieldOptions, PageInfo, PrimitiveType, TableSnapshot, Value,
};
use tabula_services::{
    BulkDeleteRequest, ColumnKey, ColumnOptionsStore, ColumnsQuery, ColumnsRequest, Record,
    RecordsPage, RecordsQuery, RecordsRequest, SavedView, ServiceError, ServiceResult, ViewStore,
};

/// Columns of a small `users` table
pub fn users_columns() -> Vec<Column> {
    vec![
        Column::new("id", PrimitiveType::Integer)
            .primary_key()
            .with_field_type("id"),
        Column::new("name", PrimitiveType::String),
        Column::new("age", PrimitiveType::Integer).with_field_type("number"),
        Column::new("website", PrimitiveType::String)
            .with_option("displayAs", serde_json::json!("link")),
    ]
}

pub fn users_snapshot(capabilities: DataSourceCapabilities) -> TableSnapshot {
    TableSnapshot {
        columns: users_columns(),
        capabilities,
    }
}

/// Mock columns collaborator returning one fixed snapshot
pub struct MockColumns {
    pub snapshot: TableSnapshot,
    pub should_fail: bool,
    /// Log of every request, for assertion in tests
    pub requests: Arc<parking_lot::Mutex<Vec<ColumnsRequest>>>,
}

impl MockColumns {
    pub fn new(snapshot: TableSnapshot) -> Self {
        Self {
            snapshot,
            should_fail: false,
            requests: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn offset() -> Self {
        Self::new(users_snapshot(DataSourceCapabilities::offset()))
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<ColumnsRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ColumnsQuery for MockColumns {
    async fn fetch_columns(&self, request: &ColumnsRequest) -> ServiceResult<TableSnapshot> {
        self.requests.lock().push(request.clone());
        if self.should_fail {
            return Err(ServiceError::Collaborator("columns unavailable".into()));
        }
        Ok(self.snapshot.clone())
    }
}

/// Mock records collaborator
pub struct MockRecords {
    pub records: Vec<Record>,
    pub total: u64,
    /// Reject deletes the way a data source enforcing its own ACL would
    pub reject_deletes: bool,
    pub fetches: Arc<parking_lot::Mutex<Vec<RecordsRequest>>>,
    pub deletes: Arc<parking_lot::Mutex<Vec<BulkDeleteRequest>>>,
}

impl MockRecords {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
            reject_deletes: false,
            fetches: Arc::new(parking_lot::Mutex::new(Vec::new())),
            deletes: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_record(mut self, id: i64, name: &str) -> Self {
        let mut record = IndexMap::new();
        record.insert("id".to_string(), Value::Int(id));
        record.insert("name".to_string(), Value::from(name));
        self.records.push(record);
        self.total += 1;
        self
    }

    pub fn rejecting_deletes(mut self) -> Self {
        self.reject_deletes = true;
        self
    }

    pub fn fetches(&self) -> Vec<RecordsRequest> {
        self.fetches.lock().clone()
    }

    pub fn deletes(&self) -> Vec<BulkDeleteRequest> {
        self.deletes.lock().clone()
    }
}

#[async_trait]
impl RecordsQuery for MockRecords {
    async fn fetch_records(&self, request: &RecordsRequest) -> ServiceResult<RecordsPage> {
        self.fetches.lock().push(request.clone());
        let page_info = match request.pagination.kind() {
            tabula_core::PaginationKind::Offset => PageInfo::Offset { total: self.total },
            tabula_core::PaginationKind::Cursor => PageInfo::Cursor {
                next: None,
                previous: None,
            },
        };
        Ok(RecordsPage {
            records: self.records.clone(),
            page_info,
        })
    }

    async fn delete_records(&self, request: &BulkDeleteRequest) -> ServiceResult<u64> {
        self.deletes.lock().push(request.clone());
        if self.reject_deletes {
            return Err(ServiceError::Rejected("not allowed".into()));
        }
        Ok(request.record_ids.len() as u64)
    }
}

/// In-memory view store
pub struct MockViews {
    pub views: Arc<parking_lot::Mutex<IndexMap<String, SavedView>>>,
    pub saves: Arc<parking_lot::Mutex<usize>>,
}

impl MockViews {
    pub fn new() -> Self {
        Self {
            views: Arc::new(parking_lot::Mutex::new(IndexMap::new())),
            saves: Arc::new(parking_lot::Mutex::new(0)),
        }
    }

    pub fn with_view(self, view: SavedView) -> Self {
        self.views.lock().insert(view.id.clone(), view);
        self
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }

    pub fn stored(&self, id: &str) -> Option<SavedView> {
        self.views.lock().get(id).cloned()
    }
}

#[async_trait]
impl ViewStore for MockViews {
    async fn get_view(&self, view_id: &str) -> ServiceResult<Option<SavedView>> {
        Ok(self.views.lock().get(view_id).cloned())
    }

    async fn save_view(&self, view: &SavedView) -> ServiceResult<()> {
        *self.saves.lock() += 1;
        self.views.lock().insert(view.id.clone(), view.clone());
        Ok(())
    }
}

/// Option store recording every persist call
pub struct MockOptionStore {
    pub should_fail: bool,
    pub calls: Arc<parking_lot::Mutex<Vec<(ColumnKey, FieldOptions)>>>,
}

impl MockOptionStore {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            calls: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> Vec<(ColumnKey, FieldOptions)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ColumnOptionsStore for MockOptionStore {
    async fn persist_options(&self, column: &ColumnKey, options: &FieldOptions) -> ServiceResult<()> {
        self.calls.lock().push((column.clone(), options.clone()));
        if self.should_fail {
            return Err(ServiceError::Collaborator("options store offline".into()));
        }
        Ok(())
    }
}

/// A saved view over `users`
pub fn users_view(id: &str, created_by: &str) -> SavedView {
    SavedView {
        id: id.to_string(),
        name: "Adults".to_string(),
        data_source_id: "ds1".to_string(),
        table_name: "users".to_string(),
        filters: Default::default(),
        column_overrides: Default::default(),
        created_by: Some(created_by.to_string()),
    }
}

/// Options as a map, from a JSON object literal
pub fn options(value: serde_json::Value) -> FieldOptions {
    value.as_object().cloned().unwrap_or_default()
}
