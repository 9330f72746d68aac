//! Which data source, table, view and record a session is looking at

use serde::{Deserialize, Serialize};

use crate::{ColumnsRequest, SavedView};

/// Navigation context of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceContext {
    pub data_source_id: String,
    pub table_name: String,
    pub view_id: Option<String>,
    pub record_id: Option<String>,
}

impl DataSourceContext {
    pub fn new(data_source_id: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            data_source_id: data_source_id.into(),
            table_name: table_name.into(),
            view_id: None,
            record_id: None,
        }
    }

    /// Context of a saved view
    pub fn for_view(view: &SavedView) -> Self {
        Self {
            data_source_id: view.data_source_id.clone(),
            table_name: view.table_name.clone(),
            view_id: Some(view.id.clone()),
            record_id: None,
        }
    }

    /// Navigate to a data source
    ///
    /// Without a table name the previous table is cleared, since it belongs
    /// to the old data source.
    pub fn switch_data_source(&mut self, data_source_id: impl Into<String>, table_name: Option<String>) {
        self.data_source_id = data_source_id.into();
        self.table_name = table_name.unwrap_or_default();
        self.view_id = None;
        self.record_id = None;
    }

    pub fn has_table(&self) -> bool {
        !self.table_name.is_empty()
    }

    /// Index page of the table, or of the view when one is selected
    pub fn table_index_path(&self) -> String {
        match &self.view_id {
            Some(view_id) => format!("/views/{view_id}"),
            None => format!(
                "/data-sources/{}/tables/{}",
                self.data_source_id, self.table_name
            ),
        }
    }

    pub fn records_path(&self) -> String {
        match self.view_id {
            Some(_) => format!("{}/records", self.table_index_path()),
            None => self.table_index_path(),
        }
    }

    pub fn new_record_path(&self) -> String {
        format!("{}/new", self.records_path())
    }

    /// Path of the current record, if one is selected
    pub fn record_path(&self) -> Option<String> {
        self.record_id
            .as_ref()
            .map(|id| format!("{}/{id}", self.records_path()))
    }

    pub fn columns_request(&self) -> ColumnsRequest {
        ColumnsRequest {
            data_source_id: self.data_source_id.clone(),
            table_name: self.table_name.clone(),
            view_id: self.view_id.clone(),
        }
    }
}
