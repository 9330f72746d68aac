//! Per-UI-session state for one data source
//!
//! A session tracks where the user is (data source, table, view, record),
//! caches the table's columns and capabilities, and owns the filter,
//! selection and sidebar state. Navigating to another table or view
//! discards everything derived from the previous one.

use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use tabula_core::{
    Column, DataSourceCapabilities, FieldOptions, TableSnapshot, UiContext, resolve_columns,
};
use tabula_fields::FieldTypeRegistry;
use tabula_filters::{FilterError, FilterGroup, FilterNode, FilterState, encode, normalize};
use tabula_settings::FilterSettings;

use crate::{
    ColumnKey, ColumnsQuery, DataSourceContext, OptionPersister, SavedView, ServiceError,
    ServiceResult,
};

struct Navigation {
    context: DataSourceContext,
    view: Option<Arc<SavedView>>,
    snapshot: Option<Arc<TableSnapshot>>,
    /// Bumped on every context switch so stale fetches are not cached
    generation: u64,
}

impl Navigation {
    fn switch(&mut self, context: DataSourceContext, view: Option<Arc<SavedView>>) {
        self.context = context;
        self.view = view;
        self.snapshot = None;
        self.generation += 1;
    }
}

/// State of one UI session browsing a data source
pub struct DataSourceSession {
    navigation: RwLock<Navigation>,
    columns_query: Arc<dyn ColumnsQuery>,
    field_types: Arc<FieldTypeRegistry>,
    filters: FilterState,
    selection: RwLock<IndexSet<String>>,
    sidebar_open: RwLock<bool>,
    option_persister: Option<OptionPersister>,
}

impl std::fmt::Debug for DataSourceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceSession")
            .field("context", &self.navigation.read().context)
            .field("filters", &self.filters)
            .field("selected", &self.selection.read().len())
            .finish_non_exhaustive()
    }
}

impl DataSourceSession {
    pub fn new(context: DataSourceContext, columns_query: Arc<dyn ColumnsQuery>) -> Self {
        Self {
            navigation: RwLock::new(Navigation {
                context,
                view: None,
                snapshot: None,
                generation: 0,
            }),
            columns_query,
            field_types: tabula_fields::global_shared(),
            filters: FilterState::new(),
            selection: RwLock::new(IndexSet::new()),
            sidebar_open: RwLock::new(true),
            option_persister: None,
        }
    }

    pub fn with_filter_state(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self
    }

    /// Use the configured limit for encoded filters
    pub fn with_filter_settings(self, settings: &FilterSettings) -> Self {
        self.with_filter_state(settings.filter_state())
    }

    pub fn with_field_types(mut self, field_types: Arc<FieldTypeRegistry>) -> Self {
        self.field_types = field_types;
        self
    }

    pub fn with_option_persister(mut self, persister: OptionPersister) -> Self {
        self.option_persister = Some(persister);
        self
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn context(&self) -> DataSourceContext {
        self.navigation.read().context.clone()
    }

    /// The saved view being shown, if any
    pub fn view(&self) -> Option<Arc<SavedView>> {
        self.navigation.read().view.clone()
    }

    /// Go to a data source. Without a table name no table is selected.
    pub fn switch_data_source(&self, data_source_id: impl Into<String>, table_name: Option<String>) {
        let mut context = self.context();
        context.switch_data_source(data_source_id, table_name);
        self.enter(context, None);
    }

    /// Go to a table of the current data source
    pub fn select_table(&self, table_name: impl Into<String>) {
        let context = self.context();
        let context = DataSourceContext::new(context.data_source_id, table_name);
        self.enter(context, None);
    }

    /// Show a saved view; its data source and table become current
    pub fn open_view(&self, view: SavedView) {
        let context = DataSourceContext::for_view(&view);
        self.enter(context, Some(Arc::new(view)));
    }

    /// Leave the current view for its underlying table
    pub fn close_view(&self) {
        let context = self.context();
        if context.view_id.is_none() {
            return;
        }
        self.enter(
            DataSourceContext::new(context.data_source_id, context.table_name),
            None,
        );
    }

    /// Select or clear the record being shown or edited
    pub fn select_record(&self, record_id: Option<String>) {
        self.navigation.write().context.record_id = record_id;
    }

    fn enter(&self, context: DataSourceContext, view: Option<Arc<SavedView>>) {
        tracing::info!(
            data_source = %context.data_source_id,
            table = %context.table_name,
            view = ?context.view_id,
            "switching session context"
        );
        if let Some(persister) = &self.option_persister {
            if let Err(err) = persister.request_flush() {
                tracing::warn!(error = %err, "pending column options were not flushed");
            }
        }
        self.navigation.write().switch(context, view);
        self.filters.reset();
        self.reset_selection();
    }

    // =========================================================================
    // Columns and capabilities
    // =========================================================================

    /// Columns and capabilities of the current table, fetched once per context
    #[tracing::instrument(skip(self))]
    pub async fn snapshot(&self) -> ServiceResult<Arc<TableSnapshot>> {
        let (request, generation) = {
            let navigation = self.navigation.read();
            if let Some(snapshot) = &navigation.snapshot {
                return Ok(snapshot.clone());
            }
            (navigation.context.columns_request(), navigation.generation)
        };

        if request.table_name.is_empty() {
            return Err(ServiceError::NotFound("no table selected".into()));
        }

        tracing::debug!(
            data_source = %request.data_source_id,
            table = %request.table_name,
            "fetching columns"
        );
        let snapshot = Arc::new(self.columns_query.fetch_columns(&request).await?);

        let mut navigation = self.navigation.write();
        if navigation.generation == generation {
            navigation.snapshot = Some(snapshot.clone());
        } else {
            tracing::debug!("context changed during column fetch, not caching");
        }
        Ok(snapshot)
    }

    /// Drop the cached snapshot so the next read refetches
    pub fn invalidate(&self) {
        self.navigation.write().snapshot = None;
    }

    /// Refetch columns and capabilities
    pub async fn refresh(&self) -> ServiceResult<Arc<TableSnapshot>> {
        self.invalidate();
        self.snapshot().await
    }

    pub async fn capabilities(&self) -> ServiceResult<DataSourceCapabilities> {
        Ok(self.snapshot().await?.capabilities.clone())
    }

    /// Columns shown in `ui`, with view overrides and unsaved option edits applied
    pub async fn visible_columns(&self, ui: UiContext) -> ServiceResult<Vec<Column>> {
        let snapshot = self.snapshot().await?;
        let view = self.view();
        let overrides = view.as_ref().map(|v| &v.column_overrides);
        let mut columns = resolve_columns(&snapshot.columns, ui, overrides);

        if let Some(persister) = &self.option_persister {
            let context = self.context();
            for column in &mut columns {
                let key = ColumnKey::new(&context.data_source_id, &context.table_name, &column.name);
                if let Some(options) = persister.current(&key) {
                    column.field_options = options;
                }
            }
        }
        Ok(columns)
    }

    pub fn field_types(&self) -> &FieldTypeRegistry {
        &self.field_types
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Validate and apply the draft filters. Returns the new encoding.
    pub async fn apply_filters(&self) -> ServiceResult<String> {
        let snapshot = self.snapshot().await?;
        if !snapshot.capabilities.supports_filters {
            return Err(ServiceError::Unsupported("filtering"));
        }
        Ok(self.filters.apply(&snapshot.columns)?)
    }

    /// Take filters from a shared link
    ///
    /// Bad links reset the filters and hand back the reason as a notice.
    pub async fn load_filters_from_link(&self, encoded: &str) -> ServiceResult<Option<FilterError>> {
        let snapshot = self.snapshot().await?;
        Ok(self.filters.load_from_link(encoded, &snapshot.columns))
    }

    /// Clear draft and applied filters
    pub fn reset_filters(&self) {
        self.filters.reset();
    }

    /// Encoded filters for the records collaborator
    ///
    /// A view's saved filters always apply; the user's applied filters are
    /// ANDed on top of them.
    pub fn query_filters(&self) -> ServiceResult<String> {
        let applied = self.filters.current_query();
        let view_filters = self
            .view()
            .map(|view| normalize(&view.filters))
            .filter(|tree| !tree.is_empty());

        match view_filters {
            None => Ok(applied.encoded),
            Some(base) if applied.is_empty() => Ok(encode(&base)?),
            Some(base) => {
                let combined =
                    FilterGroup::and([FilterNode::from(base), FilterNode::from(applied.tree)]);
                Ok(encode(&combined)?)
            }
        }
    }

    // =========================================================================
    // Record selection
    // =========================================================================

    /// Flip one record's selection. Returns whether it is now selected.
    pub fn toggle_record(&self, record_id: impl Into<String>) -> bool {
        let record_id = record_id.into();
        let mut selection = self.selection.write();
        if selection.shift_remove(&record_id) {
            false
        } else {
            selection.insert(record_id);
            true
        }
    }

    /// Select or deselect many records at once
    pub fn set_selected<I, S>(&self, record_ids: I, selected: bool)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = self.selection.write();
        for id in record_ids {
            let id = id.into();
            if selected {
                selection.insert(id);
            } else {
                selection.shift_remove(&id);
            }
        }
    }

    pub fn reset_selection(&self) {
        self.selection.write().clear();
    }

    /// Selected record ids, in selection order
    pub fn selected(&self) -> Vec<String> {
        self.selection.read().iter().cloned().collect()
    }

    pub fn is_selected(&self, record_id: &str) -> bool {
        self.selection.read().contains(record_id)
    }

    // =========================================================================
    // Sidebar
    // =========================================================================

    pub fn is_sidebar_open(&self) -> bool {
        *self.sidebar_open.read()
    }

    pub fn set_sidebar_open(&self, open: bool) {
        *self.sidebar_open.write() = open;
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut open = self.sidebar_open.write();
        *open = !*open;
        *open
    }

    // =========================================================================
    // Column options
    // =========================================================================

    fn column_key(&self, column: &str) -> ColumnKey {
        let context = self.context();
        ColumnKey::new(context.data_source_id, context.table_name, column)
    }

    /// Edit a column's display options
    ///
    /// Options are type-checked against the column's field type. The visible
    /// subset is cached immediately and persisted once edits go quiet.
    pub async fn update_column_options(
        &self,
        column: &str,
        options: FieldOptions,
    ) -> ServiceResult<FieldOptions> {
        let Some(persister) = &self.option_persister else {
            return Err(ServiceError::Unsupported("column option persistence"));
        };
        let snapshot = self.snapshot().await?;
        let source = snapshot
            .column(column)
            .ok_or_else(|| ServiceError::NotFound(format!("column '{column}'")))?;

        let descriptor = self.field_types.descriptor_for(source);
        for (key, value) in &options {
            if let Some(spec) = descriptor.option_spec(key) {
                spec.check(value)?;
            }
        }

        let persistable = descriptor.persistable_options(&options);
        persister.submit(self.column_key(column), persistable.clone())?;
        Ok(persistable)
    }

    /// Options currently in effect for a column, including unsaved edits
    pub fn current_column_options(&self, column: &str) -> Option<FieldOptions> {
        if let Some(options) = self
            .option_persister
            .as_ref()
            .and_then(|p| p.current(&self.column_key(column)))
        {
            return Some(options);
        }
        let navigation = self.navigation.read();
        navigation
            .snapshot
            .as_ref()
            .and_then(|s| s.column(column))
            .map(|c| c.field_options.clone())
    }

    /// Tear down the session, persisting pending option edits
    pub async fn close(&self) -> ServiceResult<()> {
        tracing::debug!("closing session");
        self.reset_selection();
        match &self.option_persister {
            Some(persister) => persister.flush().await,
            None => Ok(()),
        }
    }
}
