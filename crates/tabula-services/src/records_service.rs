//! Record paging and bulk deletes

use std::sync::Arc;

use tabula_admin::{AccessContext, AccessControl, AccessError, Action, Resource, Role};
use tabula_core::{PaginationContract, PaginationKind};
use tabula_settings::RecordSettings;

use crate::{
    BulkDeleteRequest, DataSourceSession, RecordsPage, RecordsQuery, RecordsRequest,
    ServiceError, ServiceResult,
};

/// Service for record-level operations
///
/// Handles:
/// - Paged fetches with the session's filters and paging strategy
/// - Authorized bulk deletes
pub struct RecordsService {
    records: Arc<dyn RecordsQuery>,
    access: Arc<AccessControl>,
    default_page_size: u64,
    max_page_size: u64,
}

impl RecordsService {
    /// Create a new records service
    ///
    /// # Arguments
    ///
    /// * `records` - Records collaborator
    /// * `access` - Access control used on write paths
    /// * `default_page_size` - Page size of the first page when none is requested
    /// * `max_page_size` - Larger requested pages are clamped to this
    pub fn new(
        records: Arc<dyn RecordsQuery>,
        access: Arc<AccessControl>,
        default_page_size: u64,
        max_page_size: u64,
    ) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            records,
            access,
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    /// Create a records service with the configured paging limits
    pub fn from_settings(
        records: Arc<dyn RecordsQuery>,
        access: Arc<AccessControl>,
        settings: &RecordSettings,
    ) -> Self {
        Self::new(records, access, settings.default_page_size, settings.max_page_size)
    }

    /// The first page for the session's table, using its paging strategy
    pub async fn first_page(&self, session: &DataSourceSession) -> ServiceResult<RecordsPage> {
        let capabilities = session.capabilities().await?;
        let contract = PaginationContract::for_capabilities(&capabilities, self.default_page_size);
        self.fetch_page(session, contract).await
    }

    /// Fetch one page of records
    ///
    /// Sends the session's applied filters, or none when the data source
    /// can't filter. The contract must match the data source's paging
    /// strategy.
    #[tracing::instrument(skip(self, session))]
    pub async fn fetch_page(
        &self,
        session: &DataSourceSession,
        contract: PaginationContract,
    ) -> ServiceResult<RecordsPage> {
        let capabilities = session.capabilities().await?;
        let expected = capabilities.pagination_kind();
        if contract.kind() != expected {
            return Err(ServiceError::Unsupported(match contract.kind() {
                PaginationKind::Offset => "offset pagination",
                PaginationKind::Cursor => "cursor pagination",
            }));
        }

        let filters = if capabilities.supports_filters {
            session.query_filters()?
        } else {
            if !session.filters().current_query().is_empty() {
                tracing::warn!("data source does not support filters, ignoring applied filters");
            }
            String::new()
        };

        let context = session.context();
        let request = RecordsRequest {
            data_source_id: context.data_source_id,
            table_name: context.table_name,
            filters,
            pagination: self.clamp(contract),
        };

        tracing::debug!(
            data_source = %request.data_source_id,
            table = %request.table_name,
            page_size = request.pagination.page_size(),
            "fetching records"
        );
        self.records.fetch_records(&request).await
    }

    fn clamp(&self, mut contract: PaginationContract) -> PaginationContract {
        let max = self.max_page_size;
        match &mut contract {
            PaginationContract::Offset(page) => page.page_size = page.page_size.clamp(1, max),
            PaginationContract::Cursor(page) => page.page_size = page.page_size.clamp(1, max),
        }
        contract
    }

    /// Delete records by id
    ///
    /// Requires bulk-delete support and the `bulkDelete` permission. A
    /// rejection from the data source surfaces as `PermissionDenied`.
    /// Deleted ids are removed from the session's selection.
    #[tracing::instrument(skip(self, session, record_ids), fields(count = record_ids.len()))]
    pub async fn bulk_delete(
        &self,
        session: &DataSourceSession,
        role: &Role,
        record_ids: Vec<String>,
    ) -> ServiceResult<u64> {
        if record_ids.is_empty() {
            return Ok(0);
        }

        let capabilities = session.capabilities().await?;
        if !capabilities.supports_bulk_delete {
            return Err(ServiceError::Unsupported("bulk delete"));
        }
        self.access.authorize(
            role,
            Resource::Record,
            Action::BulkDelete,
            &AccessContext::default(),
        )?;

        let context = session.context();
        let request = BulkDeleteRequest {
            data_source_id: context.data_source_id,
            table_name: context.table_name,
            record_ids,
        };

        let deleted = match self.records.delete_records(&request).await {
            Ok(deleted) => deleted,
            Err(ServiceError::Rejected(reason)) => {
                tracing::warn!(role = %role, reason = %reason, "data source rejected bulk delete");
                return Err(AccessError::PermissionDenied {
                    role: role.clone(),
                    resource: Resource::Record,
                    action: Action::BulkDelete,
                }
                .into());
            }
            Err(err) => return Err(err),
        };

        tracing::info!(deleted, "bulk delete complete");
        session.set_selected(request.record_ids, false);
        Ok(deleted)
    }

    /// Delete every selected record of the session
    pub async fn delete_selected(
        &self,
        session: &DataSourceSession,
        role: &Role,
    ) -> ServiceResult<u64> {
        self.bulk_delete(session, role, session.selected()).await
    }
}
