//! Integration tests for RecordsService

mod common;

use common::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tabula_admin::{AccessControl, AccessError, Action, Role};
use tabula_core::{
    CursorPage, DataSourceCapabilities, OffsetPage, PageInfo, PaginationContract, PaginationKind,
};
use tabula_filters::Filter;
use tabula_services::{DataSourceContext, DataSourceSession, RecordsService, ServiceError};

fn session(capabilities: DataSourceCapabilities) -> DataSourceSession {
    DataSourceSession::new(
        DataSourceContext::new("ds1", "users"),
        Arc::new(MockColumns::new(users_snapshot(capabilities))),
    )
}

fn service(records: Arc<MockRecords>) -> RecordsService {
    RecordsService::new(records, Arc::new(AccessControl::builtin()), 24, 100)
}

#[tokio::test]
async fn test_first_page_uses_offset_contract() {
    let records = Arc::new(MockRecords::new().with_record(1, "Ada").with_record(2, "Grace"));
    let service = service(records.clone());
    let session = session(DataSourceCapabilities::offset());

    let page = service.first_page(&session).await.unwrap();
    assert_eq!(page.records.len(), 2);
    assert_eq!(page.page_info, PageInfo::Offset { total: 2 });

    let request = &records.fetches()[0];
    assert_eq!(
        request.pagination,
        PaginationContract::Offset(OffsetPage {
            page: 1,
            page_size: 24
        })
    );
    assert_eq!(request.filters, "");
}

#[tokio::test]
async fn test_cursor_source_gets_cursor_contract() {
    let records = Arc::new(MockRecords::new());
    let service = service(records.clone());
    let session = session(DataSourceCapabilities::cursor());

    service.first_page(&session).await.unwrap();
    assert_eq!(
        records.fetches()[0].pagination.kind(),
        PaginationKind::Cursor
    );

    let offset = PaginationContract::first_page(PaginationKind::Offset, 10);
    assert!(matches!(
        service.fetch_page(&session, offset).await,
        Err(ServiceError::Unsupported(_))
    ));
}

#[tokio::test]
async fn test_page_size_is_clamped() {
    let records = Arc::new(MockRecords::new());
    let service = service(records.clone());
    let session = session(DataSourceCapabilities::cursor());

    let contract = PaginationContract::Cursor(CursorPage {
        cursor: Some("abc".into()),
        page_size: 10_000,
    });
    service.fetch_page(&session, contract).await.unwrap();
    assert_eq!(records.fetches()[0].pagination.page_size(), 100);
}

#[tokio::test]
async fn test_applied_filters_are_sent() {
    let records = Arc::new(MockRecords::new());
    let service = service(records.clone());
    let session = session(DataSourceCapabilities::offset());
    session.filters().push_draft(Filter::eq("name", "Ada"));
    let encoded = session.apply_filters().await.unwrap();

    // Draft edits after applying are not sent
    session.filters().push_draft(Filter::eq("age", 3));
    service.first_page(&session).await.unwrap();

    assert!(encoded.starts_with("f2."));
    assert_eq!(records.fetches()[0].filters, encoded);
}

#[tokio::test]
async fn test_filters_dropped_when_unsupported() {
    let records = Arc::new(MockRecords::new());
    let service = service(records.clone());
    let filtering = session(DataSourceCapabilities::offset());
    filtering.filters().push_draft(Filter::eq("name", "Ada"));
    let encoded = filtering.apply_filters().await.unwrap();

    let no_filters = session(DataSourceCapabilities::offset().with_filters(false));
    assert_eq!(no_filters.load_filters_from_link(&encoded).await.unwrap(), None);
    assert!(!no_filters.filters().current_query().is_empty());

    service.first_page(&no_filters).await.unwrap();
    assert_eq!(records.fetches()[0].filters, "");
}

// ============================================================================
// Bulk delete
// ============================================================================

mod bulk_delete_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_admin_bulk_delete_clears_deleted_from_selection() {
        let records = Arc::new(MockRecords::new());
        let service = service(records.clone());
        let session = session(DataSourceCapabilities::offset());
        session.set_selected(["1", "2", "3"], true);

        let deleted = service
            .bulk_delete(&session, &Role::Admin, vec!["1".into(), "2".into()])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(records.deletes()[0].record_ids, vec!["1", "2"]);
        assert_eq!(session.selected(), vec!["3"]);
    }

    #[tokio::test]
    async fn test_editor_is_denied_before_collaborator() {
        let records = Arc::new(MockRecords::new());
        let service = service(records.clone());
        let session = session(DataSourceCapabilities::offset());

        let err = service
            .bulk_delete(&session, &Role::Editor, vec!["1".into()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Access(AccessError::PermissionDenied {
                action: Action::BulkDelete,
                ..
            })
        ));
        assert!(records.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_rejection_maps_to_permission_denied() {
        let records = Arc::new(MockRecords::new().rejecting_deletes());
        let service = service(records.clone());
        let session = session(DataSourceCapabilities::offset());
        session.set_selected(["1"], true);

        let err = service.delete_selected(&session, &Role::Owner).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Access(AccessError::PermissionDenied { .. })
        ));
        assert_eq!(records.deletes().len(), 1);
        assert_eq!(session.selected(), vec!["1"]);
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_capability() {
        let records = Arc::new(MockRecords::new());
        let service = service(records.clone());
        let session = session(DataSourceCapabilities::cursor());

        assert!(matches!(
            service
                .bulk_delete(&session, &Role::Owner, vec!["1".into()])
                .await,
            Err(ServiceError::Unsupported(_))
        ));
        assert!(records.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_empty_delete_is_a_no_op() {
        let records = Arc::new(MockRecords::new());
        let service = service(records.clone());
        let session = session(DataSourceCapabilities::offset());

        assert_eq!(
            service.bulk_delete(&session, &Role::Viewer, Vec::new()).await.unwrap(),
            0
        );
        assert!(records.deletes().is_empty());
    }
}
