//! Saved view creation and editing
//!
//! Both write paths require `manageView` on views. Creating a view always
//! counts as acting on one's own view; editing counts as owning the view
//! only when the actor created it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabula_admin::{AccessContext, AccessControl, Action, Resource, Role};
use tabula_core::ColumnOverrides;
use tabula_filters::{FilterGroup, normalize};
use uuid::Uuid;

use crate::{SavedView, ServiceError, ServiceResult, ViewStore};

/// Fields supplied when creating a view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewView {
    pub name: String,
    pub data_source_id: String,
    pub table_name: String,
    pub filters: FilterGroup,
    pub column_overrides: ColumnOverrides,
}

/// Who is acting on a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }
}

/// Service for saved views
pub struct ViewService {
    store: Arc<dyn ViewStore>,
    access: Arc<AccessControl>,
}

impl ViewService {
    pub fn new(store: Arc<dyn ViewStore>, access: Arc<AccessControl>) -> Self {
        Self { store, access }
    }

    /// Load a view. Never modifies it.
    #[tracing::instrument(skip(self))]
    pub async fn get_view(&self, view_id: &str) -> ServiceResult<SavedView> {
        self.store
            .get_view(view_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("view '{view_id}'")))
    }

    /// Create a view owned by `actor`
    #[tracing::instrument(skip(self, view), fields(name = %view.name))]
    pub async fn create_view(&self, actor: &Actor, view: NewView) -> ServiceResult<SavedView> {
        self.access.authorize(
            &actor.role,
            Resource::View,
            Action::ManageView,
            &AccessContext::owner(),
        )?;

        let name = view.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Rejected("a view needs a name".into()));
        }

        let saved = SavedView {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            data_source_id: view.data_source_id,
            table_name: view.table_name,
            filters: normalize(&view.filters),
            column_overrides: view.column_overrides,
            created_by: Some(actor.user_id.clone()),
        };
        self.store.save_view(&saved).await?;
        tracing::info!(view_id = %saved.id, "view created");
        Ok(saved)
    }

    /// Change a view's name, filters or column overrides
    ///
    /// The view's id, table and creator are kept from the stored view.
    #[tracing::instrument(skip(self, edit))]
    pub async fn update_view(
        &self,
        actor: &Actor,
        view_id: &str,
        edit: impl FnOnce(&mut SavedView) + Send,
    ) -> ServiceResult<SavedView> {
        let existing = self.get_view(view_id).await?;
        let context = AccessContext {
            is_owner: existing.created_by.as_deref() == Some(actor.user_id.as_str()),
        };
        self.access
            .authorize(&actor.role, Resource::View, Action::ManageView, &context)?;

        let mut updated = existing.clone();
        edit(&mut updated);
        updated.id = existing.id;
        updated.data_source_id = existing.data_source_id;
        updated.table_name = existing.table_name;
        updated.created_by = existing.created_by;
        updated.filters = normalize(&updated.filters);

        self.store.save_view(&updated).await?;
        tracing::info!(view_id = %updated.id, "view updated");
        Ok(updated)
    }
}
