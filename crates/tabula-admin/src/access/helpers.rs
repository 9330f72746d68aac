use tabula_core::DataSourceCapabilities;

use crate::{AccessContext, AccessControl, Action, Resource, Role};

/// Named permission checks for one role on one data source
///
/// Each method is a projection of [`AccessControl::evaluate`], optionally
/// combined with a declared capability of the data source.
#[derive(Debug, Clone)]
pub struct AclHelpers<'a> {
    access: &'a AccessControl,
    role: Role,
    capabilities: &'a DataSourceCapabilities,
    view_id: Option<String>,
    context: AccessContext,
}

impl<'a> AclHelpers<'a> {
    pub fn new(
        access: &'a AccessControl,
        role: Role,
        capabilities: &'a DataSourceCapabilities,
        view_id: Option<String>,
    ) -> Self {
        Self {
            access,
            role,
            capabilities,
            view_id,
            context: AccessContext::default(),
        }
    }

    /// Ownership of the current view/record
    pub fn with_context(mut self, context: AccessContext) -> Self {
        self.context = context;
        self
    }

    fn allows(&self, resource: Resource, action: Action) -> bool {
        self.access
            .evaluate(&self.role, resource, action, &self.context)
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn can_read(&self) -> bool {
        self.allows(Resource::Record, Action::Read)
    }

    pub fn can_create(&self) -> bool {
        self.allows(Resource::Record, Action::Create)
    }

    pub fn can_edit(&self) -> bool {
        self.allows(Resource::Record, Action::Update)
    }

    pub fn can_delete(&self) -> bool {
        self.allows(Resource::Record, Action::Delete)
    }

    /// Also requires the data source to support bulk deletes
    pub fn can_bulk_delete(&self) -> bool {
        self.capabilities.supports_bulk_delete && self.allows(Resource::Record, Action::BulkDelete)
    }

    /// The creator of a view owns it
    pub fn can_create_view(&self) -> bool {
        self.access.evaluate(
            &self.role,
            Resource::View,
            Action::ManageView,
            &AccessContext::owner(),
        )
    }

    /// Only meaningful while a view is selected
    pub fn can_edit_view(&self) -> bool {
        self.view_id.is_some() && self.allows(Resource::View, Action::ManageView)
    }

    pub fn can_manage_data_sources(&self) -> bool {
        self.allows(Resource::DataSource, Action::Manage)
    }

    /// Filtering is a capability of the data source, not a permission
    pub fn can_filter(&self) -> bool {
        self.capabilities.supports_filters
    }
}
