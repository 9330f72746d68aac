//! Permission tables and organization overrides

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{AccessError, Action, Grant, Permission, Resource, Result, Role};

/// Current permission table format version
pub const PERMISSION_TABLE_VERSION: u32 = 1;

/// Grants of one role plus the role it inherits from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleEntry {
    pub inherits: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub grants: IndexMap<Permission, Grant>,
}

impl RoleEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inheriting(role: Role) -> Self {
        Self {
            inherits: Some(role),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn grant(mut self, resource: Resource, action: Action, grant: Grant) -> Self {
        self.grants.insert(Permission::new(resource, action), grant);
        self
    }

    pub fn allow(self, resource: Resource, action: Action) -> Self {
        self.grant(resource, action, Grant::Allow)
    }

    pub fn grant_for(&self, permission: &Permission) -> Option<Grant> {
        self.grants.get(permission).copied()
    }
}

/// Static, versioned role → grants mapping loaded at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionTable {
    pub version: u32,
    pub roles: IndexMap<Role, RoleEntry>,
}

impl PermissionTable {
    /// The table used when no custom one is configured
    pub fn builtin() -> Self {
        use Action::*;
        use Resource::*;

        let viewer = RoleEntry::new()
            .with_description("Browse data sources, views and records")
            .allow(DataSource, Read)
            .allow(Table, Read)
            .allow(View, Read)
            .allow(Record, Read)
            .allow(Organization, Read)
            .allow(Member, Read);

        let editor = RoleEntry::inheriting(Role::Viewer)
            .with_description("Create, edit and delete records; manage own views")
            .allow(Record, Create)
            .allow(Record, Update)
            .allow(Record, Delete)
            .grant(View, ManageView, Grant::OwnOnly);

        let admin = RoleEntry::inheriting(Role::Editor)
            .with_description("Manage views, data sources and members")
            .allow(Record, BulkDelete)
            .allow(View, ManageView)
            .allow(View, Delete)
            .allow(Table, Update)
            .allow(DataSource, Create)
            .allow(DataSource, Update)
            .allow(DataSource, Manage)
            .allow(Member, Create)
            .allow(Member, Update)
            .allow(Member, Delete);

        let owner = RoleEntry::inheriting(Role::Admin)
            .with_description("Everything, including the organization itself")
            .allow(DataSource, Delete)
            .allow(Organization, Update)
            .allow(Organization, Delete)
            .allow(Organization, Manage);

        let mut roles = IndexMap::new();
        roles.insert(Role::Owner, owner);
        roles.insert(Role::Admin, admin);
        roles.insert(Role::Editor, editor);
        roles.insert(Role::Viewer, viewer);

        Self {
            version: PERMISSION_TABLE_VERSION,
            roles,
        }
    }

    /// Parse a JSON permission table
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self =
            serde_json::from_str(json).map_err(|e| AccessError::InvalidTable(e.to_string()))?;
        if table.version > PERMISSION_TABLE_VERSION {
            return Err(AccessError::InvalidTable(format!(
                "unsupported permission table version {}",
                table.version
            )));
        }
        Ok(table)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| AccessError::InvalidTable(e.to_string()))
    }

    pub fn role(&self, role: &Role) -> Option<&RoleEntry> {
        self.roles.get(role)
    }
}

impl Default for PermissionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Per-organization additions layered over a base table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrganizationOverrides {
    pub organization_id: String,
    /// Custom roles keyed by name
    pub custom_roles: IndexMap<String, RoleEntry>,
    /// Extra or replaced grants for existing roles
    pub grants: IndexMap<Role, IndexMap<Permission, Grant>>,
}

impl OrganizationOverrides {
    pub fn new(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            ..Self::default()
        }
    }

    pub fn with_custom_role(mut self, name: impl Into<String>, entry: RoleEntry) -> Self {
        self.custom_roles.insert(name.into(), entry);
        self
    }

    pub fn with_grant(mut self, role: Role, permission: Permission, grant: Grant) -> Self {
        self.grants.entry(role).or_default().insert(permission, grant);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AccessError::InvalidTable(e.to_string()))
    }
}

/// A base table with overrides merged in
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivePolicy {
    version: u32,
    organization_id: Option<String>,
    roles: IndexMap<Role, RoleEntry>,
}

impl EffectivePolicy {
    pub fn from_table(table: &PermissionTable) -> Self {
        Self {
            version: table.version,
            organization_id: None,
            roles: table.roles.clone(),
        }
    }

    /// Merge overrides on top of `base`. `base` is left untouched.
    ///
    /// Custom roles may not shadow a built-in role name; such entries are
    /// skipped. Override grants replace same-key grants of the role.
    pub fn merge(base: &PermissionTable, overrides: &OrganizationOverrides) -> Self {
        let mut policy = Self::from_table(base);
        policy.organization_id = Some(overrides.organization_id.clone());

        for (name, entry) in &overrides.custom_roles {
            let role = Role::parse(name);
            if !role.is_custom() {
                tracing::warn!(
                    organization = %overrides.organization_id,
                    role = %name,
                    "custom role shadows a built-in role, skipping"
                );
                continue;
            }
            policy.roles.insert(role, entry.clone());
        }

        for (role, grants) in &overrides.grants {
            let entry = policy.roles.entry(role.clone()).or_default();
            for (permission, grant) in grants {
                entry.grants.insert(*permission, *grant);
            }
        }

        tracing::debug!(
            organization = %overrides.organization_id,
            roles = policy.roles.len(),
            "merged organization overrides"
        );
        policy
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn organization_id(&self) -> Option<&str> {
        self.organization_id.as_deref()
    }

    pub fn role(&self, role: &Role) -> Option<&RoleEntry> {
        self.roles.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.keys()
    }
}
