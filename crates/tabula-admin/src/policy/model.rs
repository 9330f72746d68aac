//! Roles, resources, actions and grants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::AccessError;

/// A member's role within an organization
///
/// Built-in roles form the chain owner → admin → editor → viewer. Custom
/// roles exist only through organization overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Owner,
    Admin,
    Editor,
    Viewer,
    Custom(String),
}

impl Role {
    /// Built-in roles, most privileged first
    pub const BUILTIN: [Role; 4] = [Role::Owner, Role::Admin, Role::Editor, Role::Viewer];

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            // Organization members edit records
            "editor" | "member" => Self::Editor,
            "viewer" => Self::Viewer,
            _ => Self::Custom(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something an action applies to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Resource {
    #[strum(to_string = "dataSource", serialize = "data_source")]
    DataSource,
    Table,
    View,
    Record,
    Organization,
    Member,
}

/// What a role wants to do
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    #[strum(to_string = "bulkDelete", serialize = "bulk_delete")]
    BulkDelete,
    #[strum(to_string = "manageView", serialize = "manage_view")]
    ManageView,
    Manage,
}

/// Outcome of an explicit grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    Allow,
    Deny,
    /// Allowed only on things the caller owns
    OwnOnly,
}

impl Grant {
    pub fn permits(&self, is_owner: bool) -> bool {
        match self {
            Self::Allow => true,
            Self::Deny => false,
            Self::OwnOnly => is_owner,
        }
    }
}

/// A `(resource, action)` pair, written `resource:action`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource, self.action)
    }
}

impl FromStr for Permission {
    type Err = AccessError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (resource, action) = raw
            .split_once(':')
            .ok_or_else(|| AccessError::InvalidTable(format!("expected resource:action, got '{raw}'")))?;
        let resource = resource
            .trim()
            .parse()
            .map_err(|_| AccessError::InvalidTable(format!("unknown resource '{resource}'")))?;
        let action = action
            .trim()
            .parse()
            .map_err(|_| AccessError::InvalidTable(format!("unknown action '{action}'")))?;
        Ok(Self { resource, action })
    }
}

impl TryFrom<String> for Permission {
    type Error = AccessError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}
