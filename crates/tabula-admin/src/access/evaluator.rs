use std::collections::HashSet;

use crate::{
    AccessError, Action, EffectivePolicy, OrganizationOverrides, Permission, PermissionTable,
    Resource, Result, Role,
};

/// Facts about the target of an action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessContext {
    /// The caller created/owns the target
    pub is_owner: bool,
}

impl AccessContext {
    pub fn owner() -> Self {
        Self { is_owner: true }
    }
}

/// Resolves `(role, resource, action, context)` to allow/deny
#[derive(Debug, Clone)]
pub struct AccessControl {
    policy: EffectivePolicy,
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AccessControl {
    pub fn new(table: &PermissionTable) -> Self {
        Self {
            policy: EffectivePolicy::from_table(table),
        }
    }

    pub fn builtin() -> Self {
        Self::new(&PermissionTable::builtin())
    }

    pub fn with_overrides(table: &PermissionTable, overrides: &OrganizationOverrides) -> Self {
        Self {
            policy: EffectivePolicy::merge(table, overrides),
        }
    }

    pub fn policy(&self) -> &EffectivePolicy {
        &self.policy
    }

    /// Decide whether `role` may perform `action` on `resource`
    ///
    /// The first explicit grant along the role's inheritance chain wins.
    /// Unknown roles, missing grants and inheritance cycles all deny.
    pub fn evaluate(
        &self,
        role: &Role,
        resource: Resource,
        action: Action,
        context: &AccessContext,
    ) -> bool {
        let permission = Permission::new(resource, action);
        let mut visited: HashSet<&Role> = HashSet::new();
        let mut current = role;

        loop {
            if !visited.insert(current) {
                tracing::warn!(role = %role, at = %current, "role inheritance cycle, denying");
                return false;
            }
            let Some(entry) = self.policy.role(current) else {
                return false;
            };
            if let Some(grant) = entry.grant_for(&permission) {
                return grant.permits(context.is_owner);
            }
            match &entry.inherits {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// `evaluate` with no ownership information
    pub fn can(&self, role: &Role, resource: Resource, action: Action) -> bool {
        self.evaluate(role, resource, action, &AccessContext::default())
    }

    /// Write-path check: deny becomes `PermissionDenied`
    pub fn authorize(
        &self,
        role: &Role,
        resource: Resource,
        action: Action,
        context: &AccessContext,
    ) -> Result<()> {
        if self.evaluate(role, resource, action, context) {
            Ok(())
        } else {
            tracing::debug!(role = %role, %resource, %action, "permission denied");
            Err(AccessError::PermissionDenied {
                role: role.clone(),
                resource,
                action,
            })
        }
    }
}
