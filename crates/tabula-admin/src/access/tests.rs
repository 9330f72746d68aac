//! Tests for access control evaluation

use super::*;
use crate::{Action, Grant, OrganizationOverrides, Permission, PermissionTable, Resource, Role, RoleEntry};
use strum::IntoEnumIterator;
use tabula_core::DataSourceCapabilities;

fn all_pairs() -> Vec<(Resource, Action)> {
    Resource::iter()
        .flat_map(|resource| Action::iter().map(move |action| (resource, action)))
        .collect()
}

// ============================================================================
// Evaluator Tests
// ============================================================================

mod evaluator_tests {
    use super::*;

    #[test]
    fn test_viewer_cannot_delete_records() {
        let access = AccessControl::builtin();
        assert!(!access.can(&Role::Viewer, Resource::Record, Action::Delete));
    }

    #[test]
    fn test_editor_reads_through_inheritance() {
        let access = AccessControl::builtin();
        assert!(access.can(&Role::Editor, Resource::Record, Action::Read));
        let editor = access.policy().role(&Role::Editor).unwrap();
        assert!(editor
            .grant_for(&Permission::new(Resource::Record, Action::Read))
            .is_none());
    }

    #[test]
    fn test_unknown_role_denies_everything() {
        let access = AccessControl::builtin();
        let ghost = Role::Custom("ghost".into());
        for (resource, action) in all_pairs() {
            assert!(!access.can(&ghost, resource, action));
        }
    }

    #[test]
    fn test_fail_closed_without_grants() {
        let mut table = PermissionTable::builtin();
        table.roles.clear();
        table.roles.insert(Role::Viewer, RoleEntry::new());
        let access = AccessControl::new(&table);
        for role in Role::BUILTIN {
            for (resource, action) in all_pairs() {
                assert!(!access.can(&role, resource, action));
            }
        }
    }

    #[test]
    fn test_inheritance_monotonicity() {
        let access = AccessControl::builtin();
        let chain = [Role::Owner, Role::Admin, Role::Editor, Role::Viewer];
        for pair in chain.windows(2) {
            let (child, parent) = (&pair[0], &pair[1]);
            for (resource, action) in all_pairs() {
                for ctx in [AccessContext::default(), AccessContext::owner()] {
                    if access.evaluate(parent, resource, action, &ctx) {
                        assert!(
                            access.evaluate(child, resource, action, &ctx),
                            "{child} lost {resource}:{action} granted to {parent}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_own_only_grant() {
        let access = AccessControl::builtin();
        assert!(!access.can(&Role::Editor, Resource::View, Action::ManageView));
        assert!(access.evaluate(
            &Role::Editor,
            Resource::View,
            Action::ManageView,
            &AccessContext::owner()
        ));
        assert!(access.can(&Role::Admin, Resource::View, Action::ManageView));
    }

    #[test]
    fn test_explicit_deny_wins_over_parent() {
        let overrides = OrganizationOverrides::new("org").with_grant(
            Role::Admin,
            Permission::new(Resource::Record, Action::Delete),
            Grant::Deny,
        );
        let access = AccessControl::with_overrides(&PermissionTable::builtin(), &overrides);
        assert!(!access.can(&Role::Admin, Resource::Record, Action::Delete));
        assert!(access.can(&Role::Editor, Resource::Record, Action::Delete));
    }

    #[test]
    fn test_inheritance_cycle_denies() {
        let mut table = PermissionTable::builtin();
        table.roles.clear();
        table
            .roles
            .insert(Role::Custom("a".into()), RoleEntry::inheriting(Role::Custom("b".into())));
        table
            .roles
            .insert(Role::Custom("b".into()), RoleEntry::inheriting(Role::Custom("a".into())));
        let access = AccessControl::new(&table);
        assert!(!access.can(&Role::Custom("a".into()), Resource::Record, Action::Read));
    }

    #[test]
    fn test_custom_role_from_overrides() {
        let overrides = OrganizationOverrides::new("org").with_custom_role(
            "auditor",
            RoleEntry::inheriting(Role::Viewer).allow(Resource::Member, Action::Manage),
        );
        let access = AccessControl::with_overrides(&PermissionTable::builtin(), &overrides);
        let auditor = Role::parse("auditor");
        assert!(access.can(&auditor, Resource::Member, Action::Manage));
        assert!(access.can(&auditor, Resource::Record, Action::Read));
        assert!(!access.can(&auditor, Resource::Record, Action::Update));
    }

    #[test]
    fn test_authorize() {
        let access = AccessControl::builtin();
        assert!(access
            .authorize(&Role::Admin, Resource::Record, Action::BulkDelete, &AccessContext::default())
            .is_ok());
        let err = access
            .authorize(&Role::Viewer, Resource::Record, Action::BulkDelete, &AccessContext::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Not permitted: viewer may not bulkDelete record");
        let core: tabula_core::TabulaError = err.into();
        assert!(matches!(core, tabula_core::TabulaError::PermissionDenied { .. }));
    }
}

// ============================================================================
// AclHelpers Tests
// ============================================================================

mod helper_tests {
    use super::*;

    #[test]
    fn test_helpers_match_evaluator() {
        let access = AccessControl::builtin();
        let caps = DataSourceCapabilities::offset();
        for role in Role::BUILTIN {
            let acl = AclHelpers::new(&access, role.clone(), &caps, Some("view_1".into()));
            assert_eq!(acl.can_create(), access.can(&role, Resource::Record, Action::Create));
            assert_eq!(acl.can_edit(), access.can(&role, Resource::Record, Action::Update));
            assert_eq!(acl.can_delete(), access.can(&role, Resource::Record, Action::Delete));
            assert_eq!(
                acl.can_bulk_delete(),
                access.can(&role, Resource::Record, Action::BulkDelete)
            );
            assert_eq!(
                acl.can_manage_data_sources(),
                access.can(&role, Resource::DataSource, Action::Manage)
            );
        }
    }

    #[test]
    fn test_bulk_delete_needs_capability() {
        let access = AccessControl::builtin();
        let caps = DataSourceCapabilities::cursor();
        let acl = AclHelpers::new(&access, Role::Owner, &caps, None);
        assert!(!acl.can_bulk_delete());
    }

    #[test]
    fn test_edit_view_needs_a_view() {
        let access = AccessControl::builtin();
        let caps = DataSourceCapabilities::offset();
        assert!(!AclHelpers::new(&access, Role::Admin, &caps, None).can_edit_view());
        assert!(AclHelpers::new(&access, Role::Admin, &caps, Some("v".into())).can_edit_view());
    }

    #[test]
    fn test_editor_views() {
        let access = AccessControl::builtin();
        let caps = DataSourceCapabilities::offset();
        let acl = AclHelpers::new(&access, Role::Editor, &caps, Some("v".into()));
        assert!(acl.can_create_view());
        assert!(!acl.can_edit_view());
        assert!(acl.with_context(AccessContext::owner()).can_edit_view());

        let viewer = AclHelpers::new(&access, Role::Viewer, &caps, None);
        assert!(!viewer.can_create_view());
    }

    #[test]
    fn test_filter_is_capability_only() {
        let access = AccessControl::builtin();
        let caps = DataSourceCapabilities::offset().with_filters(false);
        assert!(!AclHelpers::new(&access, Role::Owner, &caps, None).can_filter());
    }
}
