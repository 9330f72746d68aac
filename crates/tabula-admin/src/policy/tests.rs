//! Tests for the permission model and tables

use super::*;

// ============================================================================
// Role Tests
// ============================================================================

mod role_tests {
    use super::*;

    #[test]
    fn test_parse_builtin_roles() {
        assert_eq!(Role::parse("owner"), Role::Owner);
        assert_eq!(Role::parse("Admin"), Role::Admin);
        assert_eq!(Role::parse("viewer"), Role::Viewer);
    }

    #[test]
    fn test_member_is_editor() {
        assert_eq!(Role::parse("member"), Role::Editor);
    }

    #[test]
    fn test_unknown_role_is_custom() {
        let role = Role::parse("billing");
        assert_eq!(role, Role::Custom("billing".into()));
        assert!(role.is_custom());
        assert_eq!(role.to_string(), "billing");
    }
}

// ============================================================================
// Permission Tests
// ============================================================================

mod permission_tests {
    use super::*;

    #[test]
    fn test_display_and_parse() {
        let permission = Permission::new(Resource::DataSource, Action::BulkDelete);
        assert_eq!(permission.to_string(), "dataSource:bulkDelete");
        assert_eq!("dataSource:bulkDelete".parse::<Permission>().unwrap(), permission);
        assert_eq!("data_source:bulk_delete".parse::<Permission>().unwrap(), permission);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "record".parse::<Permission>(),
            Err(crate::AccessError::InvalidTable(_))
        ));
        assert!("record:fly".parse::<Permission>().is_err());
        assert!("planet:read".parse::<Permission>().is_err());
    }

    #[test]
    fn test_grant_permits() {
        assert!(Grant::Allow.permits(false));
        assert!(!Grant::Deny.permits(true));
        assert!(Grant::OwnOnly.permits(true));
        assert!(!Grant::OwnOnly.permits(false));
    }
}

// ============================================================================
// PermissionTable Tests
// ============================================================================

mod table_tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_chain() {
        let table = PermissionTable::builtin();
        assert_eq!(table.version, PERMISSION_TABLE_VERSION);
        assert_eq!(table.role(&Role::Owner).unwrap().inherits, Some(Role::Admin));
        assert_eq!(table.role(&Role::Admin).unwrap().inherits, Some(Role::Editor));
        assert_eq!(table.role(&Role::Editor).unwrap().inherits, Some(Role::Viewer));
        assert_eq!(table.role(&Role::Viewer).unwrap().inherits, None);
    }

    #[test]
    fn test_json_round_trip() {
        let table = PermissionTable::builtin();
        let json = table.to_json_pretty().unwrap();
        assert_eq!(PermissionTable::from_json(&json).unwrap(), table);
    }

    #[test]
    fn test_from_json() {
        let json = indoc! {r#"
            {
                "version": 1,
                "roles": {
                    "viewer": {"grants": {"record:read": "allow"}},
                    "member": {"inherits": "viewer", "grants": {"record:update": "own_only"}}
                }
            }
        "#};
        let table = PermissionTable::from_json(json).unwrap();
        let editor = table.role(&Role::Editor).unwrap();
        assert_eq!(editor.inherits, Some(Role::Viewer));
        assert_eq!(
            editor.grant_for(&Permission::new(Resource::Record, Action::Update)),
            Some(Grant::OwnOnly)
        );
    }

    #[test]
    fn test_rejects_future_version_and_bad_keys() {
        assert!(PermissionTable::from_json(r#"{"version": 99, "roles": {}}"#).is_err());
        assert!(
            PermissionTable::from_json(
                r#"{"version": 1, "roles": {"viewer": {"grants": {"record": "allow"}}}}"#
            )
            .is_err()
        );
    }
}

// ============================================================================
// Override Tests
// ============================================================================

mod override_tests {
    use super::*;

    #[test]
    fn test_merge_leaves_base_untouched() {
        let base = PermissionTable::builtin();
        let snapshot = base.clone();
        let overrides = OrganizationOverrides::new("org_1")
            .with_grant(
                Role::Viewer,
                Permission::new(Resource::Record, Action::Create),
                Grant::Allow,
            )
            .with_custom_role(
                "auditor",
                RoleEntry::inheriting(Role::Viewer).allow(Resource::Member, Action::Read),
            );

        let policy = EffectivePolicy::merge(&base, &overrides);
        assert_eq!(base, snapshot);
        assert_eq!(policy.organization_id(), Some("org_1"));
        assert!(policy.role(&Role::Custom("auditor".into())).is_some());
        assert_eq!(
            policy
                .role(&Role::Viewer)
                .unwrap()
                .grant_for(&Permission::new(Resource::Record, Action::Create)),
            Some(Grant::Allow)
        );
    }

    #[test]
    fn test_custom_role_cannot_shadow_builtin() {
        let base = PermissionTable::builtin();
        let overrides = OrganizationOverrides::new("org_1")
            .with_custom_role("admin", RoleEntry::new().allow(Resource::Organization, Action::Delete));
        let policy = EffectivePolicy::merge(&base, &overrides);
        assert_eq!(policy.role(&Role::Admin), base.role(&Role::Admin));
    }

    #[test]
    fn test_overrides_from_json() {
        let overrides = OrganizationOverrides::from_json(
            r#"{
                "organizationId": "org_9",
                "customRoles": {"support": {"inherits": "viewer"}},
                "grants": {"editor": {"record:bulkDelete": "allow"}}
            }"#,
        )
        .unwrap();
        assert_eq!(overrides.organization_id, "org_9");
        assert!(overrides.custom_roles.contains_key("support"));
        assert!(overrides.grants.contains_key(&Role::Editor));
    }
}
