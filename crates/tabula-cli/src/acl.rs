//! `tabula acl` subcommands

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Subcommand};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use strum::IntoEnumIterator;
use tabula_admin::{AccessContext, AccessControl, Action, Resource, Role};
use tabula_settings::TabulaSettings;

#[derive(Subcommand, Debug)]
pub enum AclCommand {
    /// Decide one (role, resource, action)
    Check {
        #[arg(long, value_parser = parse_role)]
        role: Role,

        #[arg(long, value_parser = parse_resource)]
        resource: Resource,

        #[arg(long, value_parser = parse_action)]
        action: Action,

        /// The role's holder owns the target
        #[arg(long)]
        owner: bool,

        #[command(flatten)]
        policy: PolicySource,
    },

    /// Print every resource × action decision for a role
    Matrix {
        #[arg(long, value_parser = parse_role)]
        role: Role,

        #[command(flatten)]
        policy: PolicySource,
    },
}

/// Policy files overriding the ones named in settings
#[derive(Args, Debug, Default)]
pub struct PolicySource {
    /// JSON permission table
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// JSON organization overrides
    #[arg(long)]
    pub overrides: Option<PathBuf>,
}

impl PolicySource {
    fn access_control(self, settings: &TabulaSettings) -> Result<AccessControl> {
        let mut access = settings.access.clone();
        if self.table.is_some() {
            access.permission_table = self.table;
        }
        if self.overrides.is_some() {
            access.organization_overrides = self.overrides;
        }
        access.access_control()
    }
}

fn parse_role(raw: &str) -> Result<Role, String> {
    if raw.trim().is_empty() {
        return Err("role cannot be empty".to_string());
    }
    Ok(Role::parse(raw))
}

fn parse_resource(raw: &str) -> Result<Resource, String> {
    raw.parse().map_err(|_| {
        let known: Vec<String> = Resource::iter().map(|r| r.to_string()).collect();
        format!("unknown resource '{raw}', expected one of: {}", known.join(", "))
    })
}

fn parse_action(raw: &str) -> Result<Action, String> {
    raw.parse().map_err(|_| {
        let known: Vec<String> = Action::iter().map(|a| a.to_string()).collect();
        format!("unknown action '{raw}', expected one of: {}", known.join(", "))
    })
}

pub fn run(command: AclCommand, settings: &TabulaSettings) -> Result<String> {
    match command {
        AclCommand::Check {
            role,
            resource,
            action,
            owner,
            policy,
        } => {
            let access = policy.access_control(settings)?;
            let context = AccessContext { is_owner: owner };
            let decision = if access.evaluate(&role, resource, action, &context) {
                "allow"
            } else {
                "deny"
            };
            Ok(format!("{role} {action} {resource}: {decision}"))
        }
        AclCommand::Matrix { role, policy } => {
            let access = policy.access_control(settings)?;
            if access.policy().role(&role).is_none() {
                return Err(anyhow!("role '{role}' is not defined in the policy"));
            }
            Ok(matrix(&access, &role).to_string())
        }
    }
}

/// `allow`, `own` (only on owned targets) or `-`
fn decision(access: &AccessControl, role: &Role, resource: Resource, action: Action) -> &'static str {
    if access.evaluate(role, resource, action, &AccessContext::default()) {
        "allow"
    } else if access.evaluate(role, resource, action, &AccessContext::owner()) {
        "own"
    } else {
        "-"
    }
}

fn matrix(access: &AccessControl, role: &Role) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new(role.to_string())];
    header.extend(Action::iter().map(|action| Cell::new(action.to_string())));
    table.set_header(header);

    for resource in Resource::iter() {
        let mut row = vec![Cell::new(resource.to_string())];
        row.extend(
            Action::iter().map(|action| Cell::new(decision(access, role, resource, action))),
        );
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(role: &str, resource: &str, action: &str, owner: bool) -> String {
        run(
            AclCommand::Check {
                role: parse_role(role).unwrap(),
                resource: parse_resource(resource).unwrap(),
                action: parse_action(action).unwrap(),
                owner,
                policy: PolicySource::default(),
            },
            &TabulaSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_check_uses_builtin_policy() {
        assert_eq!(
            check("admin", "record", "bulkDelete", false),
            "admin bulkDelete record: allow"
        );
        assert_eq!(
            check("viewer", "record", "bulkDelete", false),
            "viewer bulkDelete record: deny"
        );
    }

    #[test]
    fn test_owner_flag() {
        assert_eq!(
            check("editor", "view", "manageView", false),
            "editor manageView view: deny"
        );
        assert_eq!(
            check("editor", "view", "manageView", true),
            "editor manageView view: allow"
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert!(parse_resource("spaceship").unwrap_err().contains("dataSource"));
        assert!(parse_action("fly").is_err());
        assert!(parse_role("  ").is_err());
    }

    #[test]
    fn test_matrix_marks_owner_only_grants() {
        let access = AccessControl::builtin();
        let editor = Role::Editor;
        assert_eq!(decision(&access, &editor, Resource::View, Action::ManageView), "own");
        assert_eq!(decision(&access, &editor, Resource::Record, Action::Update), "allow");
        assert_eq!(decision(&access, &editor, Resource::Member, Action::Delete), "-");

        let rendered = matrix(&access, &editor).to_string();
        assert!(rendered.contains("bulkDelete"));
        assert!(rendered.contains("dataSource"));
    }

    #[test]
    fn test_matrix_for_unknown_role() {
        let err = run(
            AclCommand::Matrix {
                role: Role::parse("ghost"),
                policy: PolicySource::default(),
            },
            &TabulaSettings::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
