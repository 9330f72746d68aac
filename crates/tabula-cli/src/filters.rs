//! `tabula filters` subcommands

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Subcommand;
use tabula_core::Column;
use tabula_filters::{
    FilterError, FilterGroup, decode_with_limit, encode_with_limit, normalize, validate,
};
use tabula_settings::TabulaSettings;

use crate::input::{json_arg, json_file, read_arg};

#[derive(Subcommand, Debug)]
pub enum FilterCommand {
    /// Encode a filter tree given as JSON (`-` reads stdin)
    Encode { tree: String },

    /// Decode an encoded filter string into JSON
    Decode { encoded: String },

    /// Print the canonical form of a filter tree
    Normalize { tree: String },

    /// Check a filter tree against a table's columns
    Validate {
        tree: String,

        /// JSON file with the table's columns
        #[arg(long)]
        columns: PathBuf,
    },
}

pub fn run(command: FilterCommand, settings: &TabulaSettings) -> Result<String> {
    match command {
        FilterCommand::Encode { tree } => {
            let tree: FilterGroup = json_arg(&tree, "filter tree")?;
            Ok(encode_with_limit(&tree, settings.filters.max_encoded_len)?)
        }
        FilterCommand::Decode { encoded } => {
            let encoded = read_arg(&encoded)?;
            let tree = decode_with_limit(&encoded, settings.filters.max_encoded_len)?;
            Ok(serde_json::to_string_pretty(&tree)?)
        }
        FilterCommand::Normalize { tree } => {
            let tree: FilterGroup = json_arg(&tree, "filter tree")?;
            Ok(serde_json::to_string_pretty(&normalize(&tree))?)
        }
        FilterCommand::Validate { tree, columns } => {
            let tree: FilterGroup = json_arg(&tree, "filter tree")?;
            let columns: Vec<Column> = json_file(&columns, "columns")?;
            check(&tree, &columns)
        }
    }
}

fn check(tree: &FilterGroup, columns: &[Column]) -> Result<String> {
    match validate(tree, columns) {
        Ok(()) => Ok(format!("valid ({} conditions)", tree.leaf_count())),
        Err(FilterError::Invalid(leaves)) => {
            let report: Vec<String> = leaves.iter().map(|leaf| format!("  {leaf}")).collect();
            bail!("{} invalid conditions:\n{}", leaves.len(), report.join("\n"))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabula_core::PrimitiveType;

    const TREE: &str = r#"{"conjunction":"and","items":[{"conjunction":"or","items":[{"column":"age","operator":"gt","value":18}]}]}"#;

    #[test]
    fn test_encode_then_decode_prints_normalized_tree() {
        let settings = TabulaSettings::default();
        let encoded = run(
            FilterCommand::Encode {
                tree: TREE.to_string(),
            },
            &settings,
        )
        .unwrap();
        assert!(encoded.starts_with("f2."));

        let decoded = run(FilterCommand::Decode { encoded }, &settings).unwrap();
        let normalized = run(
            FilterCommand::Normalize {
                tree: TREE.to_string(),
            },
            &settings,
        )
        .unwrap();
        assert_eq!(decoded, normalized);
    }

    #[test]
    fn test_decode_respects_configured_limit() {
        let mut settings = TabulaSettings::default();
        settings.filters.max_encoded_len = 4;
        let err = run(
            FilterCommand::Decode {
                encoded: "f2.abcdef".to_string(),
            },
            &settings,
        )
        .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_encode_respects_configured_limit() {
        let mut settings = TabulaSettings::default();
        settings.filters.max_encoded_len = 16;
        let err = run(
            FilterCommand::Encode {
                tree: TREE.to_string(),
            },
            &settings,
        )
        .unwrap_err();
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn test_check_lists_invalid_leaves() {
        let tree: FilterGroup = serde_json::from_str(TREE).unwrap();
        let columns = vec![Column::new("name", PrimitiveType::String)];
        let err = check(&tree, &columns).unwrap_err();
        assert!(err.to_string().starts_with("1 invalid conditions"));

        let columns = vec![Column::new("age", PrimitiveType::Integer)];
        assert_eq!(check(&tree, &columns).unwrap(), "valid (1 conditions)");
    }
}
