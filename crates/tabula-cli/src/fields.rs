//! `tabula fields` subcommands

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use tabula_fields::{FieldTypeDescriptor, FieldTypeRegistry, OptionSpec};

#[derive(Subcommand, Debug)]
pub enum FieldCommand {
    /// List registered field types and their options
    List {
        /// Print the option schemas as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: FieldCommand) -> Result<String> {
    let registry = tabula_fields::global();
    match command {
        FieldCommand::List { json: true } => schemas_json(registry),
        FieldCommand::List { json: false } => Ok(field_table(registry).to_string()),
    }
}

fn schemas_json(registry: &FieldTypeRegistry) -> Result<String> {
    let schemas: serde_json::Map<String, serde_json::Value> = registry
        .descriptors()
        .map(|d| Ok((d.id.to_string(), serde_json::to_value(&d.options_schema)?)))
        .collect::<Result<_, serde_json::Error>>()?;
    Ok(serde_json::to_string_pretty(&schemas)?)
}

fn describe_option(spec: &OptionSpec) -> String {
    let mut line = format!("{} = {}", spec.key, spec.default);
    if let Some(condition) = &spec.visible_when {
        line.push_str(&format!(" (when {} = {})", condition.key, condition.equals));
    }
    line
}

fn editor_name(descriptor: &FieldTypeDescriptor) -> String {
    serde_json::to_value(descriptor.editor)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn field_table(registry: &FieldTypeRegistry) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Label", "Editor", "Options"]);

    for descriptor in registry.descriptors() {
        let options: Vec<String> = descriptor.options_schema.iter().map(describe_option).collect();
        table.add_row(vec![
            Cell::new(&descriptor.id),
            Cell::new(&descriptor.label),
            Cell::new(editor_name(descriptor)),
            Cell::new(options.join("\n")),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_builtins() {
        let rendered = field_table(&FieldTypeRegistry::with_builtins()).to_string();
        for id in ["text", "number", "boolean", "datetime", "json", "select", "id"] {
            assert!(rendered.contains(id), "missing {id}");
        }
        assert!(rendered.contains("openNewTab = false (when displayAs = \"link\")"));
        assert!(rendered.contains("read_only"));
    }

    #[test]
    fn test_json_schemas() {
        let json = schemas_json(&FieldTypeRegistry::with_builtins()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["text"][0]["key"], "displayAs");
    }
}
