//! Column model
//!
//! A `Column` is the normalized description of one column of an external
//! table. Snapshots are immutable: a refetch replaces the whole sequence.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::DataSourceCapabilities;

/// Per-field option bag, keyed by option name (e.g. `displayAs`)
pub type FieldOptions = serde_json::Map<String, serde_json::Value>;

/// Field type used when a column does not name one
pub const DEFAULT_FIELD_TYPE: &str = "text";

/// Storage primitive of a column, independent of how it is displayed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrimitiveType {
    #[default]
    String,
    Text,
    Integer,
    Float,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Json,
    Uuid,
    Binary,
    Enum,
    /// Anything a data source reports that we don't model
    Other(String),
}

impl PrimitiveType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Json => "json",
            Self::Uuid => "uuid",
            Self::Binary => "binary",
            Self::Enum => "enum",
            Self::Other(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Decimal)
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Text | Self::Enum | Self::Uuid)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime | Self::Time)
    }
}

impl From<String> for PrimitiveType {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "string" | "varchar" | "char" => Self::String,
            "text" => Self::Text,
            "integer" | "int" | "bigint" => Self::Integer,
            // `number` carries no precision, so it admits fractions
            "number" | "float" | "double" | "real" => Self::Float,
            "decimal" | "numeric" => Self::Decimal,
            "boolean" | "bool" => Self::Boolean,
            "date" => Self::Date,
            "datetime" | "timestamp" => Self::DateTime,
            "time" => Self::Time,
            "json" | "jsonb" => Self::Json,
            "uuid" => Self::Uuid,
            "binary" | "blob" | "bytea" => Self::Binary,
            "enum" => Self::Enum,
            _ => Self::Other(raw),
        }
    }
}

impl From<PrimitiveType> for String {
    fn from(primitive: PrimitiveType) -> Self {
        primitive.as_str().to_string()
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility of a column in each UI context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextVisibility {
    pub list: bool,
    pub new: bool,
    pub edit: bool,
    pub show: bool,
}

impl Default for ContextVisibility {
    fn default() -> Self {
        Self {
            list: true,
            new: true,
            edit: true,
            show: true,
        }
    }
}

impl ContextVisibility {
    /// Visible nowhere
    pub fn hidden() -> Self {
        Self {
            list: false,
            new: false,
            edit: false,
            show: false,
        }
    }
}

fn default_field_type() -> String {
    DEFAULT_FIELD_TYPE.to_string()
}

fn default_nullable() -> bool {
    true
}

/// Normalized description of a data-source column
///
/// # Examples
///
/// ```
/// use tabula_core::{Column, PrimitiveType};
///
/// let column = Column::new("created_at", PrimitiveType::DateTime).with_field_type("datetime");
/// assert_eq!(column.label_or_humanized(), "Created at");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub primitive: PrimitiveType,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    #[serde(default)]
    pub field_options: FieldOptions,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub visibility: ContextVisibility,
}

impl Column {
    /// Create a visible, nullable, non-key column rendered as text
    pub fn new(name: impl Into<String>, primitive: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            primitive,
            field_type: default_field_type(),
            field_options: FieldOptions::new(),
            primary_key: false,
            nullable: true,
            label: None,
            visibility: ContextVisibility::default(),
        }
    }

    pub fn with_field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.field_options.insert(key.into(), value);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn with_visibility(mut self, visibility: ContextVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Explicit label, or the column name in sentence case
    pub fn label_or_humanized(&self) -> String {
        match &self.label {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => self.name.to_case(Case::Sentence),
        }
    }
}

/// Response of the columns collaborator for one table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub capabilities: DataSourceCapabilities,
}

impl TableSnapshot {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Whether the table exposes a primary key usable to address records
pub fn has_primary_key_column(columns: &[Column]) -> bool {
    columns.iter().any(|c| c.primary_key)
}

/// Whether the table has a column literally named `id`
pub fn has_id_column(columns: &[Column]) -> bool {
    columns.iter().any(|c| c.name == "id")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_collaborator_shape() {
        let json = indoc! {r#"
            {
                "name": "status",
                "type": "string",
                "fieldType": "select",
                "fieldOptions": {"choices": ["active", "archived"]},
                "visibility": {"new": false}
            }
        "#};
        let column: Column = serde_json::from_str(json).unwrap();
        assert_eq!(column.primitive, PrimitiveType::String);
        assert_eq!(column.field_type, "select");
        assert!(!column.primary_key);
        assert!(column.visibility.list);
        assert!(!column.visibility.new);
    }

    #[test]
    fn test_missing_field_type_defaults_to_text() {
        let column: Column = serde_json::from_str(r#"{"name": "title"}"#).unwrap();
        assert_eq!(column.field_type, DEFAULT_FIELD_TYPE);
        assert!(column.nullable);
    }

    #[test]
    fn test_unknown_primitive_survives() {
        let column: Column =
            serde_json::from_str(r#"{"name": "shape", "type": "geometry"}"#).unwrap();
        assert_eq!(column.primitive, PrimitiveType::Other("geometry".into()));
        let back = serde_json::to_value(&column).unwrap();
        assert_eq!(back["type"], "geometry");
    }

    #[test]
    fn test_primitive_predicates() {
        assert!(PrimitiveType::Integer.is_numeric());
        assert!(PrimitiveType::Text.is_textual());
        assert!(PrimitiveType::from("timestamp".to_string()).is_temporal());
        assert!(!PrimitiveType::Boolean.is_numeric());
    }

    #[test]
    fn test_number_is_fractional() {
        let column: Column = serde_json::from_str(r#"{"name": "price", "type": "number"}"#).unwrap();
        assert_eq!(column.primitive, PrimitiveType::Float);
        assert!(column.primitive.is_numeric());
    }

    #[test]
    fn test_label() {
        let column = Column::new("first_name", PrimitiveType::String);
        assert_eq!(column.label_or_humanized(), "First name");
        let labelled = column.with_label("Given name");
        assert_eq!(labelled.label_or_humanized(), "Given name");
    }

    #[test]
    fn test_id_column_detection() {
        let columns = vec![
            Column::new("id", PrimitiveType::Integer).primary_key(),
            Column::new("title", PrimitiveType::String),
        ];
        assert!(has_id_column(&columns));
        assert!(has_primary_key_column(&columns));
        assert!(!has_id_column(&columns[1..]));
    }
}
