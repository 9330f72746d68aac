use tabula_core::{FieldOptions, Value};

use crate::{DisplayValue, EditorKind, FieldTypeDescriptor};

fn format(value: &Value, _options: &FieldOptions) -> DisplayValue {
    match value {
        Value::Null => DisplayValue::Empty,
        other => DisplayValue::Text(other.to_string()),
    }
}

/// `id`: read-only display of record identifiers
pub fn id_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("id", "ID")
        .with_editor(EditorKind::ReadOnly)
        .with_format(format)
}
