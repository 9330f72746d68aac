use tabula_core::{FieldOptions, Value};

use crate::descriptor::option_bool;
use crate::{DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec, ValidationResult};

fn to_json(value: &Value) -> Option<serde_json::Value> {
    match value {
        Value::Json(json) => Some(json.clone()),
        Value::String(raw) => serde_json::from_str(raw).ok(),
        Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
        Value::Int(i) => Some(serde_json::Value::from(*i)),
        _ => None,
    }
}

fn format(value: &Value, options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        return DisplayValue::Empty;
    }
    let pretty = option_bool(options, "pretty").unwrap_or(false);
    let rendered = to_json(value).and_then(|json| {
        if pretty {
            serde_json::to_string_pretty(&json).ok()
        } else {
            serde_json::to_string(&json).ok()
        }
    });
    DisplayValue::Text(rendered.unwrap_or_else(|| value.to_string()))
}

fn validate(value: &Value, _options: &FieldOptions) -> ValidationResult {
    match value {
        Value::String(raw) => serde_json::from_str::<serde_json::Value>(raw)
            .map(|_| ())
            .map_err(|e| FieldValidationError::new(format!("Invalid JSON: {e}"))),
        _ => Ok(()),
    }
}

/// `json`: structured values rendered compactly or pretty-printed
pub fn json_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("json", "JSON")
        .with_option(OptionSpec::boolean("pretty", "Pretty print", false))
        .with_editor(EditorKind::CodeEditor)
        .with_format(format)
        .with_validate(validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_and_pretty() {
        let field = json_field();
        let value = Value::Json(json!({"a": 1}));
        assert_eq!(field.format(&value, &FieldOptions::new()), DisplayValue::text(r#"{"a":1}"#));
        let pretty = json!({"pretty": true}).as_object().cloned().unwrap_or_default();
        assert_eq!(
            field.format(&value, &pretty),
            DisplayValue::text("{\n  \"a\": 1\n}")
        );
    }

    #[test]
    fn test_validate_string_payload() {
        let field = json_field();
        let none = FieldOptions::new();
        assert!(field.validate(&Value::from(r#"[1, 2]"#), &none).is_ok());
        assert!(field.validate(&Value::from("{oops"), &none).is_err());
    }
}
