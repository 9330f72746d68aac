use serde_json::json;
use tabula_core::{FieldOptions, Value};

use crate::{
    DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec,
    OptionValueType, ValidationResult,
};

fn choices(options: &FieldOptions) -> Vec<&str> {
    options
        .get("choices")
        .and_then(serde_json::Value::as_array)
        .map(|items| items.iter().filter_map(serde_json::Value::as_str).collect())
        .unwrap_or_default()
}

fn validate(value: &Value, options: &FieldOptions) -> ValidationResult {
    let allowed = choices(options);
    match value {
        Value::Null => Ok(()),
        // No configured choices means anything goes
        _ if allowed.is_empty() => Ok(()),
        _ => {
            let raw = value.to_string();
            if allowed.contains(&raw.as_str()) {
                Ok(())
            } else {
                Err(FieldValidationError::new(format!(
                    "'{raw}' is not one of: {}",
                    allowed.join(", ")
                )))
            }
        }
    }
}

fn format(value: &Value, _options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        DisplayValue::Empty
    } else {
        DisplayValue::Text(value.to_string())
    }
}

/// `select`: one value out of a configured list
pub fn select_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("select", "Select")
        .with_option(OptionSpec::new(
            "choices",
            "Choices",
            OptionValueType::StringList,
            json!([]),
        ))
        .with_editor(EditorKind::Select)
        .with_format(format)
        .with_validate(validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let field = select_field();
        let options = json!({"choices": ["active", "archived"]})
            .as_object()
            .cloned()
            .unwrap_or_default();
        assert!(field.validate(&Value::from("active"), &options).is_ok());
        let err = field.validate(&Value::from("deleted"), &options).unwrap_err();
        assert_eq!(err.message, "'deleted' is not one of: active, archived");
        assert!(field.validate(&Value::from("x"), &FieldOptions::new()).is_ok());
    }
}
