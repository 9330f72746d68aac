use tabula_core::{FieldOptions, Value};

use crate::descriptor::option_str;
use crate::{DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec, ValidationResult};

fn as_bool(value: &Value) -> Option<bool> {
    value.as_bool().or_else(|| match value.as_str()? {
        "true" | "t" | "yes" => Some(true),
        "false" | "f" | "no" => Some(false),
        _ => None,
    })
}

fn format(value: &Value, options: &FieldOptions) -> DisplayValue {
    match as_bool(value) {
        Some(true) => DisplayValue::text(option_str(options, "trueLabel").unwrap_or("Yes")),
        Some(false) => DisplayValue::text(option_str(options, "falseLabel").unwrap_or("No")),
        None if value.is_null() => DisplayValue::Empty,
        None => DisplayValue::Text(value.to_string()),
    }
}

fn validate(value: &Value, _options: &FieldOptions) -> ValidationResult {
    if value.is_null() || as_bool(value).is_some() {
        Ok(())
    } else {
        Err(FieldValidationError::new(format!("'{value}' is not a boolean")))
    }
}

/// `boolean`: labelled yes/no values
pub fn boolean_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("boolean", "Boolean")
        .with_option(OptionSpec::string("trueLabel", "Label for true", "Yes"))
        .with_option(OptionSpec::string("falseLabel", "Label for false", "No"))
        .with_editor(EditorKind::Checkbox)
        .with_format(format)
        .with_validate(validate)
}
