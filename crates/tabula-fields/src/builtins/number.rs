use serde_json::json;
use tabula_core::{FieldOptions, Value};

use crate::descriptor::option_str;
use crate::{
    DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec,
    OptionValueType, ValidationResult,
};

fn decimals(options: &FieldOptions) -> Option<usize> {
    options
        .get("decimals")
        .and_then(serde_json::Value::as_u64)
        .map(|d| d.min(20) as usize)
}

fn format(value: &Value, options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        return DisplayValue::Empty;
    }
    let body = match (value.as_f64(), decimals(options)) {
        (Some(number), Some(places)) => format!("{number:.places$}"),
        _ => value.to_string(),
    };
    let prefix = option_str(options, "prefix").unwrap_or_default();
    let suffix = option_str(options, "suffix").unwrap_or_default();
    DisplayValue::Text(format!("{prefix}{body}{suffix}"))
}

fn validate(value: &Value, _options: &FieldOptions) -> ValidationResult {
    if value.is_null() || value.as_f64().is_some() {
        Ok(())
    } else {
        Err(FieldValidationError::new(format!("'{value}' is not a number")))
    }
}

/// `number`: numeric display with optional fixed decimals and affixes
pub fn number_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("number", "Number")
        .with_option(OptionSpec::new(
            "decimals",
            "Decimal places",
            OptionValueType::Integer,
            json!(null),
        ))
        .with_option(OptionSpec::string("prefix", "Prefix", ""))
        .with_option(OptionSpec::string("suffix", "Suffix", ""))
        .with_editor(EditorKind::NumberInput)
        .with_format(format)
        .with_validate(validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_and_affixes() {
        let field = number_field();
        let options = json!({"decimals": 2, "prefix": "$"})
            .as_object()
            .cloned()
            .unwrap_or_default();
        assert_eq!(
            field.format(&Value::Float(3.14159), &options),
            DisplayValue::text("$3.14")
        );
        assert_eq!(
            field.format(&Value::Int(7), &FieldOptions::new()),
            DisplayValue::text("7")
        );
    }

    #[test]
    fn test_validate() {
        let field = number_field();
        let none = FieldOptions::new();
        assert!(field.validate(&Value::Decimal("12.50".into()), &none).is_ok());
        assert!(field.validate(&Value::from("abc"), &none).is_err());
        assert!(field.validate(&Value::Null, &none).is_ok());
    }
}
