use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tabula_core::{FieldOptions, Value};

use crate::descriptor::option_bool;
use crate::{DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec, ValidationResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn to_naive(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::DateTimeUtc(dt) => Some(dt.naive_utc()),
        Value::Date(d) => d.and_hms_opt(0, 0, 0),
        Value::String(s) => parse(s),
        _ => None,
    }
}

fn format(value: &Value, options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        return DisplayValue::Empty;
    }
    let pattern = if option_bool(options, "showTime").unwrap_or(true) {
        DATE_TIME_FORMAT
    } else {
        DATE_FORMAT
    };
    match to_naive(value) {
        Some(dt) => DisplayValue::Text(dt.format(pattern).to_string()),
        None => DisplayValue::Text(value.to_string()),
    }
}

fn validate(value: &Value, _options: &FieldOptions) -> ValidationResult {
    if value.is_null() || to_naive(value).is_some() {
        Ok(())
    } else {
        Err(FieldValidationError::new(format!("'{value}' is not a valid date")))
    }
}

/// `datetime`: dates and timestamps, optionally without the time part
pub fn datetime_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("datetime", "Date & time")
        .with_option(OptionSpec::boolean("showTime", "Show time", true))
        .with_editor(EditorKind::DateTimePicker)
        .with_format(format)
        .with_validate(validate)
}
