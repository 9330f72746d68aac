use serde_json::json;
use tabula_core::{FieldOptions, Value};

use crate::descriptor::{option_bool, option_str};
use crate::{
    DisplayValue, EditorKind, FieldTypeDescriptor, FieldValidationError, OptionSpec,
    OptionValueType, ValidationResult,
};

/// How a text column is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayAs {
    #[default]
    Text,
    Link,
    Image,
    Email,
}

impl DisplayAs {
    pub const ALL: [&'static str; 4] = ["text", "link", "image", "email"];

    /// Unknown values display as plain text
    pub fn from_options(options: &FieldOptions) -> Self {
        match option_str(options, "displayAs") {
            Some("link") => Self::Link,
            Some("image") => Self::Image,
            Some("email") => Self::Email,
            _ => Self::Text,
        }
    }
}

fn format(value: &Value, options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        return DisplayValue::Empty;
    }
    let raw = value.to_string();
    match DisplayAs::from_options(options) {
        DisplayAs::Text => DisplayValue::Text(raw),
        DisplayAs::Link => {
            let text = option_str(options, "linkText")
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| raw.clone());
            DisplayValue::Link {
                href: raw,
                text,
                new_tab: option_bool(options, "openNewTab").unwrap_or(false),
            }
        }
        DisplayAs::Image => DisplayValue::Image { src: raw },
        DisplayAs::Email => DisplayValue::Email { address: raw },
    }
}

fn validate(value: &Value, options: &FieldOptions) -> ValidationResult {
    if DisplayAs::from_options(options) != DisplayAs::Email {
        return Ok(());
    }
    match value.as_str() {
        Some(address) if !address.contains('@') => Err(FieldValidationError::new(format!(
            "'{address}' is not an email address"
        ))),
        _ => Ok(()),
    }
}

/// `text`: the fallback for every unrecognized field type
pub fn text_field() -> FieldTypeDescriptor {
    FieldTypeDescriptor::new("text", "Text")
        .with_option(OptionSpec::new(
            "displayAs",
            "Display as",
            OptionValueType::one_of(&DisplayAs::ALL),
            json!("text"),
        ))
        .with_option(
            OptionSpec::boolean("openNewTab", "Open in new tab", false)
                .visible_when("displayAs", "link"),
        )
        .with_option(
            OptionSpec::string("linkText", "Link text", "")
                .visible_when("displayAs", "link")
                .with_help("Text shown instead of the URL"),
        )
        .with_editor(EditorKind::TextInput)
        .with_format(format)
        .with_validate(validate)
}
