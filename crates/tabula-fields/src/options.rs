//! Option schemas for field types
//!
//! An option schema describes the settings an inspector shows for a field
//! type. Conditional visibility is decided by [`OptionSpec::is_visible`] and
//! nothing else, so rendering and persisting always agree.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value as Json;
use tabula_core::FieldOptions;

use crate::FieldValidationError;

/// Value type of a field option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionValueType {
    Boolean,
    String,
    Integer,
    /// One of a fixed set of strings
    Enum { choices: Vec<Cow<'static, str>> },
    StringList,
}

impl OptionValueType {
    pub fn one_of(choices: &[&'static str]) -> Self {
        Self::Enum {
            choices: choices.iter().map(|c| Cow::Borrowed(*c)).collect(),
        }
    }

    /// Check that a JSON value fits this type. `null` always fits (unset).
    pub fn accepts(&self, value: &Json) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            Self::Boolean => value.is_boolean(),
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Enum { choices } => value
                .as_str()
                .is_some_and(|v| choices.iter().any(|c| c == v)),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(|i| i.is_string())),
        }
    }
}

/// Show an option only while another option has a given value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionCondition {
    pub key: Cow<'static, str>,
    pub equals: Json,
}

/// Definition of a single field option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    /// Option key inside `fieldOptions`
    pub key: Cow<'static, str>,
    /// Display label
    pub label: Cow<'static, str>,
    pub value_type: OptionValueType,
    pub default: Json,
    pub visible_when: Option<OptionCondition>,
    /// Help text shown below the option
    pub help_text: Option<Cow<'static, str>>,
}

impl OptionSpec {
    pub fn new(
        key: &'static str,
        label: &'static str,
        value_type: OptionValueType,
        default: Json,
    ) -> Self {
        Self {
            key: Cow::Borrowed(key),
            label: Cow::Borrowed(label),
            value_type,
            default,
            visible_when: None,
            help_text: None,
        }
    }

    pub fn boolean(key: &'static str, label: &'static str, default: bool) -> Self {
        Self::new(key, label, OptionValueType::Boolean, Json::Bool(default))
    }

    pub fn string(key: &'static str, label: &'static str, default: &str) -> Self {
        Self::new(
            key,
            label,
            OptionValueType::String,
            Json::String(default.to_string()),
        )
    }

    /// Visible only while option `key` equals `equals`
    pub fn visible_when(mut self, key: &'static str, equals: impl Into<Json>) -> Self {
        self.visible_when = Some(OptionCondition {
            key: Cow::Borrowed(key),
            equals: equals.into(),
        });
        self
    }

    pub fn with_help(mut self, help: &'static str) -> Self {
        self.help_text = Some(Cow::Borrowed(help));
        self
    }

    /// Evaluate the conditional-visibility rule against effective options
    /// (defaults already merged).
    pub fn is_visible(&self, effective: &FieldOptions) -> bool {
        match &self.visible_when {
            None => true,
            Some(condition) => effective.get(condition.key.as_ref()) == Some(&condition.equals),
        }
    }

    /// Type-check a value for this option
    pub fn check(&self, value: &Json) -> Result<(), FieldValidationError> {
        if self.value_type.accepts(value) {
            Ok(())
        } else {
            Err(FieldValidationError::new(format!(
                "Option '{}' does not accept {}",
                self.key, value
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Json) -> FieldOptions {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_unconditional_option_always_visible() {
        let spec = OptionSpec::boolean("pretty", "Pretty print", false);
        assert!(spec.is_visible(&FieldOptions::new()));
    }

    #[test]
    fn test_conditional_visibility() {
        let spec = OptionSpec::boolean("openNewTab", "Open new tab", false)
            .visible_when("displayAs", "link");
        assert!(spec.is_visible(&options(json!({"displayAs": "link"}))));
        assert!(!spec.is_visible(&options(json!({"displayAs": "image"}))));
        assert!(!spec.is_visible(&FieldOptions::new()));
    }

    #[test]
    fn test_value_type_checks() {
        let display_as = OptionSpec::new(
            "displayAs",
            "Display as",
            OptionValueType::one_of(&["text", "link"]),
            json!("text"),
        );
        assert!(display_as.check(&json!("link")).is_ok());
        assert!(display_as.check(&json!("video")).is_err());
        assert!(display_as.check(&Json::Null).is_ok());

        assert!(OptionValueType::Integer.accepts(&json!(2)));
        assert!(!OptionValueType::Integer.accepts(&json!(2.5)));
        assert!(OptionValueType::StringList.accepts(&json!(["a", "b"])));
        assert!(!OptionValueType::StringList.accepts(&json!(["a", 1])));
    }
}
