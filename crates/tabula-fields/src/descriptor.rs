//! Field type descriptors
//!
//! A descriptor is the plugin contract for a column display/edit behavior.
//! `format` and `validate` are plain function pointers, so they cannot
//! capture state or hold handles to anything that does I/O.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value as Json;
use tabula_core::{FieldOptions, Value};

use crate::{OptionSpec, ValidationResult};

/// Display value produced by a formatter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayValue {
    /// Nothing to show (NULL)
    Empty,
    Text(String),
    Link {
        href: String,
        text: String,
        new_tab: bool,
    },
    Image {
        src: String,
    },
    Email {
        address: String,
    },
}

impl DisplayValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Plain-text rendering, used by tables and the CLI
    pub fn as_plain_text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Text(text) => text,
            Self::Link { text, href, .. } if text.is_empty() => href,
            Self::Link { text, .. } => text,
            Self::Image { src } => src,
            Self::Email { address } => address,
        }
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_plain_text())
    }
}

/// Format a value for display given the effective options
pub type FormatFn = fn(&Value, &FieldOptions) -> DisplayValue;

/// Validate a value given the effective options
pub type ValidateFn = fn(&Value, &FieldOptions) -> ValidationResult;

/// Editor a field type asks the UI to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    #[default]
    TextInput,
    TextArea,
    NumberInput,
    Checkbox,
    DateTimePicker,
    Select,
    CodeEditor,
    ReadOnly,
}

/// Capability bundle registered for a field-type id
#[derive(Clone)]
pub struct FieldTypeDescriptor {
    pub id: Cow<'static, str>,
    pub label: Cow<'static, str>,
    pub default_options: FieldOptions,
    /// Option inspector schema, in display order
    pub options_schema: Vec<OptionSpec>,
    pub editor: EditorKind,
    pub format: FormatFn,
    pub validate: ValidateFn,
}

impl fmt::Debug for FieldTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTypeDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("default_options", &self.default_options)
            .field("options_schema", &self.options_schema)
            .field("editor", &self.editor)
            .finish_non_exhaustive()
    }
}

fn format_plain(value: &Value, _options: &FieldOptions) -> DisplayValue {
    if value.is_null() {
        DisplayValue::Empty
    } else {
        DisplayValue::Text(value.to_string())
    }
}

fn accept_any(_value: &Value, _options: &FieldOptions) -> ValidationResult {
    Ok(())
}

impl FieldTypeDescriptor {
    /// A descriptor that shows values as plain text and accepts anything
    pub fn new(id: impl Into<Cow<'static, str>>, label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            default_options: FieldOptions::new(),
            options_schema: Vec::new(),
            editor: EditorKind::default(),
            format: format_plain,
            validate: accept_any,
        }
    }

    /// Add an option to the schema; its default joins `default_options`
    pub fn with_option(mut self, spec: OptionSpec) -> Self {
        if !spec.default.is_null() {
            self.default_options
                .insert(spec.key.to_string(), spec.default.clone());
        }
        self.options_schema.push(spec);
        self
    }

    pub fn with_editor(mut self, editor: EditorKind) -> Self {
        self.editor = editor;
        self
    }

    pub fn with_format(mut self, format: FormatFn) -> Self {
        self.format = format;
        self
    }

    pub fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = validate;
        self
    }

    pub fn option_spec(&self, key: &str) -> Option<&OptionSpec> {
        self.options_schema.iter().find(|spec| spec.key == key)
    }

    /// Defaults merged under the column's own options
    pub fn effective_options(&self, column_options: &FieldOptions) -> FieldOptions {
        options_for(self, column_options)
    }

    /// Option specs the inspector should show for these column options
    pub fn visible_options(&self, column_options: &FieldOptions) -> Vec<&OptionSpec> {
        visible_options(&self.options_schema, &self.effective_options(column_options))
    }

    /// Options worth persisting for these column options
    pub fn persistable_options(&self, column_options: &FieldOptions) -> FieldOptions {
        persistable_options(&self.options_schema, &self.effective_options(column_options))
    }

    pub fn format(&self, value: &Value, column_options: &FieldOptions) -> DisplayValue {
        (self.format)(value, &self.effective_options(column_options))
    }

    pub fn validate(&self, value: &Value, column_options: &FieldOptions) -> ValidationResult {
        (self.validate)(value, &self.effective_options(column_options))
    }
}

/// Merge a descriptor's defaults under column options
///
/// Keys present on the column win; `null` on the column falls back to the
/// default.
pub fn options_for(descriptor: &FieldTypeDescriptor, column_options: &FieldOptions) -> FieldOptions {
    let mut merged = descriptor.default_options.clone();
    for (key, value) in column_options {
        if !value.is_null() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Specs visible for the given effective options, in schema order
pub fn visible_options<'a>(schema: &'a [OptionSpec], effective: &FieldOptions) -> Vec<&'a OptionSpec> {
    schema.iter().filter(|spec| spec.is_visible(effective)).collect()
}

/// Keep only options the schema declares and that are currently visible
///
/// Uses the same rule as [`visible_options`], so a hidden option is never
/// written back. Options a descriptor does not declare are kept as-is.
pub fn persistable_options(schema: &[OptionSpec], effective: &FieldOptions) -> FieldOptions {
    effective
        .iter()
        .filter(|(key, _)| match schema.iter().find(|spec| spec.key == key.as_str()) {
            Some(spec) => spec.is_visible(effective),
            None => true,
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Read a string option
pub(crate) fn option_str<'a>(options: &'a FieldOptions, key: &str) -> Option<&'a str> {
    options.get(key).and_then(Json::as_str)
}

/// Read a boolean option
pub(crate) fn option_bool(options: &FieldOptions, key: &str) -> Option<bool> {
    options.get(key).and_then(Json::as_bool)
}
