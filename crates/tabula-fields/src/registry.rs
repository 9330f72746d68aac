//! Field type registry
//!
//! Maps a field-type id to its descriptor. Lookups are pure; an unknown id
//! is never fatal to callers, who fall back to the `text` descriptor.

use std::sync::{Arc, LazyLock, OnceLock};

use indexmap::IndexMap;
use tabula_core::{Column, DEFAULT_FIELD_TYPE, Value};

use crate::{
    DisplayValue, FieldTypeDescriptor, FieldTypeError, FieldValidationError, ValidationResult,
    builtin_field_types, text_field,
};

static FALLBACK: LazyLock<FieldTypeDescriptor> = LazyLock::new(text_field);

static GLOBAL: OnceLock<Arc<FieldTypeRegistry>> = OnceLock::new();

/// Registry of field type descriptors, in registration order
#[derive(Debug, Clone, Default)]
pub struct FieldTypeRegistry {
    descriptors: IndexMap<String, Arc<FieldTypeDescriptor>>,
}

impl FieldTypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all built-in field types registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_field_types() {
            if let Err(err) = registry.register(descriptor) {
                tracing::error!(error = %err, "built-in field type conflict");
            }
        }
        registry
    }

    /// Build a registry from descriptors, stopping at the first duplicate id
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = FieldTypeDescriptor>,
    ) -> Result<Self, FieldTypeError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a field type. Duplicate ids are rejected.
    pub fn register(&mut self, descriptor: FieldTypeDescriptor) -> Result<(), FieldTypeError> {
        let id = descriptor.id.to_string();
        if self.descriptors.contains_key(&id) {
            tracing::error!(field_type = %id, "duplicate field type registration");
            return Err(FieldTypeError::DuplicateFieldType(id));
        }
        tracing::debug!(field_type = %id, "registering field type");
        self.descriptors.insert(id, Arc::new(descriptor));
        Ok(())
    }

    /// Look up a descriptor by id
    pub fn resolve(&self, id: &str) -> Result<Arc<FieldTypeDescriptor>, FieldTypeError> {
        self.descriptors
            .get(id)
            .cloned()
            .ok_or_else(|| FieldTypeError::UnknownFieldType(id.to_string()))
    }

    /// Look up a descriptor, degrading to `text` for unknown ids
    pub fn resolve_or_fallback(&self, id: &str) -> Arc<FieldTypeDescriptor> {
        match self.resolve(id) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                tracing::warn!(field_type = %id, error = %err, "falling back to text field type");
                self.descriptors
                    .get(DEFAULT_FIELD_TYPE)
                    .cloned()
                    .unwrap_or_else(|| Arc::new(FALLBACK.clone()))
            }
        }
    }

    /// Descriptor used to render a column
    pub fn descriptor_for(&self, column: &Column) -> Arc<FieldTypeDescriptor> {
        self.resolve_or_fallback(&column.field_type)
    }

    /// Format a column value with the column's field type and options
    pub fn format_column(&self, column: &Column, value: &Value) -> DisplayValue {
        self.descriptor_for(column)
            .format(value, &column.field_options)
    }

    /// Validate a value entered for a column
    ///
    /// NULL is rejected for non-nullable columns before the field type runs.
    pub fn validate_column(&self, column: &Column, value: &Value) -> ValidationResult {
        if value.is_null() && !column.nullable {
            return Err(FieldValidationError::new(format!(
                "{} is required",
                column.label_or_humanized()
            )));
        }
        self.descriptor_for(column)
            .validate(value, &column.field_options)
    }

    /// Check if a field type is registered
    pub fn has(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Registered ids, in registration order
    pub fn ids(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldTypeDescriptor> {
        self.descriptors.values().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Install the process-wide registry. Only the first call succeeds.
pub fn init_global(registry: FieldTypeRegistry) -> Result<(), FieldTypeError> {
    let count = registry.len();
    GLOBAL
        .set(Arc::new(registry))
        .map_err(|_| FieldTypeError::AlreadyInitialized)?;
    tracing::info!(field_types = count, "field type registry initialized");
    Ok(())
}

/// The process-wide registry
///
/// Installs the built-in registry if nothing was installed yet, after which
/// `init_global` fails.
pub fn global() -> &'static FieldTypeRegistry {
    global_shared_ref().as_ref()
}

/// Shared handle to the process-wide registry
pub fn global_shared() -> Arc<FieldTypeRegistry> {
    Arc::clone(global_shared_ref())
}

fn global_shared_ref() -> &'static Arc<FieldTypeRegistry> {
    GLOBAL.get_or_init(|| Arc::new(FieldTypeRegistry::with_builtins()))
}
