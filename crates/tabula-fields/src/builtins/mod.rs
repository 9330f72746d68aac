//! Built-in field types

mod boolean;
mod datetime;
mod id;
mod json;
mod number;
mod select;
mod text;

pub use boolean::boolean_field;
pub use datetime::datetime_field;
pub use id::id_field;
pub use json::json_field;
pub use number::number_field;
pub use select::select_field;
pub use text::{DisplayAs, text_field};

use crate::FieldTypeDescriptor;

/// Descriptors for every built-in field type, in registration order
pub fn builtin_field_types() -> Vec<FieldTypeDescriptor> {
    vec![
        text_field(),
        number_field(),
        boolean_field(),
        datetime_field(),
        json_field(),
        select_field(),
        id_field(),
    ]
}
