//! Filter validation against a table's columns

use tabula_core::Column;

use crate::{
    Filter, FilterError, FilterGroup, FilterOperator, FilterValue, InvalidFilterLeaf,
    InvalidReason, Result,
};

/// Check every leaf against the columns
///
/// All offending leaves are reported, each with its index path, so the UI
/// can highlight them together.
pub fn validate(tree: &FilterGroup, columns: &[Column]) -> Result<()> {
    let mut invalid = Vec::new();
    tree.walk_leaves(|path, filter| {
        if let Some(reason) = check_leaf(filter, columns) {
            invalid.push(InvalidFilterLeaf {
                path: path.to_vec(),
                column: filter.column.clone(),
                operator: filter.operator,
                reason,
            });
        }
    });

    if invalid.is_empty() {
        Ok(())
    } else {
        tracing::debug!(invalid_leaves = invalid.len(), "filter validation failed");
        Err(FilterError::Invalid(invalid))
    }
}

/// Reason a single leaf is invalid, if any
pub fn check_leaf(filter: &Filter, columns: &[Column]) -> Option<InvalidReason> {
    let Some(column) = columns.iter().find(|c| c.name == filter.column) else {
        return Some(InvalidReason::UnknownColumn);
    };
    let operator = filter.operator;
    let primitive = &column.primitive;

    if !operator.applicable_to(primitive) {
        return Some(InvalidReason::OperatorMismatch {
            primitive: primitive.to_string(),
        });
    }

    match (&filter.value, operator.requires_value()) {
        (None, false) => return None,
        (Some(_), false) => return Some(InvalidReason::UnexpectedValue),
        (None, true) => return Some(InvalidReason::MissingValue),
        (Some(value), true) => {
            let shape_ok = match value {
                FilterValue::List(items) if operator == FilterOperator::Between => {
                    items.len() == 2
                }
                FilterValue::List(items) => operator.takes_list() && !items.is_empty(),
                FilterValue::Scalar(_) => !operator.takes_list(),
            };
            if !shape_ok {
                return Some(if operator == FilterOperator::Between {
                    InvalidReason::ExpectedRange
                } else if operator.takes_list() {
                    InvalidReason::ExpectedList
                } else {
                    InvalidReason::UnexpectedValue
                });
            }

            let fits = value
                .scalars()
                .iter()
                .all(|scalar| scalar.is_finite() && scalar.fits(primitive));
            if !fits {
                return Some(InvalidReason::ValueMismatch {
                    primitive: primitive.to_string(),
                });
            }
        }
    }
    None
}
