//! Column visibility resolution
//!
//! Selects the columns relevant to a UI context. Source order is preserved;
//! only an explicit view ordering override may reorder, and it runs as a
//! second pass after visibility filtering.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Column, FieldOptions, Result, TabulaError};

/// UI context a column set is resolved for
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UiContext {
    List,
    New,
    Edit,
    Show,
}

impl UiContext {
    pub fn parse(raw: &str) -> Result<Self> {
        raw.parse()
            .map_err(|_| TabulaError::UnknownContext(raw.to_string()))
    }

    /// Record-authoring forms never expose primary keys
    pub fn is_form(&self) -> bool {
        matches!(self, Self::New | Self::Edit)
    }
}

impl Column {
    /// Per-column visibility flag for the context
    pub fn is_visible_in(&self, context: UiContext) -> bool {
        match context {
            UiContext::List => self.visibility.list,
            UiContext::New => self.visibility.new,
            UiContext::Edit => self.visibility.edit,
            UiContext::Show => self.visibility.show,
        }
    }
}

/// Columns visible in `context`, in source order
///
/// Primary-key columns are dropped from `new` and `edit` forms regardless of
/// their own flags.
pub fn get_visible_columns(columns: &[Column], context: UiContext) -> Vec<&Column> {
    columns
        .iter()
        .filter(|column| column.is_visible_in(context))
        .filter(|column| !(context.is_form() && column.primary_key))
        .collect()
}

/// Names of the columns visible in `context`
pub fn visible_column_names(columns: &[Column], context: UiContext) -> Vec<String> {
    get_visible_columns(columns, context)
        .into_iter()
        .map(|c| c.name.clone())
        .collect()
}

/// Reorder already-filtered columns by a view's explicit ordering
///
/// Columns named in `order` come first, in that order. The rest follow in
/// their existing order. Names in `order` that aren't present are ignored.
pub fn apply_column_order<'a>(visible: Vec<&'a Column>, order: &[String]) -> Vec<&'a Column> {
    if order.is_empty() {
        return visible;
    }

    let mut ordered: Vec<&Column> = Vec::with_capacity(visible.len());
    for name in order {
        if let Some(column) = visible.iter().find(|c| &c.name == name) {
            if !ordered.iter().any(|c| c.name == column.name) {
                ordered.push(*column);
            }
        }
    }
    for column in visible {
        if !order.contains(&column.name) {
            ordered.push(column);
        }
    }
    ordered
}

/// Partial visibility override; `None` keeps the column's own flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityOverride {
    pub list: Option<bool>,
    pub new: Option<bool>,
    pub edit: Option<bool>,
    pub show: Option<bool>,
}

/// View-scoped override of a single column
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnOverride {
    pub label: Option<String>,
    pub field_type: Option<String>,
    pub field_options: FieldOptions,
    pub visibility: VisibilityOverride,
}

/// Per-view column overrides saved with a view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnOverrides {
    /// Explicit column ordering; empty keeps source order
    pub order: Vec<String>,
    pub columns: IndexMap<String, ColumnOverride>,
}

impl ColumnOverrides {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.columns.is_empty()
    }

    /// The view's Column Model: source columns with per-column overrides merged
    pub fn apply_to(&self, columns: &[Column]) -> Vec<Column> {
        columns
            .iter()
            .map(|column| match self.columns.get(&column.name) {
                Some(over) => merge_override(column, over),
                None => column.clone(),
            })
            .collect()
    }
}

fn merge_override(column: &Column, over: &ColumnOverride) -> Column {
    let mut merged = column.clone();
    if let Some(label) = &over.label {
        merged.label = Some(label.clone());
    }
    if let Some(field_type) = &over.field_type {
        merged.field_type = field_type.clone();
    }
    for (key, value) in &over.field_options {
        merged.field_options.insert(key.clone(), value.clone());
    }
    let v = &over.visibility;
    merged.visibility.list = v.list.unwrap_or(merged.visibility.list);
    merged.visibility.new = v.new.unwrap_or(merged.visibility.new);
    merged.visibility.edit = v.edit.unwrap_or(merged.visibility.edit);
    merged.visibility.show = v.show.unwrap_or(merged.visibility.show);
    merged
}

/// Resolve the columns a view shows in `context`
///
/// Merges per-column overrides, filters by visibility, then applies the
/// view's ordering.
pub fn resolve_columns(
    columns: &[Column],
    context: UiContext,
    overrides: Option<&ColumnOverrides>,
) -> Vec<Column> {
    match overrides {
        Some(overrides) if !overrides.is_empty() => {
            let model = overrides.apply_to(columns);
            let visible = get_visible_columns(&model, context);
            apply_column_order(visible, &overrides.order)
                .into_iter()
                .cloned()
                .collect()
        }
        _ => get_visible_columns(columns, context)
            .into_iter()
            .cloned()
            .collect(),
    }
}
