//! Filter expression trees
//!
//! Nodes carry no ids; identity is structural. UI-side indices into a
//! group's `items` are ephemeral.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Conjunction, FilterOperator, FilterValue};

/// Leaf filter: `column operator value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
}

impl Filter {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: Some(value.into()),
        }
    }

    /// A filter whose operator takes no value
    pub fn unary(column: impl Into<String>, operator: FilterOperator) -> Self {
        Self {
            column: column.into(),
            operator,
            value: None,
        }
    }

    pub fn eq(column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(column, FilterOperator::Eq, value)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::unary(column, FilterOperator::IsNull)
    }
}

/// Group of filters joined by one conjunction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    pub conjunction: Conjunction,
    #[serde(default)]
    pub items: Vec<FilterNode>,
}

/// A node of a filter tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Group(FilterGroup),
    Leaf(Filter),
}

impl From<Filter> for FilterNode {
    fn from(filter: Filter) -> Self {
        Self::Leaf(filter)
    }
}

impl From<FilterGroup> for FilterNode {
    fn from(group: FilterGroup) -> Self {
        Self::Group(group)
    }
}

impl FilterNode {
    pub fn as_leaf(&self) -> Option<&Filter> {
        match self {
            Self::Leaf(filter) => Some(filter),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&FilterGroup> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }
}

/// A whole filter expression. The root is always a group.
pub type FilterTree = FilterGroup;

impl FilterGroup {
    pub fn new(conjunction: Conjunction, items: impl IntoIterator<Item = FilterNode>) -> Self {
        Self {
            conjunction,
            items: items.into_iter().collect(),
        }
    }

    pub fn and(items: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::new(Conjunction::And, items)
    }

    pub fn or(items: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::new(Conjunction::Or, items)
    }

    /// The empty AND group: no filtering
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: impl Into<FilterNode>) {
        self.items.push(node.into());
    }

    pub fn with(mut self, node: impl Into<FilterNode>) -> Self {
        self.push(node);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of leaf filters anywhere in the tree
    pub fn leaf_count(&self) -> usize {
        self.items
            .iter()
            .map(|node| match node {
                FilterNode::Leaf(_) => 1,
                FilterNode::Group(group) => group.leaf_count(),
            })
            .sum()
    }

    /// Distinct column names referenced by the tree, sorted
    pub fn columns(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        for node in &self.items {
            match node {
                FilterNode::Leaf(filter) => {
                    out.insert(filter.column.as_str());
                }
                FilterNode::Group(group) => group.collect_columns(out),
            }
        }
    }

    /// Visit every leaf with its index path from the root
    pub fn walk_leaves<'a>(&'a self, mut visit: impl FnMut(&[usize], &'a Filter)) {
        let mut path = Vec::new();
        self.walk_inner(&mut path, &mut visit);
    }

    fn walk_inner<'a>(&'a self, path: &mut Vec<usize>, visit: &mut impl FnMut(&[usize], &'a Filter)) {
        for (index, node) in self.items.iter().enumerate() {
            path.push(index);
            match node {
                FilterNode::Leaf(filter) => visit(path.as_slice(), filter),
                FilterNode::Group(group) => group.walk_inner(path, visit),
            }
            path.pop();
        }
    }
}
