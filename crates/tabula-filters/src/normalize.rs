//! Canonical form for filter trees
//!
//! Empty groups are pruned and single-item groups collapse into their sole
//! child. Two trees that differ only in that padding normalize to the same
//! tree, and therefore encode to the same string.

use crate::{Conjunction, FilterGroup, FilterNode};

/// Normalize a tree. Idempotent.
///
/// The root stays a group. A root whose only item is a group is replaced by
/// that group; a root with a single leaf is an AND group, since the
/// conjunction of one item is meaningless; a root with nothing left becomes
/// the empty AND group.
pub fn normalize(tree: &FilterGroup) -> FilterGroup {
    let items: Vec<FilterNode> = tree.items.iter().filter_map(normalize_node).collect();

    match items.as_slice() {
        [] => FilterGroup::empty(),
        [FilterNode::Group(only)] => only.clone(),
        [FilterNode::Leaf(_)] => FilterGroup::new(Conjunction::And, items),
        _ => FilterGroup::new(tree.conjunction, items),
    }
}

fn normalize_node(node: &FilterNode) -> Option<FilterNode> {
    match node {
        FilterNode::Leaf(filter) => Some(FilterNode::Leaf(filter.clone())),
        FilterNode::Group(group) => {
            let mut items: Vec<FilterNode> =
                group.items.iter().filter_map(normalize_node).collect();
            match items.len() {
                0 => None,
                1 => items.pop(),
                _ => Some(FilterNode::Group(FilterGroup::new(group.conjunction, items))),
            }
        }
    }
}

/// Whether a tree is already in canonical form
pub fn is_normalized(tree: &FilterGroup) -> bool {
    normalize(tree) == *tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Filter, FilterOperator, encode};
    use pretty_assertions::assert_eq;

    fn age() -> FilterNode {
        Filter::new("age", FilterOperator::Gt, 18).into()
    }

    fn active() -> FilterNode {
        Filter::eq("status", "active").into()
    }

    #[test]
    fn test_single_item_group_collapses() {
        let tree = FilterGroup::and([age(), FilterGroup::or([active()]).into()]);
        assert_eq!(normalize(&tree), FilterGroup::and([age(), active()]));
    }

    #[test]
    fn test_empty_groups_pruned_at_any_depth() {
        let tree = FilterGroup::and([
            FilterGroup::or([]).into(),
            age(),
            FilterGroup::and([FilterGroup::or([FilterGroup::and([]).into()]).into()]).into(),
            active(),
        ]);
        assert_eq!(normalize(&tree), FilterGroup::and([age(), active()]));
    }

    #[test]
    fn test_root_collapses_into_sole_group() {
        let tree = FilterGroup::and([FilterGroup::or([age(), active()]).into()]);
        assert_eq!(normalize(&tree), FilterGroup::or([age(), active()]));
    }

    #[test]
    fn test_root_with_single_leaf_is_an_and_group() {
        let normalized = normalize(&FilterGroup::or([age()]));
        assert_eq!(normalized, FilterGroup::and([age()]));

        let nested = FilterGroup::or([FilterGroup::and([FilterGroup::or([age()]).into()]).into()]);
        assert_eq!(normalize(&nested), normalized);
        assert_eq!(
            encode(&FilterGroup::or([age()])).unwrap(),
            encode(&FilterGroup::and([age()])).unwrap()
        );
    }

    #[test]
    fn test_everything_empty_becomes_empty_and() {
        let tree = FilterGroup::or([FilterGroup::or([]).into()]);
        assert_eq!(normalize(&tree), FilterGroup::empty());
    }

    #[test]
    fn test_idempotent() {
        let trees = vec![
            FilterGroup::and([age(), FilterGroup::or([active()]).into()]),
            FilterGroup::or([FilterGroup::and([FilterGroup::or([age(), active()]).into()]).into()]),
            FilterGroup::and([
                FilterGroup::or([age(), FilterGroup::and([active(), age()]).into()]).into(),
                active(),
            ]),
            FilterGroup::empty(),
        ];
        for tree in trees {
            let once = normalize(&tree);
            assert_eq!(normalize(&once), once);
            assert!(is_normalized(&once));
        }
    }

    #[test]
    fn test_conjunction_preserved() {
        let tree = FilterGroup::and([
            age(),
            FilterGroup::or([active(), FilterGroup::and([]).into(), age()]).into(),
        ]);
        let normalized = normalize(&tree);
        let inner = normalized.items[1].as_group().unwrap();
        assert_eq!(inner.conjunction, Conjunction::Or);
        assert_eq!(inner.items.len(), 2);
    }
}
