//! Draft and applied filter slots
//!
//! Editing the draft never changes what is sent to the records
//! collaborator. `apply` validates, normalizes and encodes the draft, then
//! swaps it into the applied slot under one write lock, so a concurrent
//! `current_query` sees either the old applied filters or the new ones.

use parking_lot::RwLock;
use tabula_core::Column;

use crate::{
    DEFAULT_MAX_ENCODED_LEN, FilterError, FilterGroup, FilterNode, Result, decode_with_limit,
    encode_with_limit, normalize, validate,
};

/// Filters in effect for the active query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedFilters {
    /// Normalized tree
    pub tree: FilterGroup,
    /// Encoding of `tree`, empty when nothing is applied
    pub encoded: String,
}

impl AppliedFilters {
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}

#[derive(Debug, Default)]
struct Slots {
    draft: FilterGroup,
    applied: AppliedFilters,
}

/// Draft/applied filter state owned by one data-source session
#[derive(Debug)]
pub struct FilterState {
    slots: RwLock<Slots>,
    max_encoded_len: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::with_max_encoded_len(DEFAULT_MAX_ENCODED_LEN)
    }

    pub fn with_max_encoded_len(max_encoded_len: usize) -> Self {
        Self {
            slots: RwLock::new(Slots::default()),
            max_encoded_len,
        }
    }

    /// The filters being edited
    pub fn draft(&self) -> FilterGroup {
        self.slots.read().draft.clone()
    }

    pub fn set_draft(&self, tree: FilterGroup) {
        self.slots.write().draft = tree;
    }

    /// Edit the draft in place
    pub fn update_draft(&self, edit: impl FnOnce(&mut FilterGroup)) {
        edit(&mut self.slots.write().draft);
    }

    /// Append a node to the draft's root group
    pub fn push_draft(&self, node: impl Into<FilterNode>) {
        self.slots.write().draft.push(node);
    }

    /// Remove a root-level draft item
    pub fn remove_draft(&self, index: usize) -> Option<FilterNode> {
        let mut slots = self.slots.write();
        (index < slots.draft.items.len()).then(|| slots.draft.items.remove(index))
    }

    /// Replace a root-level draft item. Returns false if `index` is out of range.
    pub fn replace_draft(&self, index: usize, node: impl Into<FilterNode>) -> bool {
        let mut slots = self.slots.write();
        match slots.draft.items.get_mut(index) {
            Some(slot) => {
                *slot = node.into();
                true
            }
            None => false,
        }
    }

    /// Drop draft edits, going back to the applied filters
    pub fn revert_draft(&self) {
        let mut slots = self.slots.write();
        slots.draft = slots.applied.tree.clone();
    }

    /// Move the draft into the applied slot
    ///
    /// Invalid drafts are rejected with every offending leaf and leave the
    /// applied filters untouched, as are drafts too long to share as a link.
    /// Returns the new encoding.
    pub fn apply(&self, columns: &[Column]) -> Result<String> {
        let mut slots = self.slots.write();
        validate(&slots.draft, columns)?;
        let tree = normalize(&slots.draft);
        let encoded = encode_with_limit(&tree, self.max_encoded_len)?;
        tracing::debug!(leaves = tree.leaf_count(), "applying filters");
        slots.applied = AppliedFilters {
            tree,
            encoded: encoded.clone(),
        };
        Ok(encoded)
    }

    /// Clear both the draft and the applied filters
    pub fn reset(&self) {
        *self.slots.write() = Slots::default();
    }

    /// Snapshot of the applied filters
    pub fn current_query(&self) -> AppliedFilters {
        self.slots.read().applied.clone()
    }

    pub fn encoded(&self) -> String {
        self.slots.read().applied.encoded.clone()
    }

    /// Whether the draft has no unapplied edits
    pub fn all_applied(&self) -> bool {
        let slots = self.slots.read();
        normalize(&slots.draft) == slots.applied.tree
    }

    /// Start from filters carried by a shareable link
    ///
    /// Malformed or invalid input resets to no filters; the returned error is
    /// a notice for the user, not a failure.
    pub fn load_from_link(&self, encoded: &str, columns: &[Column]) -> Option<FilterError> {
        let loaded = decode_with_limit(encoded, self.max_encoded_len).and_then(|tree| {
            validate(&tree, columns)?;
            let encoded = encode_with_limit(&tree, self.max_encoded_len)?;
            Ok(AppliedFilters { tree, encoded })
        });

        let mut slots = self.slots.write();
        match loaded {
            Ok(applied) => {
                slots.draft = applied.tree.clone();
                slots.applied = applied;
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "ignoring filters from link");
                *slots = Slots::default();
                Some(err)
            }
        }
    }
}
