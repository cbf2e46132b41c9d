//! Selection state for bulk export
//!
//! Tracks which catalog items the user has marked for export. All operations
//! are total functions over an in-memory set: no I/O, no error paths.

use std::collections::HashSet;

use crate::types::{MediaDescriptor, MediaId};

/// A set of selected media ids
///
/// Membership is mutually exclusive (present or absent, no counts). The set
/// is created empty, mutated by explicit toggle actions, and should be
/// cleared by the caller after a successful bulk export completes.
#[derive(Clone, Debug, Default)]
pub struct SelectionSet {
    ids: HashSet<MediaId>,
}

impl SelectionSet {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`
    ///
    /// Ids that do not exist in the visible collection may be added; they
    /// are naturally ignored when the snapshot resolves against the catalog.
    pub fn toggle(&mut self, id: impl Into<MediaId>) {
        let id = id.into();
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Tri-state select-all driven by current state
    ///
    /// If the current selection already equals the visible set, clears it
    /// entirely; otherwise sets the selection to exactly the visible set.
    /// Mirrors a tri-state "select all" checkbox.
    pub fn select_all_visible(&mut self, visible: &[MediaId]) {
        let visible_set: HashSet<MediaId> = visible.iter().cloned().collect();
        if self.ids == visible_set {
            self.ids.clear();
        } else {
            self.ids = visible_set;
        }
    }

    /// Empty the selection unconditionally
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids no longer present in the visible collection
    ///
    /// Keeps the invariant that every selected id exists in the current
    /// descriptor collection; items removed upstream leave no dangling
    /// references behind.
    pub fn prune(&mut self, visible: &[MediaId]) {
        let visible_set: HashSet<&MediaId> = visible.iter().collect();
        self.ids.retain(|id| visible_set.contains(id));
    }

    /// Whether `id` is currently selected
    pub fn contains(&self, id: &MediaId) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the selection is empty
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve the selection against a descriptor slice, in catalog order
    ///
    /// The returned list is the export job's immutable target snapshot:
    /// mutating the selection afterwards does not affect a running job.
    /// Selected ids absent from the catalog are silently dropped.
    pub fn snapshot(&self, catalog: &[MediaDescriptor]) -> Vec<MediaDescriptor> {
        catalog
            .iter()
            .filter(|d| self.ids.contains(&d.id))
            .cloned()
            .collect()
    }
}
