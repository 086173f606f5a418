//! Multi-select state for bulk moderation actions.

use std::collections::HashSet;

use crate::domain::entities::ContentId;

/// Ids chosen for a bulk action within one kind's current filtered view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<ContentId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric difference with `{id}`. Returns whether `id` is now selected.
    pub fn toggle(&mut self, id: &ContentId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Selects exactly `current_ids`, or clears when the selection already
    /// has as many ids as are visible. Calling it twice on the same view
    /// therefore toggles between all and none.
    pub fn select_all<'a, I>(&mut self, current_ids: I)
    where
        I: IntoIterator<Item = &'a ContentId>,
    {
        let current: HashSet<ContentId> = current_ids.into_iter().cloned().collect();
        if self.ids.len() == current.len() {
            self.ids.clear();
        } else {
            self.ids = current;
        }
    }

    pub fn is_all_selected<'a, I>(&self, current_ids: I) -> bool
    where
        I: IntoIterator<Item = &'a ContentId>,
    {
        let mut seen = 0usize;
        for id in current_ids {
            if !self.ids.contains(id) {
                return false;
            }
            seen += 1;
        }
        seen > 0
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentId> {
        self.ids.iter()
    }

    /// Drop every id for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&ContentId) -> bool) {
        self.ids.retain(|id| keep(id));
    }
}
