// Ordered item list and its reducer operations

use crate::item::{DueEdit, Item};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered sequence of items for one partition.
///
/// Order is user-controlled and is the only ranking signal. Every mutating
/// method is total: invalid indices and empty text are rejected by returning
/// `false`/`None` rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemList {
    items: Vec<Item>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Append an already-built item at the tail.
    ///
    /// Id uniqueness is the caller's concern, since ids must be unique across
    /// every list in a store.
    pub(crate) fn push(&mut self, item: Item) -> Option<&Item> {
        self.items.push(item);
        self.items.last()
    }

    /// Remove the item at `index`; later items shift left
    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    /// Splice the item at `from` out, then splice it back in at `to`.
    ///
    /// `to` is a position in the list after the removal, so moving 1 to 3 in
    /// `[A, B, C, D]` yields `[A, C, D, B]`.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    /// Replace the text (and optionally the due date) of the item at `index`
    pub fn edit(&mut self, index: usize, text: &str, due: DueEdit) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        match self.items.get_mut(index) {
            Some(item) => item.apply_edit(text, due),
            None => false,
        }
    }

    /// Ids of all items, in list order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id())
    }

    /// Check that ids are unique within the list and every text is non-empty
    pub(crate) fn is_well_formed(&self) -> bool {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .all(|item| !item.text().trim().is_empty() && seen.insert(item.id()))
    }
}

impl<'a> IntoIterator for &'a ItemList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
