// Item store: ordered, optionally date-partitioned lists with write-through persistence

use crate::item::{DateKey, DueEdit, Item};
use crate::list::ItemList;
use crate::partition::{ByDate, Flat, Partitioning};
use crate::storage::Storage;
use eyre::{Context, Result};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::{debug, info, warn};

/// Store holding a single flat list
pub type FlatStore<S> = ItemStore<Flat, S>;

/// Store holding one list per calendar day
pub type DatedStore<S> = ItemStore<ByDate, S>;

type Subscriber<K> = Box<dyn FnMut(&BTreeMap<K, ItemList>)>;

/// Handle returned by [`ItemStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered item lists with write-through persistence.
///
/// The whole store is loaded once in [`ItemStore::open`] and re-serialized in
/// full under `P::storage_key()` after every operation that changed it.
/// Rejected requests (empty text, stale indices, no-op moves) return
/// `Ok(false)`/`Ok(None)` and touch neither memory nor storage. `Err` is only
/// returned when the storage write fails; the in-memory change is kept.
pub struct ItemStore<P: Partitioning, S: Storage> {
    storage: S,
    lists: BTreeMap<P::Key, ItemList>,
    subscribers: Vec<(SubscriptionId, Subscriber<P::Key>)>,
    next_subscription: u64,
    _scheme: PhantomData<P>,
}

impl<P: Partitioning, S: Storage> ItemStore<P, S> {
    /// Open a store over `storage`.
    ///
    /// Loading is best-effort: a missing value, a read error, unparsable JSON
    /// or data breaking the list invariants all yield an empty store.
    pub fn open(storage: S) -> Self {
        let lists = Self::load(&storage);

        info!(
            storage_key = P::storage_key(),
            lists = lists.len(),
            items = lists.values().map(ItemList::len).sum::<usize>(),
            "Opened item store"
        );

        Self {
            storage,
            lists,
            subscribers: Vec::new(),
            next_subscription: 0,
            _scheme: PhantomData,
        }
    }

    fn load(storage: &S) -> BTreeMap<P::Key, ItemList> {
        let raw = match storage.get(P::storage_key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                warn!(storage_key = P::storage_key(), error = ?e, "Failed to read store, starting empty");
                return BTreeMap::new();
            }
        };

        match P::decode(&raw) {
            Ok(lists) => lists,
            Err(e) => {
                warn!(storage_key = P::storage_key(), error = ?e, "Stored data is corrupt, starting empty");
                BTreeMap::new()
            }
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, handing back its storage
    pub fn into_storage(self) -> S {
        self.storage
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new item at the tail of the list for `key`.
    ///
    /// Returns the created item, or `None` when the trimmed text is empty.
    pub fn add(&mut self, key: &P::Key, text: &str, due: Option<DateKey>) -> Result<Option<Item>> {
        let Some(mut item) = Item::new(text, due) else {
            debug!(?key, "add: rejected empty text");
            return Ok(None);
        };

        while self.contains_id(item.id()) {
            item.regenerate_id();
        }

        self.lists.entry(key.clone()).or_default().push(item.clone());
        debug!(?key, id = item.id(), "add: appended item");

        self.commit()?;
        Ok(Some(item))
    }

    /// Delete the item at `index`; out-of-range indices are ignored
    pub fn remove(&mut self, key: &P::Key, index: usize) -> Result<bool> {
        let Some(list) = self.lists.get_mut(key) else {
            debug!(?key, index, "remove: no list for key");
            return Ok(false);
        };

        let Some(removed) = list.remove(index) else {
            debug!(?key, index, "remove: index out of range");
            return Ok(false);
        };

        if list.is_empty() {
            self.lists.remove(key);
        }
        debug!(?key, index, id = removed.id(), "remove: deleted item");

        self.commit()?;
        Ok(true)
    }

    /// Move the item at `from` so it ends up at `to` (splice out, splice in)
    pub fn move_item(&mut self, key: &P::Key, from: usize, to: usize) -> Result<bool> {
        let moved = match self.lists.get_mut(key) {
            Some(list) => list.move_item(from, to),
            None => false,
        };

        if !moved {
            debug!(?key, from, to, "move: ignored");
            return Ok(false);
        }
        debug!(?key, from, to, "move: reordered");

        self.commit()?;
        Ok(true)
    }

    /// Replace the text of the item at `index`, and its due date per `due`
    pub fn edit(&mut self, key: &P::Key, index: usize, text: &str, due: DueEdit) -> Result<bool> {
        let edited = match self.lists.get_mut(key) {
            Some(list) => list.edit(index, text, due),
            None => false,
        };

        if !edited {
            debug!(?key, index, "edit: ignored");
            return Ok(false);
        }
        debug!(?key, index, "edit: updated item");

        self.commit()?;
        Ok(true)
    }

    fn commit(&mut self) -> Result<()> {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&self.lists);
        }

        let raw = P::encode(&self.lists)?;
        self.storage
            .set(P::storage_key(), &raw)
            .context("Failed to persist item store")
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Items for `key` in order; empty when the key has no list
    pub fn list(&self, key: &P::Key) -> &[Item] {
        self.lists.get(key).map(ItemList::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, key: &P::Key, index: usize) -> Option<&Item> {
        self.lists.get(key).and_then(|list| list.get(index))
    }

    pub fn len(&self, key: &P::Key) -> usize {
        self.lists.get(key).map(ItemList::len).unwrap_or(0)
    }

    /// Number of items across all lists
    pub fn total_len(&self) -> usize {
        self.lists.values().map(ItemList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Keys that currently hold at least one item
    pub fn keys(&self) -> impl Iterator<Item = &P::Key> {
        self.lists.keys()
    }

    pub fn lists(&self) -> &BTreeMap<P::Key, ItemList> {
        &self.lists
    }

    /// Owned copy of every list
    pub fn snapshot(&self) -> BTreeMap<P::Key, ItemList> {
        self.lists.clone()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.lists.values().any(|list| list.contains_id(id))
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Register a callback invoked with the lists after every change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&BTreeMap<P::Key, ItemList>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Drop a subscription; returns false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }
}

impl<S: Storage> ItemStore<ByDate, S> {
    /// Item count for every date that has items
    pub fn count_by_date(&self) -> BTreeMap<DateKey, usize> {
        self.lists.iter().map(|(date, list)| (*date, list.len())).collect()
    }

    /// Item counts for the dates of one calendar month
    pub fn counts_in_month(&self, year: i32, month: u32) -> BTreeMap<DateKey, usize> {
        let Some(start) = DateKey::from_ymd(year, month, 1) else {
            return BTreeMap::new();
        };

        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = DateKey::from_ymd(next_year, next_month, 1);

        self.lists
            .range(start..)
            .take_while(|(date, _)| end.is_none_or(|end| **date < end))
            .map(|(date, list)| (*date, list.len()))
            .collect()
    }
}
