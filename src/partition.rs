// Partitioning schemes: how lists are keyed and persisted

use crate::codec;
use crate::item::DateKey;
use crate::list::ItemList;
use eyre::Result;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// Core trait describing one persisted store shape.
///
/// A scheme fixes the partition key type, the storage key the whole store is
/// written under, and the JSON shape of the written value. The two shapes are
/// not interchangeable: a store opened with one scheme never reads the
/// other's key.
pub trait Partitioning {
    /// Key selecting one list inside the store
    type Key: Clone + Ord + Debug;

    /// Storage key the serialized store lives under
    fn storage_key() -> &'static str;

    fn encode(lists: &BTreeMap<Self::Key, ItemList>) -> Result<String>;

    fn decode(raw: &str) -> Result<BTreeMap<Self::Key, ItemList>>;
}

/// A single list, persisted as a JSON array under `"todos"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flat;

impl Partitioning for Flat {
    type Key = ();

    fn storage_key() -> &'static str {
        "todos"
    }

    fn encode(lists: &BTreeMap<(), ItemList>) -> Result<String> {
        match lists.get(&()) {
            Some(list) => codec::encode_flat(list),
            None => codec::encode_flat(&ItemList::new()),
        }
    }

    fn decode(raw: &str) -> Result<BTreeMap<(), ItemList>> {
        let list = codec::decode_flat(raw)?;
        let mut lists = BTreeMap::new();
        if !list.is_empty() {
            lists.insert((), list);
        }
        Ok(lists)
    }
}

/// One list per calendar day, persisted as a JSON object under `"todosByDate"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByDate;

impl Partitioning for ByDate {
    type Key = DateKey;

    fn storage_key() -> &'static str {
        "todosByDate"
    }

    fn encode(lists: &BTreeMap<DateKey, ItemList>) -> Result<String> {
        codec::encode_by_date(lists)
    }

    fn decode(raw: &str) -> Result<BTreeMap<DateKey, ItemList>> {
        codec::decode_by_date(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(Flat::storage_key(), "todos");
        assert_eq!(ByDate::storage_key(), "todosByDate");
    }

    #[test]
    fn test_flat_empty_store_encodes_as_empty_array() {
        let lists: BTreeMap<(), ItemList> = BTreeMap::new();
        assert_eq!(Flat::encode(&lists).unwrap(), "[]");
        assert!(Flat::decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_by_date_empty_store_encodes_as_empty_object() {
        let lists: BTreeMap<DateKey, ItemList> = BTreeMap::new();
        assert_eq!(ByDate::encode(&lists).unwrap(), "{}");
        assert!(ByDate::decode("{}").unwrap().is_empty());
    }

    #[test]
    fn test_shapes_are_not_interchangeable() {
        assert!(Flat::decode("{}").is_err());
        assert!(ByDate::decode("[]").is_err());
    }
}
