// JSON encoding of the persisted store shapes

use crate::item::DateKey;
use crate::list::ItemList;
use eyre::{Context, Result, eyre};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Encode a single list as a JSON array of items
pub fn encode_flat(list: &ItemList) -> Result<String> {
    serde_json::to_string(list).context("Failed to serialize item list")
}

/// Decode a JSON array of items, checking list invariants
pub fn decode_flat(raw: &str) -> Result<ItemList> {
    let list: ItemList = serde_json::from_str(raw).context("Failed to parse item list")?;
    check_lists(std::iter::once(&list))?;

    debug!(count = list.len(), "Decoded flat item list");
    Ok(list)
}

/// Encode the date mapping as a JSON object keyed by `yyyy-mm-dd`
pub fn encode_by_date(lists: &BTreeMap<DateKey, ItemList>) -> Result<String> {
    serde_json::to_string(lists).context("Failed to serialize date-partitioned lists")
}

/// Decode a JSON object of date key to item array.
///
/// Empty arrays are dropped, since an absent date already means an empty list.
pub fn decode_by_date(raw: &str) -> Result<BTreeMap<DateKey, ItemList>> {
    let mut lists: BTreeMap<DateKey, ItemList> =
        serde_json::from_str(raw).context("Failed to parse date-partitioned lists")?;
    check_lists(lists.values())?;

    lists.retain(|_, list| !list.is_empty());

    debug!(dates = lists.len(), "Decoded date-partitioned lists");
    Ok(lists)
}

/// Every list must be well formed and ids must be unique across all lists
fn check_lists<'a>(lists: impl Iterator<Item = &'a ItemList>) -> Result<()> {
    let mut seen = HashSet::new();

    for list in lists {
        if !list.is_well_formed() {
            return Err(eyre!("Item list has empty text or duplicate ids"));
        }
        for id in list.ids() {
            if !seen.insert(id) {
                return Err(eyre!("Item id {} appears in more than one list", id));
            }
        }
    }

    Ok(())
}
