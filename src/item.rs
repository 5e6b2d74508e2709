// Data model: items, calendar date keys and due-date edits

use chrono::{Datelike, Local, NaiveDate};
use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A calendar day in canonical `yyyy-mm-dd` form.
///
/// Used both as the partition key of a date-partitioned store and as the due
/// date of an item. "Today" is always the local calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Today's date in the local timezone
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for DateKey {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let date =
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| eyre!("Invalid date key {:?}: {}", s, e))?;

        // chrono accepts unpadded fields, keys must round-trip byte for byte
        if date.format(DATE_FORMAT).to_string() != s {
            return Err(eyre!("Date key {:?} is not in yyyy-mm-dd form", s));
        }

        Ok(Self(date))
    }
}

impl TryFrom<String> for DateKey {
    type Error = eyre::Report;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// One to-do entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due: Option<DateKey>,
}

impl Item {
    /// Build a new item with a fresh id.
    ///
    /// Returns `None` when the text is empty after trimming.
    pub fn new(text: &str, due: Option<DateKey>) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            id: new_id(),
            text: text.to_string(),
            due,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn due(&self) -> Option<DateKey> {
        self.due
    }

    pub(crate) fn regenerate_id(&mut self) {
        self.id = new_id();
    }

    /// Apply an edit, returning true if anything changed.
    ///
    /// The caller has already checked that `text` is non-empty after trimming.
    pub(crate) fn apply_edit(&mut self, text: &str, due: DueEdit) -> bool {
        let text = text.trim();
        let due = due.apply(self.due);

        if self.text == text && self.due == due {
            return false;
        }

        self.text = text.to_string();
        self.due = due;
        true
    }
}

/// How an edit treats the due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueEdit {
    /// Keep whatever due date the item has
    Unchanged,
    /// Remove the due date
    Cleared,
    /// Replace the due date
    Set(DateKey),
}

impl DueEdit {
    pub fn apply(self, current: Option<DateKey>) -> Option<DateKey> {
        match self {
            DueEdit::Unchanged => current,
            DueEdit::Cleared => None,
            DueEdit::Set(date) => Some(date),
        }
    }
}

fn new_id() -> String {
    format!("todo-{}", Uuid::now_v7())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_key_parse_and_display() {
        let key: DateKey = "2024-03-07".parse().unwrap();
        assert_eq!(key.to_string(), "2024-03-07");
        assert_eq!(key, DateKey::from_ymd(2024, 3, 7).unwrap());
        assert_eq!(key.year(), 2024);
        assert_eq!(key.month(), 3);
    }

    #[test]
    fn test_date_key_rejects_non_canonical() {
        assert!("2024-3-7".parse::<DateKey>().is_err());
        assert!("2024-02-30".parse::<DateKey>().is_err());
        assert!("07/03/2024".parse::<DateKey>().is_err());
        assert!("".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_date_key_serde_as_string() {
        let key = DateKey::from_ymd(2025, 12, 1).unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2025-12-01\"");

        let back: DateKey = serde_json::from_str("\"2025-12-01\"").unwrap();
        assert_eq!(back, key);
        assert!(serde_json::from_str::<DateKey>("\"2025-13-01\"").is_err());
    }

    #[test]
    fn test_today_is_local_date() {
        assert_eq!(DateKey::today().date(), Local::now().date_naive());
    }

    #[test]
    fn test_item_new_trims_and_rejects_empty() {
        let item = Item::new("  buy milk  ", None).unwrap();
        assert_eq!(item.text(), "buy milk");
        assert!(item.id().starts_with("todo-"));
        assert_eq!(item.due(), None);

        assert!(Item::new("", None).is_none());
        assert!(Item::new("   \t", None).is_none());
    }

    #[test]
    fn test_item_ids_are_unique() {
        let a = Item::new("a", None).unwrap();
        let b = Item::new("a", None).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_item_json_omits_missing_due() {
        let item = Item::new("call mom", None).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("due"));

        let due = DateKey::from_ymd(2024, 1, 2).unwrap();
        let item = Item::new("call mom", Some(due)).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"due\":\"2024-01-02\""));
    }

    #[test]
    fn test_due_edit_tri_state() {
        let old = DateKey::from_ymd(2024, 1, 1);
        let new = DateKey::from_ymd(2024, 2, 2).unwrap();

        assert_eq!(DueEdit::Unchanged.apply(old), old);
        assert_eq!(DueEdit::Cleared.apply(old), None);
        assert_eq!(DueEdit::Set(new).apply(old), Some(new));
        assert_eq!(DueEdit::Unchanged.apply(None), None);
    }

    #[test]
    fn test_apply_edit_reports_change() {
        let mut item = Item::new("draft", None).unwrap();
        let id = item.id().to_string();

        assert!(!item.apply_edit(" draft ", DueEdit::Unchanged));
        assert!(item.apply_edit("final", DueEdit::Unchanged));
        assert_eq!(item.text(), "final");
        assert_eq!(item.id(), id);
    }
}
