//! Example 02: Per-Date Lists and Calendar Counts
//!
//! This example demonstrates the date-partitioned layout over SQLite storage:
//! one list per day, per-date counts for a calendar, and change subscriptions.
//!
//! Run with: cargo run --example 02_calendar

use eyre::{Result, eyre};
use std::cell::Cell;
use std::rc::Rc;
use todostore::{DateKey, DatedStore, SqliteStorage, Storage};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    println!("TodoStore Calendar Example");
    println!("==========================\n");

    let mut store = DatedStore::open(SqliteStorage::open(temp_dir.path())?);

    // Count every persisted change
    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    let subscription = store.subscribe(move |_| counter.set(counter.get() + 1));

    let march_5 = DateKey::from_ymd(2024, 3, 5).ok_or_else(|| eyre!("invalid date"))?;
    let march_9 = DateKey::from_ymd(2024, 3, 9).ok_or_else(|| eyre!("invalid date"))?;
    let april_1 = DateKey::from_ymd(2024, 4, 1).ok_or_else(|| eyre!("invalid date"))?;

    println!("1. ADD - Filling three days...");
    store.add(&march_5, "dentist", None)?;
    store.add(&march_5, "pick up prescription", Some(march_9))?;
    store.add(&march_9, "birthday dinner", None)?;
    store.add(&april_1, "file taxes", None)?;
    for date in store.keys() {
        println!("   {}: {} item(s)", date, store.len(date));
    }
    println!();

    println!("2. CALENDAR - Counts for March 2024...");
    for (date, count) in store.counts_in_month(2024, 3) {
        println!("   {}  {}", date, "*".repeat(count));
    }
    println!();

    println!("3. REMOVE - Emptying {} drops the date...", march_9);
    store.remove(&march_9, 0)?;
    println!("   Dates with items: {:?}", store.count_by_date().keys().map(DateKey::to_string).collect::<Vec<_>>());
    println!();

    store.unsubscribe(subscription);
    store.add(&april_1, "renew passport", None)?;
    println!("Changes seen by the subscriber: {}", changes.get());

    // The whole store is persisted under one key
    let storage = store.into_storage();
    let raw = storage.get("todosByDate")?.unwrap_or_default();
    println!("Persisted value: {}\n", raw);

    println!("Example complete!");
    Ok(())
}
