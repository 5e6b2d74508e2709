//! Example 01: Basic CRUD Operations
//!
//! This example demonstrates adding, reordering, editing, and removing items
//! in a flat to-do list persisted through file storage.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use todostore::{DateKey, DueEdit, EditSession, FileStorage, FlatStore, Item, SaveOutcome};

fn show(items: &[Item]) {
    for (index, item) in items.iter().enumerate() {
        match item.due() {
            Some(due) => println!("   {}: {} (due {})", index, item.text(), due),
            None => println!("   {}: {}", index, item.text()),
        }
    }
}

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;
    let store_path = temp_dir.path().to_path_buf();

    println!("TodoStore Basic CRUD Example");
    println!("============================\n");
    println!("Store path: {}\n", store_path.display());

    let mut store = FlatStore::open(FileStorage::open(&store_path)?);

    // ADD: text is trimmed, empty text is rejected
    println!("1. ADD - Appending items...");
    store.add(&(), "buy milk", None)?;
    store.add(&(), "  call mom  ", DateKey::from_ymd(2024, 4, 1))?;
    store.add(&(), "water plants", None)?;
    let rejected = store.add(&(), "   ", None)?;
    println!("   Blank item accepted: {}", rejected.is_some());
    show(store.list(&()));
    println!();

    // MOVE: splice out, then splice in at the new position
    println!("2. MOVE - Moving item 0 to position 2...");
    store.move_item(&(), 0, 2)?;
    show(store.list(&()));
    println!();

    // EDIT: new text, due date cleared
    println!("3. EDIT - Renaming item 0 and clearing its due date...");
    store.edit(&(), 0, "call mom back", DueEdit::Cleared)?;
    show(store.list(&()));
    println!();

    // EDIT SESSION: draft, save
    println!("4. EDIT SESSION - Editing item 1 through a draft...");
    let mut session = EditSession::new();
    let current = store.get(&(), 1).map(|item| item.text().to_string()).unwrap_or_default();
    session.start_edit((), 1, &current);
    session.change_draft("");
    println!("   Saving an empty draft: {:?}", session.save_edit(&mut store)?);
    session.change_draft("water all plants");
    if let SaveOutcome::Saved { changed } = session.save_edit(&mut store)? {
        println!("   Saved draft, store changed = {}", changed);
    }
    show(store.list(&()));
    println!();

    // REMOVE: later items shift left
    println!("5. REMOVE - Removing item 0...");
    store.remove(&(), 0)?;
    show(store.list(&()));
    println!();

    // Reopen to show the list survived
    drop(store);
    let store = FlatStore::open(FileStorage::open(&store_path)?);
    println!("Reopened store holds {} item(s):", store.len(&()));
    show(store.list(&()));
    println!();

    println!("Example complete!");
    Ok(())
}
