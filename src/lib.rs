// TodoStore - Ordered to-do lists with per-date partitions and key-value persistence

pub mod codec;
pub mod config;
pub mod item;
pub mod list;
pub mod partition;
pub mod session;
pub mod sqlite;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::{Backend, Config, Layout};
pub use item::{DateKey, DueEdit, Item};
pub use list::ItemList;
pub use partition::{ByDate, Flat, Partitioning};
pub use session::{EditSession, EditState, SaveOutcome};
pub use sqlite::SqliteStorage;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{DatedStore, FlatStore, ItemStore, SubscriptionId};
