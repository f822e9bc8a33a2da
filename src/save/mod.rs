//! Persistence
//!
//! Row records, write batches and the store adapters that apply them.

pub mod record;
pub mod store;
pub mod file_store;

pub use record::{GemRecord, GiftRecord, ItemRecord, ModifierRecord, PersistedItem, RefundRecord};
pub use store::{ItemStore, MemoryStore, StoreOp, Transaction};
pub use file_store::{default_store_path, JsonFileStore};
