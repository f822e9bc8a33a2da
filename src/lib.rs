//! Itemforge - persistent game item instances
//!
//! Item templates and lookup tables, the bonus engine that derives an
//! item's attributes, and the dirty-state tracking that decides what gets
//! written to storage.

pub mod config;
pub mod error;
pub mod data;
pub mod items;
pub mod save;

// Re-export commonly used types
pub use config::Settings;
pub use data::{DataManager, GameData};
pub use error::{ConfigError, DataError, ItemError, StoreError};
pub use items::{BonusData, Item, ItemLevelContext, ItemOwner, ItemUpdateState};
pub use save::{ItemStore, JsonFileStore, MemoryStore, Transaction};
