//! JSON file store
//!
//! Keeps a `MemoryStore` in memory and rewrites the whole file after each
//! successful commit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use super::record::PersistedItem;
use super::store::{ItemStore, MemoryStore, Transaction};

/// Store file version for compatibility checking
const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    tables: MemoryStore,
}

/// Default store location under the platform data directory
pub fn default_store_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "itemforge", "Itemforge") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("items.json");
        path
    } else {
        PathBuf::from("./items.json")
    }
}

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: MemoryStore,
}

impl JsonFileStore {
    /// Open `path`, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            log::info!("No item store at {:?}, starting empty", path);
            return Ok(Self { path, tables: MemoryStore::new() });
        }

        let text = fs::read_to_string(&path)?;
        let file: StoreFile = serde_json::from_str(&text)?;
        if file.version != STORE_VERSION {
            return Err(StoreError::VersionMismatch { expected: STORE_VERSION, found: file.version });
        }

        log::info!("Loaded {} items from {:?}", file.tables.item_count(), path);
        Ok(Self { path, tables: file.tables })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tables(&self) -> &MemoryStore {
        &self.tables
    }

    fn flush(&self, tables: &MemoryStore) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let file = StoreFile { version: STORE_VERSION, tables: tables.clone() };
        let json = serde_json::to_string_pretty(&file)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ItemStore for JsonFileStore {
    fn commit(&mut self, tx: Transaction) -> Result<(), StoreError> {
        let mut staged = self.tables.clone();
        staged.commit(tx)?;
        self.flush(&staged)?;
        self.tables = staged;
        Ok(())
    }

    fn load_item(&self, guid: u64) -> Result<Option<PersistedItem>, StoreError> {
        self.tables.load_item(guid)
    }

    fn item_guids(&self) -> Result<Vec<u64>, StoreError> {
        self.tables.item_guids()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::record::ItemRecord;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("itemforge-store-{}-{}", std::process::id(), name));
        path
    }

    fn record(guid: u64) -> ItemRecord {
        ItemRecord {
            guid,
            template_id: 1001,
            owner: None,
            creator: None,
            gift_creator: None,
            count: 1,
            duration: 0,
            charges: String::new(),
            flags: 0,
            enchantments: String::new(),
            random_bonus_list_id: 0,
            durability: 80,
            created_at: 0,
            played_time: 0,
            context: 0,
            bonus_list_ids: "1 4".to_string(),
            unlooted: false,
        }
    }

    #[test]
    fn test_persists_across_reopen() {
        let path = temp_path("reopen.json");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut tx = Transaction::new();
        tx.upsert_item(record(5));
        store.commit(tx).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let loaded = reopened.load_item(5).unwrap().unwrap();
        assert_eq!(loaded.item, record(5));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_mismatch() {
        let path = temp_path("version.json");
        fs::write(&path, r#"{"version": 99, "tables": {"items": {}, "gems": {}, "modifiers": {}, "gifts": {}, "refunds": {}, "stored_loot": {}}}"#).unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::VersionMismatch { expected: 1, found: 99 })
        ));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_failed_commit_does_not_touch_file() {
        let path = temp_path("failed.json");
        let _ = fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path).unwrap();
        let mut tx = Transaction::new();
        tx.insert_gem(crate::save::record::GemRecord::empty(1, 0));
        assert!(store.commit(tx).is_err());
        assert!(!path.exists());
    }
}
