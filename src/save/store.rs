//! Transactions and the persistence adapter
//!
//! Items decide what to write by pushing `StoreOp`s into a `Transaction`.
//! An `ItemStore` applies a whole transaction or none of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use super::record::{GemRecord, GiftRecord, ItemRecord, ModifierRecord, PersistedItem, RefundRecord};

/// One write against the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    UpsertItem(ItemRecord),
    DeleteItem(u64),
    DeleteGems(u64),
    InsertGem(GemRecord),
    DeleteModifiers(u64),
    InsertModifiers(ModifierRecord),
    InsertGift(GiftRecord),
    UpdateGiftOwner { item_guid: u64, owner: Option<u64> },
    DeleteGift(u64),
    DeleteStoredLoot(u64),
    UpsertRefund(RefundRecord),
    DeleteRefund(u64),
}

/// Ordered batch of writes, committed atomically
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    ops: Vec<StoreOp>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: StoreOp) {
        self.ops.push(op);
    }

    pub fn upsert_item(&mut self, record: ItemRecord) {
        self.push(StoreOp::UpsertItem(record));
    }

    pub fn delete_item(&mut self, guid: u64) {
        self.push(StoreOp::DeleteItem(guid));
    }

    pub fn delete_gems(&mut self, guid: u64) {
        self.push(StoreOp::DeleteGems(guid));
    }

    pub fn insert_gem(&mut self, record: GemRecord) {
        self.push(StoreOp::InsertGem(record));
    }

    pub fn delete_modifiers(&mut self, guid: u64) {
        self.push(StoreOp::DeleteModifiers(guid));
    }

    pub fn insert_modifiers(&mut self, record: ModifierRecord) {
        self.push(StoreOp::InsertModifiers(record));
    }

    pub fn insert_gift(&mut self, record: GiftRecord) {
        self.push(StoreOp::InsertGift(record));
    }

    pub fn update_gift_owner(&mut self, item_guid: u64, owner: Option<u64>) {
        self.push(StoreOp::UpdateGiftOwner { item_guid, owner });
    }

    pub fn delete_gift(&mut self, guid: u64) {
        self.push(StoreOp::DeleteGift(guid));
    }

    pub fn delete_stored_loot(&mut self, guid: u64) {
        self.push(StoreOp::DeleteStoredLoot(guid));
    }

    pub fn upsert_refund(&mut self, record: RefundRecord) {
        self.push(StoreOp::UpsertRefund(record));
    }

    pub fn delete_refund(&mut self, guid: u64) {
        self.push(StoreOp::DeleteRefund(guid));
    }

    pub fn ops(&self) -> &[StoreOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Persistence adapter
pub trait ItemStore {
    /// Apply every op in order, or none of them
    fn commit(&mut self, tx: Transaction) -> Result<(), StoreError>;

    fn load_item(&self, guid: u64) -> Result<Option<PersistedItem>, StoreError>;

    /// All stored item guids, ascending
    fn item_guids(&self) -> Result<Vec<u64>, StoreError>;
}

/// In-memory tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    items: BTreeMap<u64, ItemRecord>,
    gems: BTreeMap<u64, Vec<GemRecord>>,
    modifiers: BTreeMap<u64, ModifierRecord>,
    gifts: BTreeMap<u64, GiftRecord>,
    refunds: BTreeMap<u64, RefundRecord>,
    /// Generated container contents, keyed by container guid
    stored_loot: BTreeMap<u64, Vec<u32>>,
    #[serde(skip)]
    commits: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record generated contents for a container
    pub fn put_stored_loot(&mut self, container: u64, item_ids: Vec<u32>) {
        self.stored_loot.insert(container, item_ids);
    }

    pub fn has_stored_loot(&self, container: u64) -> bool {
        self.stored_loot.contains_key(&container)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn gem_rows(&self, guid: u64) -> &[GemRecord] {
        self.gems.get(&guid).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn gift(&self, guid: u64) -> Option<&GiftRecord> {
        self.gifts.get(&guid)
    }

    /// Successful commits so far
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    fn require_item(&self, guid: u64, what: &str) -> Result<(), StoreError> {
        if self.items.contains_key(&guid) {
            Ok(())
        } else {
            Err(StoreError::Constraint(format!("{} row for missing item {}", what, guid)))
        }
    }

    fn apply(&mut self, op: StoreOp) -> Result<(), StoreError> {
        match op {
            StoreOp::UpsertItem(record) => {
                self.items.insert(record.guid, record);
            }
            StoreOp::DeleteItem(guid) => {
                self.items.remove(&guid);
            }
            StoreOp::DeleteGems(guid) => {
                self.gems.remove(&guid);
            }
            StoreOp::InsertGem(record) => {
                self.require_item(record.item_guid, "gem")?;
                let rows = self.gems.entry(record.item_guid).or_default();
                if rows.iter().any(|row| row.slot == record.slot) {
                    return Err(StoreError::Constraint(format!(
                        "duplicate gem slot {} for item {}",
                        record.slot, record.item_guid
                    )));
                }
                rows.push(record);
            }
            StoreOp::DeleteModifiers(guid) => {
                self.modifiers.remove(&guid);
            }
            StoreOp::InsertModifiers(record) => {
                self.require_item(record.item_guid, "modifier")?;
                self.modifiers.insert(record.item_guid, record);
            }
            StoreOp::InsertGift(record) => {
                self.gifts.insert(record.item_guid, record);
            }
            StoreOp::UpdateGiftOwner { item_guid, owner } => {
                if let Some(gift) = self.gifts.get_mut(&item_guid) {
                    gift.owner = owner;
                }
            }
            StoreOp::DeleteGift(guid) => {
                self.gifts.remove(&guid);
            }
            StoreOp::DeleteStoredLoot(guid) => {
                self.stored_loot.remove(&guid);
            }
            StoreOp::UpsertRefund(record) => {
                self.require_item(record.item_guid, "refund")?;
                self.refunds.insert(record.item_guid, record);
            }
            StoreOp::DeleteRefund(guid) => {
                self.refunds.remove(&guid);
            }
        }
        Ok(())
    }
}

impl ItemStore for MemoryStore {
    fn commit(&mut self, tx: Transaction) -> Result<(), StoreError> {
        let mut staged = self.clone();
        for op in tx.ops {
            staged.apply(op)?;
        }
        staged.commits += 1;
        *self = staged;
        Ok(())
    }

    fn load_item(&self, guid: u64) -> Result<Option<PersistedItem>, StoreError> {
        let Some(item) = self.items.get(&guid) else {
            return Ok(None);
        };
        let mut gems = self.gem_rows(guid).to_vec();
        gems.sort_by_key(|row| row.slot);

        Ok(Some(PersistedItem {
            item: item.clone(),
            gems,
            modifiers: self.modifiers.get(&guid).copied(),
            gift: self.gifts.get(&guid).copied(),
            refund: self.refunds.get(&guid).copied(),
        }))
    }

    fn item_guids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.items.keys().copied().collect())
    }
}
