//! Owner context
//!
//! The owner holds the pending-save queue and the set of refundable items.
//! Items only keep their position in the queue; adding and removing always
//! goes through `enqueue`/`dequeue` so both sides stay in sync.

use std::collections::BTreeSet;

use crate::save::Transaction;
use super::guid::{ItemGuid, OwnerGuid};
use super::item::Item;

#[derive(Debug, Clone)]
pub struct ItemOwner {
    guid: OwnerGuid,
    save_queue: Vec<Option<ItemGuid>>,
    queue_blocked: bool,
    refunds: BTreeSet<ItemGuid>,
}

impl ItemOwner {
    pub fn new(guid: OwnerGuid) -> Self {
        Self {
            guid,
            save_queue: Vec::new(),
            queue_blocked: false,
            refunds: BTreeSet::new(),
        }
    }

    pub fn guid(&self) -> OwnerGuid {
        self.guid
    }

    /// While blocked, queue additions and removals are ignored
    pub fn set_queue_blocked(&mut self, blocked: bool) {
        self.queue_blocked = blocked;
    }

    pub fn is_queue_blocked(&self) -> bool {
        self.queue_blocked
    }

    /// Live entries in the save queue
    pub fn queued(&self) -> impl Iterator<Item = ItemGuid> + '_ {
        self.save_queue.iter().flatten().copied()
    }

    pub fn is_queued(&self, guid: ItemGuid) -> bool {
        self.queued().any(|queued| queued == guid)
    }

    /// True when the item's stored position points at its own slot here.
    /// A position left over from an earlier flushed queue does not count.
    fn holds_slot(&self, item: &Item) -> bool {
        item.queue_pos()
            .is_some_and(|pos| self.save_queue.get(pos) == Some(&Some(item.guid())))
    }

    /// Append `item` to the save queue unless it is already in it
    pub fn enqueue(&mut self, item: &mut Item) {
        if self.holds_slot(item) {
            return;
        }
        if item.owner() != Some(self.guid) {
            log::error!(
                "Cannot queue {} for save under {}: item owner is {:?}",
                item.guid(),
                self.guid,
                item.owner()
            );
            return;
        }
        if self.queue_blocked {
            return;
        }

        self.save_queue.push(Some(item.guid()));
        item.set_queue_pos(Some(self.save_queue.len() - 1));
    }

    /// Null the item's queue slot
    pub fn dequeue(&mut self, item: &mut Item) {
        let Some(pos) = item.queue_pos() else {
            return;
        };
        if item.owner() != Some(self.guid) {
            log::error!(
                "Cannot unqueue {} from {}: item owner is {:?}",
                item.guid(),
                self.guid,
                item.owner()
            );
            return;
        }
        if self.queue_blocked {
            return;
        }

        if self.holds_slot(item) {
            self.save_queue[pos] = None;
        }
        item.set_queue_pos(None);
    }

    pub fn add_refund_reference(&mut self, guid: ItemGuid) {
        self.refunds.insert(guid);
    }

    pub fn remove_refund_reference(&mut self, guid: ItemGuid) {
        self.refunds.remove(&guid);
    }

    pub fn has_refund_reference(&self, guid: ItemGuid) -> bool {
        self.refunds.contains(&guid)
    }

    /// Save every queued item into `tx` and empty the queue.
    /// Queued guids missing from `items` are skipped; their stale position
    /// is ignored the next time they are queued.
    pub fn save_queued(&mut self, items: &mut [Item], tx: &mut Transaction) {
        let queued: Vec<ItemGuid> = self.queued().collect();
        for guid in queued {
            match items.iter_mut().find(|item| item.guid() == guid) {
                Some(item) => item.save(tx),
                None => log::warn!("Queued {} is no longer held by {}", guid, self.guid),
            }
        }
        self.save_queue.clear();
    }
}
