//! Persisted row layouts
//!
//! One `ItemRecord` per instance, a fixed set of `GemRecord`s, and optional
//! modifier, gift and refund rows. Lists are stored as space-separated text.

use serde::{Deserialize, Serialize};

/// Scalar fields of an item instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub guid: u64,
    pub template_id: u32,
    pub owner: Option<u64>,
    pub creator: Option<u64>,
    pub gift_creator: Option<u64>,
    pub count: u32,
    pub duration: u32,
    /// Spell charges, one per template spell slot
    pub charges: String,
    pub flags: u32,
    /// `id duration charges` per enchantment slot
    pub enchantments: String,
    pub random_bonus_list_id: u32,
    pub durability: u32,
    pub created_at: u64,
    pub played_time: u32,
    pub context: u8,
    pub bonus_list_ids: String,
    /// Container still holds generated loot
    #[serde(default)]
    pub unlooted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GemRecord {
    pub item_guid: u64,
    pub slot: u8,
    /// 0 for an empty socket
    pub gem_item_id: u32,
    pub bonus_list_ids: String,
    pub context: u8,
    pub scaling_level: u32,
}

impl GemRecord {
    pub fn empty(item_guid: u64, slot: u8) -> Self {
        Self {
            item_guid,
            slot,
            gem_item_id: 0,
            bonus_list_ids: String::new(),
            context: 0,
            scaling_level: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gem_item_id == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierRecord {
    pub item_guid: u64,
    pub fixed_scaling_level: u32,
    pub artifact_knowledge_level: u32,
}

/// Links a wrapped item to whoever currently holds it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecord {
    pub item_guid: u64,
    pub owner: Option<u64>,
    pub template_id: u32,
    pub flags: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRecord {
    pub item_guid: u64,
    pub recipient: u64,
    pub paid_money: u64,
    pub paid_extended_cost: u32,
}

/// Every row belonging to one item, as read back from a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedItem {
    pub item: ItemRecord,
    pub gems: Vec<GemRecord>,
    pub modifiers: Option<ModifierRecord>,
    pub gift: Option<GiftRecord>,
    pub refund: Option<RefundRecord>,
}
