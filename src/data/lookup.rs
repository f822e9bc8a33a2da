//! Read-only lookup capability
//!
//! Every component that resolves templates, bonus lists or curves takes a
//! `&dyn GameData` instead of reaching for a global registry.

use std::sync::Arc;

use super::tables::{
    BonusEntry, ContentTuning, Enchantment, GemProperties, ScalingStatDistribution,
};
use super::template::{ItemEffect, ItemTemplate};

pub trait GameData {
    fn item_template(&self, id: u32) -> Option<Arc<ItemTemplate>>;

    /// Entries of a bonus list, in application order
    fn bonus_list(&self, id: u32) -> Option<&[BonusEntry]>;

    /// Curve value at `x`; unknown curves evaluate to 0
    fn curve_value(&self, curve_id: u32, x: f32) -> f32;

    fn scaling_distribution(&self, id: u32) -> Option<&ScalingStatDistribution>;

    fn content_tuning(&self, id: u32) -> Option<&ContentTuning>;

    fn gem_properties(&self, id: u32) -> Option<&GemProperties>;

    fn enchantment(&self, id: u32) -> Option<&Enchantment>;

    fn item_effect(&self, id: u32) -> Option<&ItemEffect>;

    /// Bonus list granting the given relic item-level delta
    fn relic_bonus_list_for_delta(&self, delta: i32) -> Option<u32>;

    /// Content tuning that applies to items, skipping records disabled for items
    fn item_content_tuning(&self, id: u32) -> Option<&ContentTuning> {
        self.content_tuning(id).filter(|tuning| !tuning.disabled_for_item)
    }
}
