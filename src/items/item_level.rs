//! Item level calculator
//!
//! Pure function over a template, its derived bonus data and the caller's
//! level context. Passing `ItemLevelContext::catalog()` yields the tooltip
//! value with no owner in play.

use crate::data::{GameData, ItemTemplate};
use super::bonus::BonusData;

pub const MIN_ITEM_LEVEL: u32 = 1;
pub const MAX_ITEM_LEVEL: u32 = 1300;

/// Caller-supplied level and caps. Zero means "not configured".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemLevelContext {
    /// Effective character level
    pub level: u32,
    pub min_item_level: u32,
    /// The floor only applies once the pre-upgrade item level reaches this
    pub min_item_level_cutoff: u32,
    pub max_item_level: u32,
    /// Add the template's PvP item level bonus
    pub pvp_bonus: bool,
}

impl ItemLevelContext {
    /// No owner: level and caps all zero
    pub fn catalog() -> Self {
        Self::default()
    }

    pub fn for_level(level: u32) -> Self {
        Self { level, ..Self::default() }
    }
}

/// Base item level after heirloom-style scaling, before any bonus
pub fn scaled_base_item_level(
    template: &ItemTemplate,
    bonus: &BonusData,
    level: u32,
    fixed_level: u32,
    data: &dyn GameData,
) -> u32 {
    let Some(ssd) = data.scaling_distribution(bonus.scaling_stat_distribution) else {
        return template.base_item_level;
    };

    let level = if fixed_level != 0 {
        fixed_level
    } else {
        let mut level = level.max(ssd.min_level).min(ssd.max_level);
        if let Some(tuning) = data.item_content_tuning(bonus.content_tuning) {
            level = tuning.clamp(level);
        }
        level
    };

    let scaled = data.curve_value(ssd.item_level_curve, level as f32) as u32;
    if scaled != 0 {
        scaled
    } else {
        template.base_item_level
    }
}

/// Effective item level, clamped to `[MIN_ITEM_LEVEL, MAX_ITEM_LEVEL]`
pub fn item_level(
    template: &ItemTemplate,
    bonus: &BonusData,
    ctx: &ItemLevelContext,
    fixed_level: u32,
    data: &dyn GameData,
) -> u32 {
    let base = scaled_base_item_level(template, bonus, ctx.level, fixed_level, data) as i64;

    let mut item_level = base + bonus.item_level_bonus as i64 + bonus.gem_item_level_total() as i64;
    let before_upgrades = item_level;

    if ctx.pvp_bonus {
        item_level += template.pvp_item_level_bonus as i64;
    }

    if template.inventory_type.is_equippable() {
        let min = ctx.min_item_level as i64;
        let cutoff = ctx.min_item_level_cutoff as i64;
        if min != 0 && (cutoff == 0 || before_upgrades >= cutoff) && item_level < min {
            item_level = min;
        }

        let max = ctx.max_item_level as i64;
        if max != 0 && item_level > max {
            item_level = max;
        }
    }

    item_level.clamp(MIN_ITEM_LEVEL as i64, MAX_ITEM_LEVEL as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{defaults, DataManager, InventoryType, ItemClass};

    fn longsword_bonus(data: &DataManager, ids: &[u32]) -> (ItemTemplate, BonusData) {
        let template = defaults::longsword();
        let bonus = BonusData::from_bonus_lists(&template, ids, data);
        (template, bonus)
    }

    #[test]
    fn test_base_bonus_and_gems() {
        let data = DataManager::builtin();
        let (template, mut bonus) = longsword_bonus(&data, &[defaults::BONUS_HEROIC]);
        bonus.gem_item_level_bonus = [5, 5, 0];

        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::catalog(), 0, &data), 325);
    }

    #[test]
    fn test_min_floor_respects_cutoff() {
        let data = DataManager::builtin();
        let (template, bonus) = longsword_bonus(&data, &[]);

        let floor = ItemLevelContext { min_item_level: 350, ..Default::default() };
        assert_eq!(item_level(&template, &bonus, &floor, 0, &data), 350);

        let below_cutoff = ItemLevelContext { min_item_level: 350, min_item_level_cutoff: 310, ..Default::default() };
        assert_eq!(item_level(&template, &bonus, &below_cutoff, 0, &data), 300);

        let at_cutoff = ItemLevelContext { min_item_level: 350, min_item_level_cutoff: 300, ..Default::default() };
        assert_eq!(item_level(&template, &bonus, &at_cutoff, 0, &data), 350);
    }

    #[test]
    fn test_floor_holds_as_bonus_rises() {
        let data = DataManager::builtin();
        let template = defaults::longsword();
        let ctx = ItemLevelContext { min_item_level: 400, min_item_level_cutoff: 300, ..Default::default() };

        let mut bonus = BonusData::new(&template);
        for delta in 0..150 {
            bonus.item_level_bonus = delta;
            let level = item_level(&template, &bonus, &ctx, 0, &data);
            assert!(level >= 400);
            assert!(level <= MAX_ITEM_LEVEL);
        }
    }

    #[test]
    fn test_max_ceiling() {
        let data = DataManager::builtin();
        let (template, bonus) = longsword_bonus(&data, &[defaults::BONUS_MYTHIC]);
        let ctx = ItemLevelContext { max_item_level: 310, ..Default::default() };
        assert_eq!(item_level(&template, &bonus, &ctx, 0, &data), 310);
    }

    #[test]
    fn test_caps_ignored_for_non_equippable() {
        let data = DataManager::builtin();
        let template = defaults::healing_potion();
        assert_eq!(template.inventory_type, InventoryType::NonEquip);
        let bonus = BonusData::new(&template);

        let ctx = ItemLevelContext { min_item_level: 200, max_item_level: 10, ..Default::default() };
        assert_eq!(item_level(&template, &bonus, &ctx, 0, &data), 40);
    }

    #[test]
    fn test_absolute_bounds() {
        let data = DataManager::empty();
        let template = ItemTemplate::new(1, "Bounds", ItemClass::Armor, 10);
        let mut bonus = BonusData::new(&template);

        bonus.item_level_bonus = -500;
        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::catalog(), 0, &data), MIN_ITEM_LEVEL);

        bonus.item_level_bonus = 5000;
        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::catalog(), 0, &data), MAX_ITEM_LEVEL);
    }

    #[test]
    fn test_heirloom_scales_with_level() {
        let data = DataManager::builtin();
        let template = defaults::heirloom_shoulders();
        let bonus = BonusData::new(&template);

        // Catalog context clamps to the distribution's minimum level
        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::catalog(), 0, &data), 5);
        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::for_level(30), 0, &data), 100);
        // Above the distribution max the curve stays at level 60
        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::for_level(80), 0, &data), 200);
    }

    #[test]
    fn test_fixed_level_and_content_tuning() {
        let data = DataManager::builtin();
        let (template, bonus) = longsword_bonus(&data, &[defaults::BONUS_TIMEWALKING]);
        assert!(bonus.has_fixed_level);

        // Content tuning 1 caps the character level at 50
        let tuned = item_level(&template, &bonus, &ItemLevelContext::for_level(60), 0, &data);
        assert_eq!(tuned, scaled_base_item_level(&template, &bonus, 50, 0, &data));

        // A fixed level bypasses both clamps
        let fixed = item_level(&template, &bonus, &ItemLevelContext::for_level(60), 40, &data);
        assert_eq!(fixed, 133);
    }

    #[test]
    fn test_zero_curve_keeps_template_level() {
        let mut data = DataManager::builtin();
        data.insert_scaling_distribution(crate::data::ScalingStatDistribution {
            id: 9,
            min_level: 1,
            max_level: 60,
            item_level_curve: 404,
        });
        let mut template = defaults::helm();
        template.scaling_stat_distribution = 9;
        let bonus = BonusData::new(&template);

        assert_eq!(item_level(&template, &bonus, &ItemLevelContext::for_level(30), 0, &data), 300);
    }

    #[test]
    fn test_pvp_bonus_after_subtotal() {
        let data = DataManager::builtin();
        let mut template = defaults::helm();
        template.pvp_item_level_bonus = 20;
        let bonus = BonusData::new(&template);

        let ctx = ItemLevelContext {
            pvp_bonus: true,
            min_item_level: 330,
            min_item_level_cutoff: 310,
            ..Default::default()
        };
        // Subtotal 300 is below the cutoff, so only the PvP bonus applies
        assert_eq!(item_level(&template, &bonus, &ctx, 0, &data), 320);
    }
}
