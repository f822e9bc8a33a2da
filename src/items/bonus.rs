//! Bonus engine
//!
//! Folds an ordered sequence of bonus lists into the derived attribute set of
//! one item. Entries are applied in list order, then entry order. Categories
//! that carry a priority argument keep the value with the lowest priority
//! number seen so far; the rest accumulate or take the last write.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::data::{
    BindType, BonusEntry, GameData, ItemEffect, ItemQuality, ItemTemplate, SocketColor,
    TemplateFlags, MAX_ITEM_SOCKETS, MAX_ITEM_STATS,
};
use super::gems::MAX_GEM_SOCKETS;

/// Innate plus granted effects an item can carry
pub const MAX_ITEM_EFFECTS: usize = 13;

/// Lowest priority seen so far per contested category
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriorityState {
    suffix: i32,
    appearance: i32,
    scaling_stat_distribution: i32,
    required_level_curve: i32,
    has_quality_bonus: bool,
}

impl Default for PriorityState {
    fn default() -> Self {
        Self {
            suffix: i32::MAX,
            appearance: i32::MAX,
            scaling_stat_distribution: i32::MAX,
            required_level_curve: i32::MAX,
            has_quality_bonus: false,
        }
    }
}

/// Attributes derived from a template plus the bonus lists applied to it
#[derive(Debug, Clone, PartialEq)]
pub struct BonusData {
    pub quality: ItemQuality,
    pub item_level_bonus: i32,
    pub required_level: i32,
    pub required_level_override: i32,
    pub required_level_curve: u32,
    pub stat_types: [i32; MAX_ITEM_STATS],
    pub stat_percent_editors: [i32; MAX_ITEM_STATS],
    pub stat_socket_cost_multipliers: [f32; MAX_ITEM_STATS],
    pub socket_colors: [SocketColor; MAX_ITEM_SOCKETS],
    pub bonding: BindType,
    pub suffix: i32,
    pub appearance_mod_id: u32,
    pub repair_cost_multiplier: f32,
    pub scaling_stat_distribution: u32,
    pub content_tuning: u32,
    pub relic_type: i32,
    /// Item level granted by the gem in each socket
    pub gem_item_level_bonus: [i32; MAX_GEM_SOCKETS],
    /// Relic type of the gem in each socket, -1 when empty
    pub gem_relic_types: [i32; MAX_GEM_SOCKETS],
    pub can_disenchant: bool,
    pub can_scrap: bool,
    pub has_fixed_level: bool,
    effects: [Option<ItemEffect>; MAX_ITEM_EFFECTS],
    effect_count: usize,
    priorities: PriorityState,
}

impl BonusData {
    /// Snapshot the template's baseline
    pub fn new(template: &ItemTemplate) -> Self {
        let mut stat_types = [-1; MAX_ITEM_STATS];
        let mut stat_percent_editors = [0; MAX_ITEM_STATS];
        let mut stat_socket_cost_multipliers = [0.0; MAX_ITEM_STATS];
        for (i, stat) in template.stats.iter().take(MAX_ITEM_STATS).enumerate() {
            stat_types[i] = stat.stat_type;
            stat_percent_editors[i] = stat.percent_editor;
            stat_socket_cost_multipliers[i] = stat.socket_cost_multiplier;
        }

        let mut socket_colors = [SocketColor::None; MAX_ITEM_SOCKETS];
        for (i, color) in socket_colors.iter_mut().enumerate() {
            *color = template.socket_color(i);
        }

        let mut effects = [None; MAX_ITEM_EFFECTS];
        let mut effect_count = 0;
        for effect in template.effects.iter().take(MAX_ITEM_EFFECTS) {
            effects[effect_count] = Some(*effect);
            effect_count += 1;
        }

        Self {
            quality: template.quality,
            item_level_bonus: 0,
            required_level: template.base_required_level,
            required_level_override: 0,
            required_level_curve: 0,
            stat_types,
            stat_percent_editors,
            stat_socket_cost_multipliers,
            socket_colors,
            bonding: template.bonding,
            suffix: 0,
            appearance_mod_id: 0,
            repair_cost_multiplier: 1.0,
            scaling_stat_distribution: template.scaling_stat_distribution,
            content_tuning: template.content_tuning,
            relic_type: -1,
            gem_item_level_bonus: [0; MAX_GEM_SOCKETS],
            gem_relic_types: [-1; MAX_GEM_SOCKETS],
            can_disenchant: !template.has_flag(TemplateFlags::NO_DISENCHANT),
            can_scrap: template.has_flag(TemplateFlags::SCRAPPABLE),
            has_fixed_level: false,
            effects,
            effect_count,
            priorities: PriorityState::default(),
        }
    }

    /// Build from a template and fold `bonus_list_ids` in order
    pub fn from_bonus_lists(template: &ItemTemplate, bonus_list_ids: &[u32], data: &dyn GameData) -> Self {
        let mut bonus = Self::new(template);
        for &id in bonus_list_ids {
            bonus.add_bonus_list(id, data);
        }
        bonus
    }

    /// Fold every entry of a bonus list. Returns false for unknown lists.
    pub fn add_bonus_list(&mut self, bonus_list_id: u32, data: &dyn GameData) -> bool {
        match data.bonus_list(bonus_list_id) {
            Some(entries) => {
                for entry in entries {
                    self.add_bonus(entry, data);
                }
                true
            }
            None => {
                log::debug!("Ignoring unknown bonus list {}", bonus_list_id);
                false
            }
        }
    }

    /// Fold one bonus entry
    pub fn add_bonus(&mut self, entry: &BonusEntry, data: &dyn GameData) {
        match *entry {
            BonusEntry::ItemLevel(delta) => {
                self.item_level_bonus += delta;
            }
            BonusEntry::Stat { stat_type, weight } => {
                let slot = self.stat_types.iter().position(|&t| t == stat_type || t == -1);
                if let Some(slot) = slot {
                    self.stat_types[slot] = stat_type;
                    self.stat_percent_editors[slot] += weight;
                }
            }
            BonusEntry::Quality(quality) => {
                if !self.priorities.has_quality_bonus {
                    self.quality = quality;
                    self.priorities.has_quality_bonus = true;
                } else if self.quality < quality {
                    self.quality = quality;
                }
            }
            BonusEntry::Suffix { suffix_id, priority } => {
                if priority < self.priorities.suffix {
                    self.suffix = suffix_id;
                    self.priorities.suffix = priority;
                }
            }
            BonusEntry::Socket { count, color } => {
                let mut remaining = count.max(0);
                for socket in self.socket_colors.iter_mut() {
                    if remaining == 0 {
                        break;
                    }
                    if socket.is_none() {
                        *socket = color;
                        remaining -= 1;
                    }
                }
            }
            BonusEntry::Appearance { modifier_id, priority } => {
                if priority < self.priorities.appearance {
                    self.appearance_mod_id = modifier_id;
                    self.priorities.appearance = priority;
                }
            }
            BonusEntry::RequiredLevel(delta) => {
                self.required_level += delta;
            }
            BonusEntry::RepairCostMultiplier(percent) => {
                self.repair_cost_multiplier *= percent as f32 * 0.01;
            }
            BonusEntry::ScalingStatDistribution { distribution, priority, content_tuning } => {
                self.apply_scaling(distribution, priority, content_tuning, false);
            }
            BonusEntry::ScalingStatDistributionFixed { distribution, priority, content_tuning } => {
                self.apply_scaling(distribution, priority, content_tuning, true);
            }
            BonusEntry::Bonding(bonding) => {
                self.bonding = bonding;
            }
            BonusEntry::RelicType(relic_type) => {
                self.relic_type = relic_type;
            }
            BonusEntry::OverrideRequiredLevel(level) => {
                self.required_level_override = level;
            }
            BonusEntry::OverrideCanDisenchant(value) => {
                self.can_disenchant = value;
            }
            BonusEntry::OverrideCanScrap(value) => {
                self.can_scrap = value;
            }
            BonusEntry::ItemEffectId(effect_id) => {
                if let Some(effect) = data.item_effect(effect_id) {
                    if self.effect_count < MAX_ITEM_EFFECTS {
                        self.effects[self.effect_count] = Some(*effect);
                        self.effect_count += 1;
                    }
                }
            }
            BonusEntry::RequiredLevelCurve { curve, content_tuning, priority } => {
                if priority < self.priorities.required_level_curve {
                    self.required_level_curve = curve;
                    self.priorities.required_level_curve = priority;
                    if content_tuning != 0 {
                        self.content_tuning = content_tuning;
                    }
                }
            }
        }
    }

    fn apply_scaling(&mut self, distribution: u32, priority: i32, content_tuning: u32, fixed: bool) {
        if priority < self.priorities.scaling_stat_distribution {
            self.scaling_stat_distribution = distribution;
            self.content_tuning = content_tuning;
            self.priorities.scaling_stat_distribution = priority;
            self.has_fixed_level = fixed;
        }
    }

    pub fn effects(&self) -> impl Iterator<Item = &ItemEffect> {
        self.effects[..self.effect_count].iter().flatten()
    }

    pub fn effect_count(&self) -> usize {
        self.effect_count
    }

    /// `(stat_type, percent_editor)` for a populated stat slot
    pub fn stat(&self, index: usize) -> Option<(i32, i32)> {
        match self.stat_types.get(index) {
            Some(&stat_type) if stat_type != -1 => Some((stat_type, self.stat_percent_editors[index])),
            _ => None,
        }
    }

    pub fn socket_color(&self, index: usize) -> SocketColor {
        self.socket_colors.get(index).copied().unwrap_or_default()
    }

    pub fn socket_count(&self) -> usize {
        self.socket_colors.iter().filter(|c| !c.is_none()).count()
    }

    /// Total item level granted by socketed gems
    pub fn gem_item_level_total(&self) -> i32 {
        self.gem_item_level_bonus.iter().sum()
    }
}

/// Pick one of the template's weighted random bonus lists
pub fn roll_random_bonus_list(template: &ItemTemplate, rng: &mut impl Rng) -> Option<u32> {
    if template.random_bonus_lists.is_empty() {
        return None;
    }
    let weights = template.random_bonus_lists.iter().map(|w| w.weight);
    let index = WeightedIndex::new(weights).ok()?;
    Some(template.random_bonus_lists[index.sample(rng)].bonus_list_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{defaults, DataManager, ItemClass, TemplateStat, WeightedBonusList};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plain_template() -> ItemTemplate {
        let mut t = ItemTemplate::new(1, "Test Item", ItemClass::Armor, 100);
        t.stats = vec![TemplateStat::new(4, 1000)];
        t.socket_colors = vec![SocketColor::Red];
        t.base_required_level = 30;
        t
    }

    fn data_with(lists: &[(u32, Vec<BonusEntry>)]) -> DataManager {
        let mut data = DataManager::empty();
        for (id, entries) in lists {
            data.insert_bonus_list(*id, entries.clone());
        }
        data
    }

    #[test]
    fn test_initialize_from_template() {
        let bonus = BonusData::new(&plain_template());
        assert_eq!(bonus.quality, ItemQuality::Normal);
        assert_eq!(bonus.required_level, 30);
        assert_eq!(bonus.stat(0), Some((4, 1000)));
        assert_eq!(bonus.stat(1), None);
        assert_eq!(bonus.socket_colors, [SocketColor::Red, SocketColor::None, SocketColor::None]);
        assert_eq!(bonus.repair_cost_multiplier, 1.0);
        assert_eq!(bonus.relic_type, -1);
        assert!(bonus.can_disenchant);
        assert!(!bonus.can_scrap);
    }

    #[test]
    fn test_item_level_and_required_level_accumulate() {
        let data = data_with(&[
            (1, vec![BonusEntry::ItemLevel(15), BonusEntry::RequiredLevel(2)]),
            (2, vec![BonusEntry::ItemLevel(-5), BonusEntry::RequiredLevel(3)]),
        ]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1, 2], &data);
        assert_eq!(bonus.item_level_bonus, 10);
        assert_eq!(bonus.required_level, 35);
    }

    #[test]
    fn test_stat_first_fit_and_overflow() {
        let mut data = DataManager::empty();
        let mut entries = vec![BonusEntry::Stat { stat_type: 4, weight: 500 }];
        for stat in 100..120 {
            entries.push(BonusEntry::Stat { stat_type: stat, weight: 1 });
        }
        data.insert_bonus_list(1, entries);

        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert_eq!(bonus.stat(0), Some((4, 1500)));
        assert_eq!(bonus.stat(1), Some((100, 1)));
        assert_eq!(bonus.stat(MAX_ITEM_STATS - 1), Some((108, 1)));
        assert!(!bonus.stat_types.contains(&109));
    }

    #[test]
    fn test_quality_first_sets_then_only_raises() {
        let data = data_with(&[
            (1, vec![BonusEntry::Quality(ItemQuality::Poor)]),
            (2, vec![BonusEntry::Quality(ItemQuality::Epic)]),
            (3, vec![BonusEntry::Quality(ItemQuality::Uncommon)]),
        ]);
        let mut template = plain_template();
        template.quality = ItemQuality::Rare;

        // First quality bonus may lower the template quality
        let lowered = BonusData::from_bonus_lists(&template, &[1], &data);
        assert_eq!(lowered.quality, ItemQuality::Poor);

        let raised = BonusData::from_bonus_lists(&template, &[1, 2, 3], &data);
        assert_eq!(raised.quality, ItemQuality::Epic);
    }

    #[test]
    fn test_suffix_priority_is_order_independent() {
        let data = data_with(&[
            (1, vec![BonusEntry::Suffix { suffix_id: 500, priority: 5 }]),
            (2, vec![BonusEntry::Suffix { suffix_id: 200, priority: 2 }]),
        ]);
        let forward = BonusData::from_bonus_lists(&plain_template(), &[1, 2], &data);
        let reverse = BonusData::from_bonus_lists(&plain_template(), &[2, 1], &data);
        assert_eq!(forward.suffix, 200);
        assert_eq!(reverse.suffix, 200);
    }

    #[test]
    fn test_equal_priority_first_wins() {
        let data = data_with(&[
            (1, vec![BonusEntry::Appearance { modifier_id: 11, priority: 3 }]),
            (2, vec![BonusEntry::Appearance { modifier_id: 22, priority: 3 }]),
        ]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1, 2], &data);
        assert_eq!(bonus.appearance_mod_id, 11);
    }

    #[test]
    fn test_scaling_distribution_channel() {
        let data = data_with(&[
            (1, vec![BonusEntry::ScalingStatDistributionFixed { distribution: 7, priority: 4, content_tuning: 3 }]),
            (2, vec![BonusEntry::ScalingStatDistribution { distribution: 9, priority: 1, content_tuning: 5 }]),
            (3, vec![BonusEntry::ScalingStatDistributionFixed { distribution: 8, priority: 9, content_tuning: 6 }]),
        ]);

        let fixed = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert_eq!(fixed.scaling_stat_distribution, 7);
        assert_eq!(fixed.content_tuning, 3);
        assert!(fixed.has_fixed_level);

        let overridden = BonusData::from_bonus_lists(&plain_template(), &[1, 2, 3], &data);
        assert_eq!(overridden.scaling_stat_distribution, 9);
        assert_eq!(overridden.content_tuning, 5);
        assert!(!overridden.has_fixed_level);
    }

    #[test]
    fn test_socket_fill_first_fit() {
        let data = data_with(&[(1, vec![BonusEntry::Socket { count: 2, color: SocketColor::Blue }])]);

        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert_eq!(bonus.socket_colors, [SocketColor::Red, SocketColor::Blue, SocketColor::Blue]);

        // All sockets coloured already: no-op
        let again = BonusData::from_bonus_lists(&plain_template(), &[1, 1], &data);
        assert_eq!(again.socket_colors, bonus.socket_colors);
    }

    #[test]
    fn test_socket_count_exceeding_free_slots() {
        let data = data_with(&[(1, vec![BonusEntry::Socket { count: 5, color: SocketColor::Prismatic }])]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert_eq!(bonus.socket_count(), MAX_ITEM_SOCKETS);
        assert_eq!(bonus.socket_colors[0], SocketColor::Red);
    }

    #[test]
    fn test_repair_cost_is_multiplicative() {
        let data = data_with(&[(1, vec![BonusEntry::RepairCostMultiplier(50), BonusEntry::RepairCostMultiplier(50)])]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert!((bonus.repair_cost_multiplier - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_last_write_wins_overrides() {
        let data = data_with(&[
            (1, vec![
                BonusEntry::Bonding(BindType::OnAcquire),
                BonusEntry::RelicType(3),
                BonusEntry::OverrideRequiredLevel(40),
                BonusEntry::OverrideCanDisenchant(false),
                BonusEntry::OverrideCanScrap(true),
            ]),
            (2, vec![
                BonusEntry::Bonding(BindType::OnEquip),
                BonusEntry::RelicType(5),
                BonusEntry::OverrideRequiredLevel(45),
            ]),
        ]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1, 2], &data);
        assert_eq!(bonus.bonding, BindType::OnEquip);
        assert_eq!(bonus.relic_type, 5);
        assert_eq!(bonus.required_level_override, 45);
        assert_eq!(bonus.required_level, 30);
        assert!(!bonus.can_disenchant);
        assert!(bonus.can_scrap);
    }

    #[test]
    fn test_item_effects_are_capped() {
        let mut data = DataManager::empty();
        data.insert_item_effect(ItemEffect { id: 9, spell_id: 1, trigger: 0, charges: 0, cooldown_ms: 0 });
        data.insert_bonus_list(1, vec![BonusEntry::ItemEffectId(9); MAX_ITEM_EFFECTS + 4]);
        data.insert_bonus_list(2, vec![BonusEntry::ItemEffectId(404)]);

        let bonus = BonusData::from_bonus_lists(&plain_template(), &[2], &data);
        assert_eq!(bonus.effect_count(), 0);

        let capped = BonusData::from_bonus_lists(&plain_template(), &[1], &data);
        assert_eq!(capped.effect_count(), MAX_ITEM_EFFECTS);
        assert_eq!(capped.effects().count(), MAX_ITEM_EFFECTS);
    }

    #[test]
    fn test_required_level_curve_priority() {
        let data = data_with(&[
            (1, vec![BonusEntry::RequiredLevelCurve { curve: 10, content_tuning: 0, priority: 5 }]),
            (2, vec![BonusEntry::RequiredLevelCurve { curve: 20, content_tuning: 8, priority: 1 }]),
            (3, vec![BonusEntry::RequiredLevelCurve { curve: 30, content_tuning: 9, priority: 3 }]),
        ]);
        let bonus = BonusData::from_bonus_lists(&plain_template(), &[1, 2, 3], &data);
        assert_eq!(bonus.required_level_curve, 20);
        assert_eq!(bonus.content_tuning, 8);
    }

    #[test]
    fn test_unknown_bonus_list_is_ignored() {
        let data = DataManager::empty();
        let mut bonus = BonusData::new(&plain_template());
        assert!(!bonus.add_bonus_list(77, &data));
        assert_eq!(bonus, BonusData::new(&plain_template()));
    }

    #[test]
    fn test_incremental_fold_matches_rebuild() {
        let data = DataManager::builtin();
        let template = defaults::longsword();
        let ids = [defaults::BONUS_SUFFIX_OF_THE_WHALE, defaults::BONUS_HEROIC, defaults::BONUS_SUFFIX_OF_THE_BEAR];

        let mut incremental = BonusData::new(&template);
        for id in ids {
            incremental.add_bonus_list(id, &data);
        }
        assert_eq!(incremental, BonusData::from_bonus_lists(&template, &ids, &data));
        assert_eq!(incremental.suffix, 202);
    }

    #[test]
    fn test_roll_random_bonus_list() {
        let template = defaults::longsword();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let rolled = roll_random_bonus_list(&template, &mut rng).unwrap();
            assert!(rolled == defaults::BONUS_SUFFIX_OF_THE_BEAR || rolled == defaults::BONUS_SUFFIX_OF_THE_WHALE);
        }

        let mut weighted = plain_template();
        weighted.random_bonus_lists = vec![
            WeightedBonusList { bonus_list_id: 3, weight: 0.0 },
            WeightedBonusList { bonus_list_id: 4, weight: 1.0 },
        ];
        assert_eq!(roll_random_bonus_list(&weighted, &mut rng), Some(4));

        assert_eq!(roll_random_bonus_list(&plain_template(), &mut rng), None);
    }
}
