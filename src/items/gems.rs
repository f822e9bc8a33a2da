//! Gem and socket resolution
//!
//! A socketed gem contributes item level to its host through the
//! enchantment tied to its gem properties. Contributions are computed per
//! slot and stored on the host's `BonusData`.

use serde::{Deserialize, Serialize};

use crate::data::{BonusEntry, EnchantmentEffect, GameData, ItemTemplate, RELIC_ITEM_LEVEL_CURVE};
use crate::error::ItemError;
use super::bonus::BonusData;

pub const MAX_GEM_SOCKETS: usize = 3;
pub const MAX_GEM_BONUS_LISTS: usize = 16;

/// Gem sitting in a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocketedGem {
    pub item_id: u32,
    /// Bonus lists carried by the gem itself; 0 marks an empty entry
    pub bonus_list_ids: [u32; MAX_GEM_BONUS_LISTS],
    pub context: u8,
}

impl SocketedGem {
    pub fn new(item_id: u32) -> Self {
        Self { item_id, ..Self::default() }
    }

    /// Gem with bonus lists; anything past capacity is dropped
    pub fn with_bonus_lists(item_id: u32, ids: &[u32]) -> Self {
        let mut gem = Self::new(item_id);
        for (slot, id) in gem.bonus_list_ids.iter_mut().zip(ids.iter().filter(|&&id| id != 0)) {
            *slot = *id;
        }
        gem
    }

    pub fn bonus_lists(&self) -> impl Iterator<Item = u32> + '_ {
        self.bonus_list_ids.iter().copied().filter(|&id| id != 0)
    }

    /// Space-separated bonus list ids, as stored in a gem row
    pub fn bonus_list_text(&self) -> String {
        self.bonus_lists().map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
    }

    /// Rebuild a gem from its persisted row
    pub fn from_persisted(item_id: u32, bonus_list_text: &str, context: u8) -> Result<Self, ItemError> {
        let ids = bonus_list_text
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|e| ItemError::Malformed {
                    field: "gem_bonus_list_ids",
                    message: format!("{:?}: {}", token, e),
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;
        let mut gem = Self::with_bonus_lists(item_id, &ids);
        gem.context = context;
        Ok(gem)
    }
}

/// What a gem gives its host socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GemContribution {
    pub item_level_bonus: i32,
    pub relic_type: i32,
}

impl Default for GemContribution {
    fn default() -> Self {
        Self { item_level_bonus: 0, relic_type: -1 }
    }
}

fn item_level_entries(bonus_list_id: u32, data: &dyn GameData) -> i32 {
    data.bonus_list(bonus_list_id)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| match entry {
                    BonusEntry::ItemLevel(delta) => *delta,
                    _ => 0,
                })
                .sum()
        })
        .unwrap_or(0)
}

/// Resolve a gem's contribution at `scaling_level`. Unknown gems contribute nothing.
pub fn gem_contribution(gem: &SocketedGem, scaling_level: u32, data: &dyn GameData) -> GemContribution {
    let mut contribution = GemContribution::default();

    let Some(template) = data.item_template(gem.item_id) else {
        log::debug!("Gem item {} has no template", gem.item_id);
        return contribution;
    };
    let Some(properties) = data.gem_properties(template.gem_properties) else {
        return contribution;
    };
    let Some(enchantment) = data.enchantment(properties.enchant_id) else {
        return contribution;
    };

    let mut gem_bonus = BonusData::new(&template);
    for id in gem.bonus_lists() {
        gem_bonus.add_bonus_list(id, data);
    }

    let mut gem_base_level = template.base_item_level;
    if let Some(ssd) = data.scaling_distribution(gem_bonus.scaling_stat_distribution) {
        let scaled = data.curve_value(ssd.item_level_curve, scaling_level as f32) as u32;
        if scaled != 0 {
            gem_base_level = scaled;
        }
    }

    contribution.relic_type = gem_bonus.relic_type;

    for effect in &enchantment.effects {
        match *effect {
            EnchantmentEffect::BonusListId(bonus_list_id) => {
                contribution.item_level_bonus += item_level_entries(bonus_list_id, data);
            }
            EnchantmentEffect::BonusListCurve => {
                let effective = gem_base_level as i32 + gem_bonus.item_level_bonus;
                let delta = data.curve_value(RELIC_ITEM_LEVEL_CURVE, effective as f32) as i32;
                if let Some(bonus_list_id) = data.relic_bonus_list_for_delta(delta) {
                    contribution.item_level_bonus += item_level_entries(bonus_list_id, data);
                }
            }
            EnchantmentEffect::Stat { .. } | EnchantmentEffect::None => {}
        }
    }

    contribution
}

/// Gem type bitmask of a gem item, 0 when it cannot be resolved
pub fn gem_type(gem_item_id: u32, data: &dyn GameData) -> u32 {
    data.item_template(gem_item_id)
        .and_then(|template| data.gem_properties(template.gem_properties).map(|p| p.gem_type))
        .unwrap_or(0)
}

/// True when every populated socket accepts its gem.
///
/// Only the template's own socket colours are checked. Sockets added by
/// bonus lists take any gem.
pub fn gems_fit_sockets(
    gems: &[Option<SocketedGem>; MAX_GEM_SOCKETS],
    template: &ItemTemplate,
    data: &dyn GameData,
) -> bool {
    gems.iter().enumerate().all(|(slot, gem)| {
        let Some(gem) = gem else {
            return true;
        };
        let color = template.socket_color(slot);
        if color.is_none() {
            return true;
        }
        gem_type(gem.item_id, data) & color.gem_type_mask() != 0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{defaults, DataManager, SocketColor};

    fn gems(slots: [Option<u32>; MAX_GEM_SOCKETS]) -> [Option<SocketedGem>; MAX_GEM_SOCKETS] {
        slots.map(|slot| slot.map(SocketedGem::new))
    }

    #[test]
    fn test_gem_bonus_list_item_level() {
        let data = DataManager::builtin();
        let ruby = gem_contribution(&SocketedGem::new(defaults::TEMPLATE_RUBY), 0, &data);
        assert_eq!(ruby, GemContribution { item_level_bonus: 5, relic_type: -1 });
    }

    #[test]
    fn test_relic_curve_picks_bonus_list() {
        let data = DataManager::builtin();

        // Base 100 maps to a delta of 10
        let plain = gem_contribution(&SocketedGem::new(defaults::TEMPLATE_IRON_RELIC), 0, &data);
        assert_eq!(plain.item_level_bonus, 10);

        // +100 from the gem's own bonus lists lands on the +20 list
        let mut data = data;
        data.insert_bonus_list(50, vec![BonusEntry::ItemLevel(100), BonusEntry::RelicType(2)]);
        let empowered = SocketedGem::with_bonus_lists(defaults::TEMPLATE_IRON_RELIC, &[50]);
        let contribution = gem_contribution(&empowered, 0, &data);
        assert_eq!(contribution.item_level_bonus, 20);
        assert_eq!(contribution.relic_type, 2);
    }

    #[test]
    fn test_relic_curve_without_matching_list() {
        let mut data = DataManager::builtin();
        data.insert_bonus_list(51, vec![BonusEntry::ItemLevel(15)]);
        let gem = SocketedGem::with_bonus_lists(defaults::TEMPLATE_IRON_RELIC, &[51]);
        assert_eq!(gem_contribution(&gem, 0, &data).item_level_bonus, 0);
    }

    #[test]
    fn test_unknown_gem_contributes_nothing() {
        let data = DataManager::builtin();
        assert_eq!(gem_contribution(&SocketedGem::new(9999), 0, &data), GemContribution::default());
        // A template without gem properties
        assert_eq!(
            gem_contribution(&SocketedGem::new(defaults::TEMPLATE_HELM), 0, &data),
            GemContribution::default()
        );
    }

    #[test]
    fn test_gems_fit_sockets() {
        let data = DataManager::builtin();
        let helm = defaults::helm();
        assert_eq!(helm.socket_color(0), SocketColor::Red);
        assert_eq!(helm.socket_color(1), SocketColor::Blue);

        let matched = gems([Some(defaults::TEMPLATE_RUBY), Some(defaults::TEMPLATE_SAPPHIRE), None]);
        assert!(gems_fit_sockets(&matched, &helm, &data));

        let swapped = gems([Some(defaults::TEMPLATE_SAPPHIRE), Some(defaults::TEMPLATE_RUBY), None]);
        assert!(!gems_fit_sockets(&swapped, &helm, &data));

        // Third socket has no colour, anything goes
        let uncoloured = gems([None, None, Some(defaults::TEMPLATE_IRON_RELIC)]);
        assert!(gems_fit_sockets(&uncoloured, &helm, &data));

        let unknown = gems([Some(9999), None, None]);
        assert!(!gems_fit_sockets(&unknown, &helm, &data));
    }

    #[test]
    fn test_bonus_granted_socket_is_unchecked() {
        let mut data = DataManager::builtin();
        data.insert_bonus_list(60, vec![BonusEntry::Socket { count: 1, color: SocketColor::Red }]);
        let longsword = defaults::longsword();
        let bonus = BonusData::from_bonus_lists(&longsword, &[60], &data);
        assert_eq!(bonus.socket_colors[1], SocketColor::Red);

        // Sapphire in the granted red socket still fits
        let fitted = gems([Some(defaults::TEMPLATE_RUBY), Some(defaults::TEMPLATE_SAPPHIRE), None]);
        assert!(gems_fit_sockets(&fitted, &longsword, &data));

        // The template's own red socket is still enforced
        let wrong = gems([Some(defaults::TEMPLATE_SAPPHIRE), None, None]);
        assert!(!gems_fit_sockets(&wrong, &longsword, &data));
    }

    #[test]
    fn test_gem_bonus_list_text() {
        let gem = SocketedGem::with_bonus_lists(2000, &[4, 0, 12]);
        assert_eq!(gem.bonus_list_text(), "4 12");

        let parsed = SocketedGem::from_persisted(2000, "4 12", 3).unwrap();
        assert_eq!(parsed.bonus_lists().collect::<Vec<_>>(), vec![4, 12]);
        assert_eq!(parsed.context, 3);

        assert!(matches!(
            SocketedGem::from_persisted(2000, "4 12 junk", 3),
            Err(ItemError::Malformed { field: "gem_bonus_list_ids", .. })
        ));

        let ids: Vec<u32> = (1..=20).collect();
        let capped = SocketedGem::with_bonus_lists(2000, &ids);
        assert_eq!(capped.bonus_lists().count(), MAX_GEM_BONUS_LISTS);
    }
}
