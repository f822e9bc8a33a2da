//! Built-in content
//!
//! A small, self-consistent data set used when no data file is configured.

use std::collections::BTreeMap;

use super::loader::DataFile;
use super::tables::{
    BonusEntry, ContentTuning, Curve, CurveKind, Enchantment, EnchantmentEffect, GemProperties,
    ScalingStatDistribution, SocketColor, RELIC_ITEM_LEVEL_CURVE,
};
use super::template::{
    BindType, InventoryType, ItemClass, ItemEffect, ItemQuality, ItemTemplate, TemplateFlags,
    TemplateStat, WeightedBonusList,
};

pub const TEMPLATE_LONGSWORD: u32 = 1000;
pub const TEMPLATE_HELM: u32 = 1001;
pub const TEMPLATE_HEIRLOOM_SHOULDERS: u32 = 1002;
pub const TEMPLATE_HEALING_POTION: u32 = 1003;
pub const TEMPLATE_RUBY: u32 = 2000;
pub const TEMPLATE_SAPPHIRE: u32 = 2001;
pub const TEMPLATE_IRON_RELIC: u32 = 2002;
pub const TEMPLATE_POUCH: u32 = 3000;

pub const BONUS_HEROIC: u32 = 1;
pub const BONUS_MYTHIC: u32 = 2;
pub const BONUS_PRISMATIC_SOCKET: u32 = 3;
pub const BONUS_SUFFIX_OF_THE_BEAR: u32 = 4;
pub const BONUS_SUFFIX_OF_THE_WHALE: u32 = 5;
pub const BONUS_HASTE: u32 = 6;
pub const BONUS_GEM_EMPOWER: u32 = 7;
pub const BONUS_TIMEWALKING: u32 = 8;
pub const BONUS_CHEAP_REPAIR: u32 = 9;
pub const BONUS_RELIC_PLUS_10: u32 = 10;
pub const BONUS_RELIC_PLUS_20: u32 = 11;

pub const CURVE_HEIRLOOM: u32 = 1;

pub const STAT_STRENGTH: i32 = 4;
pub const STAT_STAMINA: i32 = 7;
pub const STAT_CRIT: i32 = 32;
pub const STAT_HASTE: i32 = 36;

fn bonus_lists() -> BTreeMap<u32, Vec<BonusEntry>> {
    let mut lists = BTreeMap::new();
    lists.insert(BONUS_HEROIC, vec![BonusEntry::ItemLevel(15)]);
    lists.insert(
        BONUS_MYTHIC,
        vec![BonusEntry::ItemLevel(30), BonusEntry::Quality(ItemQuality::Epic)],
    );
    lists.insert(
        BONUS_PRISMATIC_SOCKET,
        vec![BonusEntry::Socket { count: 1, color: SocketColor::Prismatic }],
    );
    lists.insert(
        BONUS_SUFFIX_OF_THE_BEAR,
        vec![
            BonusEntry::Suffix { suffix_id: 101, priority: 5 },
            BonusEntry::Stat { stat_type: STAT_STAMINA, weight: 300 },
        ],
    );
    lists.insert(
        BONUS_SUFFIX_OF_THE_WHALE,
        vec![
            BonusEntry::Suffix { suffix_id: 202, priority: 2 },
            BonusEntry::Stat { stat_type: STAT_CRIT, weight: 250 },
        ],
    );
    lists.insert(BONUS_HASTE, vec![BonusEntry::Stat { stat_type: STAT_HASTE, weight: 500 }]);
    lists.insert(BONUS_GEM_EMPOWER, vec![BonusEntry::ItemLevel(5)]);
    lists.insert(
        BONUS_TIMEWALKING,
        vec![BonusEntry::ScalingStatDistributionFixed { distribution: 1, priority: 1, content_tuning: 1 }],
    );
    lists.insert(BONUS_CHEAP_REPAIR, vec![BonusEntry::RepairCostMultiplier(50)]);
    lists.insert(BONUS_RELIC_PLUS_10, vec![BonusEntry::ItemLevel(10)]);
    lists.insert(BONUS_RELIC_PLUS_20, vec![BonusEntry::ItemLevel(20)]);
    lists
}

fn curves() -> BTreeMap<u32, Curve> {
    let mut curves = BTreeMap::new();
    curves.insert(
        CURVE_HEIRLOOM,
        Curve::new(CurveKind::Linear, vec![(1.0, 5.0), (60.0, 200.0), (70.0, 300.0)]),
    );
    curves.insert(
        RELIC_ITEM_LEVEL_CURVE,
        Curve::new(CurveKind::Linear, vec![(100.0, 10.0), (200.0, 20.0)]),
    );
    curves
}

pub fn longsword() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_LONGSWORD, "Tempered Longsword", ItemClass::Weapon, 300);
    t.inventory_type = InventoryType::TwoHandWeapon;
    t.quality = ItemQuality::Rare;
    t.base_required_level = 50;
    t.max_durability = 120;
    t.bonding = BindType::OnEquip;
    t.stats = vec![TemplateStat::new(STAT_STRENGTH, 5000), TemplateStat::new(STAT_STAMINA, 3000)];
    t.socket_colors = vec![SocketColor::Red];
    t.random_bonus_lists = vec![
        WeightedBonusList { bonus_list_id: BONUS_SUFFIX_OF_THE_BEAR, weight: 1.0 },
        WeightedBonusList { bonus_list_id: BONUS_SUFFIX_OF_THE_WHALE, weight: 1.0 },
    ];
    t.sell_price = 4200;
    t
}

pub fn helm() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_HELM, "Warden's Helm", ItemClass::Armor, 300);
    t.inventory_type = InventoryType::Head;
    t.quality = ItemQuality::Rare;
    t.base_required_level = 50;
    t.max_durability = 80;
    t.bonding = BindType::OnAcquire;
    t.stats = vec![TemplateStat::new(STAT_STAMINA, 4000)];
    t.socket_colors = vec![SocketColor::Red, SocketColor::Blue];
    t.sell_price = 3100;
    t
}

pub fn heirloom_shoulders() -> ItemTemplate {
    let mut t = ItemTemplate::new(
        TEMPLATE_HEIRLOOM_SHOULDERS,
        "Polished Heirloom Pauldrons",
        ItemClass::Armor,
        1,
    );
    t.inventory_type = InventoryType::Shoulders;
    t.quality = ItemQuality::Heirloom;
    t.max_durability = 100;
    t.bonding = BindType::ToBnetAccount;
    t.scaling_stat_distribution = 1;
    t.flags = TemplateFlags::ACCOUNT_BOUND.with(TemplateFlags::NO_DISENCHANT);
    t
}

pub fn healing_potion() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_HEALING_POTION, "Healing Potion", ItemClass::Consumable, 40);
    t.max_stack = 20;
    t.effects = vec![ItemEffect { id: 500, spell_id: 2061, trigger: 0, charges: -1, cooldown_ms: 60_000 }];
    t.sell_price = 10;
    t
}

pub fn ruby() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_RUBY, "Bold Ruby", ItemClass::Gem, 100);
    t.gem_properties = 1;
    t.max_stack = 20;
    t
}

pub fn sapphire() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_SAPPHIRE, "Solid Sapphire", ItemClass::Gem, 100);
    t.gem_properties = 2;
    t.max_stack = 20;
    t
}

pub fn iron_relic() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_IRON_RELIC, "Iron Relic", ItemClass::Gem, 100);
    t.gem_properties = 3;
    t
}

pub fn pouch() -> ItemTemplate {
    let mut t = ItemTemplate::new(TEMPLATE_POUCH, "Small Pouch", ItemClass::Container, 10);
    t.flags = TemplateFlags::HAS_LOOT;
    t
}

pub fn default_data_file() -> DataFile {
    let mut relic_bonus_lists = BTreeMap::new();
    relic_bonus_lists.insert(10, BONUS_RELIC_PLUS_10);
    relic_bonus_lists.insert(20, BONUS_RELIC_PLUS_20);

    DataFile {
        templates: vec![
            longsword(),
            helm(),
            heirloom_shoulders(),
            healing_potion(),
            ruby(),
            sapphire(),
            iron_relic(),
            pouch(),
        ],
        bonus_lists: bonus_lists(),
        curves: curves(),
        scaling_distributions: vec![ScalingStatDistribution {
            id: 1,
            min_level: 1,
            max_level: 60,
            item_level_curve: CURVE_HEIRLOOM,
        }],
        content_tunings: vec![ContentTuning { id: 1, min_level: 10, max_level: 50, disabled_for_item: false }],
        gem_properties: vec![
            GemProperties { id: 1, enchant_id: 100, gem_type: SocketColor::Red.gem_type_mask() },
            GemProperties { id: 2, enchant_id: 101, gem_type: SocketColor::Blue.gem_type_mask() },
            GemProperties { id: 3, enchant_id: 102, gem_type: SocketColor::RelicIron.gem_type_mask() },
        ],
        enchantments: vec![
            Enchantment {
                id: 100,
                name: "+5 Strength".to_string(),
                effects: [
                    EnchantmentEffect::Stat { stat_type: STAT_STRENGTH, amount: 5 },
                    EnchantmentEffect::BonusListId(BONUS_GEM_EMPOWER),
                    EnchantmentEffect::None,
                ],
            },
            Enchantment {
                id: 101,
                name: "+8 Stamina".to_string(),
                effects: [
                    EnchantmentEffect::Stat { stat_type: STAT_STAMINA, amount: 8 },
                    EnchantmentEffect::BonusListId(BONUS_GEM_EMPOWER),
                    EnchantmentEffect::None,
                ],
            },
            Enchantment {
                id: 102,
                name: "Relic Empowerment".to_string(),
                effects: [EnchantmentEffect::BonusListCurve, EnchantmentEffect::None, EnchantmentEffect::None],
            },
        ],
        item_effects: vec![ItemEffect { id: 600, spell_id: 7597, trigger: 1, charges: 0, cooldown_ms: 0 }],
        relic_bonus_lists,
    }
}
