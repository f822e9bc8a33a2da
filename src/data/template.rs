//! Item templates
//!
//! Immutable item definitions shared by every instance of the same entry.

use serde::{Deserialize, Serialize};

use super::tables::SocketColor;

/// Stat slots carried by a template and by derived bonus data
pub const MAX_ITEM_STATS: usize = 10;
/// Socket colour slots carried by a template and by derived bonus data
pub const MAX_ITEM_SOCKETS: usize = 3;
/// Spell charge slots tracked per instance
pub const MAX_ITEM_SPELLS: usize = 5;

/// Item quality tiers, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ItemQuality {
    Poor,
    #[default]
    Normal,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Artifact,
    Heirloom,
    Token,
}

impl ItemQuality {
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => ItemQuality::Poor,
            1 => ItemQuality::Normal,
            2 => ItemQuality::Uncommon,
            3 => ItemQuality::Rare,
            4 => ItemQuality::Epic,
            5 => ItemQuality::Legendary,
            6 => ItemQuality::Artifact,
            7 => ItemQuality::Heirloom,
            8 => ItemQuality::Token,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemQuality::Poor => "Poor",
            ItemQuality::Normal => "Normal",
            ItemQuality::Uncommon => "Uncommon",
            ItemQuality::Rare => "Rare",
            ItemQuality::Epic => "Epic",
            ItemQuality::Legendary => "Legendary",
            ItemQuality::Artifact => "Artifact",
            ItemQuality::Heirloom => "Heirloom",
            ItemQuality::Token => "Token",
        }
    }
}

/// Broad item classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemClass {
    Consumable,
    Container,
    Weapon,
    Gem,
    Armor,
    Reagent,
    Projectile,
    TradeGoods,
    Recipe,
    Quest,
    Key,
    #[default]
    Miscellaneous,
}

/// Where an item goes when equipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InventoryType {
    #[default]
    NonEquip,
    Head,
    Neck,
    Shoulders,
    Body,
    Chest,
    Waist,
    Legs,
    Feet,
    Wrists,
    Hands,
    Finger,
    Trinket,
    Weapon,
    Shield,
    Ranged,
    Cloak,
    TwoHandWeapon,
    Bag,
    Relic,
}

impl InventoryType {
    pub fn is_equippable(&self) -> bool {
        !matches!(self, InventoryType::NonEquip)
    }
}

/// Binding behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BindType {
    #[default]
    None,
    OnAcquire,
    OnEquip,
    OnUse,
    Quest,
    ToAccount,
    ToBnetAccount,
}

impl BindType {
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => BindType::None,
            1 => BindType::OnAcquire,
            2 => BindType::OnEquip,
            3 => BindType::OnUse,
            4 => BindType::Quest,
            7 => BindType::ToAccount,
            8 => BindType::ToBnetAccount,
            _ => return None,
        })
    }
}

/// Template flag bitset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateFlags(pub u32);

impl TemplateFlags {
    pub const NONE: TemplateFlags = TemplateFlags(0);
    pub const CONJURED: TemplateFlags = TemplateFlags(0x0000_0002);
    pub const HAS_LOOT: TemplateFlags = TemplateFlags(0x0000_0004);
    pub const NO_DISENCHANT: TemplateFlags = TemplateFlags(0x0000_0010);
    pub const ACCOUNT_BOUND: TemplateFlags = TemplateFlags(0x0800_0000);
    pub const SCRAPPABLE: TemplateFlags = TemplateFlags(0x1000_0000);

    pub fn contains(&self, other: TemplateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: TemplateFlags) -> Self {
        TemplateFlags(self.0 | other.0)
    }
}

/// One stat modifier slot on a template
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemplateStat {
    pub stat_type: i32,
    pub percent_editor: i32,
    #[serde(default = "default_socket_cost")]
    pub socket_cost_multiplier: f32,
}

fn default_socket_cost() -> f32 {
    1.0
}

impl TemplateStat {
    pub fn new(stat_type: i32, percent_editor: i32) -> Self {
        Self { stat_type, percent_editor, socket_cost_multiplier: 1.0 }
    }
}

/// An innate or granted on-use/on-equip effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemEffect {
    pub id: u32,
    pub spell_id: u32,
    #[serde(default)]
    pub trigger: u8,
    /// Charges granted on creation (negative = consumed on last charge)
    #[serde(default)]
    pub charges: i32,
    #[serde(default)]
    pub cooldown_ms: i32,
}

/// A bonus list a freshly dropped item may roll, with its relative weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedBonusList {
    pub bonus_list_id: u32,
    pub weight: f32,
}

/// Immutable item definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub class: ItemClass,
    #[serde(default)]
    pub subclass: u32,
    #[serde(default)]
    pub inventory_type: InventoryType,
    #[serde(default)]
    pub quality: ItemQuality,
    pub base_item_level: u32,
    #[serde(default)]
    pub base_required_level: i32,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    #[serde(default)]
    pub max_durability: u32,
    /// Lifetime in seconds, 0 = permanent
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub bonding: BindType,
    #[serde(default)]
    pub stats: Vec<TemplateStat>,
    #[serde(default)]
    pub socket_colors: Vec<SocketColor>,
    #[serde(default)]
    pub scaling_stat_distribution: u32,
    #[serde(default)]
    pub content_tuning: u32,
    /// Gem properties id, non-zero only for gems
    #[serde(default)]
    pub gem_properties: u32,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
    #[serde(default)]
    pub flags: TemplateFlags,
    #[serde(default)]
    pub random_bonus_lists: Vec<WeightedBonusList>,
    #[serde(default)]
    pub pvp_item_level_bonus: u32,
    #[serde(default)]
    pub sell_price: u32,
}

fn default_max_stack() -> u32 {
    1
}

impl ItemTemplate {
    pub fn new(id: u32, name: impl Into<String>, class: ItemClass, base_item_level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            class,
            subclass: 0,
            inventory_type: InventoryType::NonEquip,
            quality: ItemQuality::Normal,
            base_item_level,
            base_required_level: 0,
            max_stack: 1,
            max_durability: 0,
            duration: 0,
            bonding: BindType::None,
            stats: Vec::new(),
            socket_colors: Vec::new(),
            scaling_stat_distribution: 0,
            content_tuning: 0,
            gem_properties: 0,
            effects: Vec::new(),
            flags: TemplateFlags::NONE,
            random_bonus_lists: Vec::new(),
            pvp_item_level_bonus: 0,
            sell_price: 0,
        }
    }

    pub fn has_flag(&self, flag: TemplateFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Stat slot `index`, if the template defines one
    pub fn stat(&self, index: usize) -> Option<&TemplateStat> {
        self.stats.get(index)
    }

    /// Socket colour at `index`, `SocketColor::None` past the template's list
    pub fn socket_color(&self, index: usize) -> SocketColor {
        self.socket_colors.get(index).copied().unwrap_or_default()
    }

    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }
}
