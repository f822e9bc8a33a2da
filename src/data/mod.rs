//! Game data: templates and lookup tables
//!
//! Everything in here is read-only once loaded. Consumers go through the
//! `GameData` trait so tests can build small in-memory catalogs.

pub mod template;
pub mod tables;
pub mod lookup;
pub mod loader;
pub mod defaults;

pub use template::{
    ItemTemplate, ItemClass, ItemQuality, InventoryType, BindType, TemplateFlags, TemplateStat,
    ItemEffect, WeightedBonusList, MAX_ITEM_STATS, MAX_ITEM_SOCKETS, MAX_ITEM_SPELLS,
};
pub use tables::{
    BonusType, BonusEntry, Curve, CurveKind, ScalingStatDistribution, ContentTuning, GemProperties,
    Enchantment, EnchantmentEffect, SocketColor, MAX_ENCHANTMENT_EFFECTS, RELIC_ITEM_LEVEL_CURVE,
};
pub use lookup::GameData;
pub use loader::{DataManager, DataFile};
