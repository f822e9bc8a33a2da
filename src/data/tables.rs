//! Lookup table records
//!
//! Bonus lists, level curves, scaling distributions, content tuning,
//! gem properties and enchantments. Everything here is read-only once loaded.

use serde::{Deserialize, Serialize};

use super::template::{BindType, ItemQuality};

/// Effect slots on an enchantment record
pub const MAX_ENCHANTMENT_EFFECTS: usize = 3;

/// Curve mapping a gem's effective item level to a relic item-level delta
pub const RELIC_ITEM_LEVEL_CURVE: u32 = 1718;

/// Socket colours, each accepting a set of gem types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SocketColor {
    #[default]
    None,
    Meta,
    Red,
    Yellow,
    Blue,
    Hydraulic,
    Cogwheel,
    Prismatic,
    RelicIron,
    RelicBlood,
    RelicShadow,
    RelicFel,
    RelicArcane,
    RelicFrost,
    RelicFire,
    RelicWater,
    RelicLife,
    RelicWind,
    RelicHoly,
}

impl SocketColor {
    pub fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => SocketColor::None,
            1 => SocketColor::Meta,
            2 => SocketColor::Red,
            3 => SocketColor::Yellow,
            4 => SocketColor::Blue,
            5 => SocketColor::Hydraulic,
            6 => SocketColor::Cogwheel,
            7 => SocketColor::Prismatic,
            8 => SocketColor::RelicIron,
            9 => SocketColor::RelicBlood,
            10 => SocketColor::RelicShadow,
            11 => SocketColor::RelicFel,
            12 => SocketColor::RelicArcane,
            13 => SocketColor::RelicFrost,
            14 => SocketColor::RelicFire,
            15 => SocketColor::RelicWater,
            16 => SocketColor::RelicLife,
            17 => SocketColor::RelicWind,
            18 => SocketColor::RelicHoly,
            _ => return None,
        })
    }

    /// Bitmask of gem types this socket accepts
    pub fn gem_type_mask(&self) -> u32 {
        match self {
            SocketColor::None => 0,
            SocketColor::Meta => 0x0_0001,
            SocketColor::Red => 0x0_0002,
            SocketColor::Yellow => 0x0_0004,
            SocketColor::Blue => 0x0_0008,
            SocketColor::Hydraulic => 0x0_0010,
            SocketColor::Cogwheel => 0x0_0020,
            SocketColor::Prismatic => 0x0_000E,
            SocketColor::RelicIron => 0x0_0040,
            SocketColor::RelicBlood => 0x0_0080,
            SocketColor::RelicShadow => 0x0_0100,
            SocketColor::RelicFel => 0x0_0200,
            SocketColor::RelicArcane => 0x0_0400,
            SocketColor::RelicFrost => 0x0_0800,
            SocketColor::RelicFire => 0x0_1000,
            SocketColor::RelicWater => 0x0_2000,
            SocketColor::RelicLife => 0x0_4000,
            SocketColor::RelicWind => 0x0_8000,
            SocketColor::RelicHoly => 0x1_0000,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, SocketColor::None)
    }
}

/// Numeric bonus type ids as they appear in raw bonus rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BonusType {
    ItemLevel = 1,
    Stat = 2,
    Quality = 3,
    Suffix = 5,
    Socket = 6,
    Appearance = 7,
    RequiredLevel = 8,
    RepairCostMultiplier = 10,
    ScalingStatDistribution = 11,
    ScalingStatDistributionFixed = 13,
    Bonding = 16,
    RelicType = 17,
    OverrideRequiredLevel = 18,
    OverrideCanDisenchant = 21,
    OverrideCanScrap = 22,
    ItemEffectId = 23,
    RequiredLevelCurve = 27,
}

impl BonusType {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            1 => BonusType::ItemLevel,
            2 => BonusType::Stat,
            3 => BonusType::Quality,
            5 => BonusType::Suffix,
            6 => BonusType::Socket,
            7 => BonusType::Appearance,
            8 => BonusType::RequiredLevel,
            10 => BonusType::RepairCostMultiplier,
            11 => BonusType::ScalingStatDistribution,
            13 => BonusType::ScalingStatDistributionFixed,
            16 => BonusType::Bonding,
            17 => BonusType::RelicType,
            18 => BonusType::OverrideRequiredLevel,
            21 => BonusType::OverrideCanDisenchant,
            22 => BonusType::OverrideCanScrap,
            23 => BonusType::ItemEffectId,
            27 => BonusType::RequiredLevelCurve,
            _ => return None,
        })
    }
}

/// One typed adjustment inside a bonus list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BonusEntry {
    ItemLevel(i32),
    Stat { stat_type: i32, weight: i32 },
    Quality(ItemQuality),
    Suffix { suffix_id: i32, priority: i32 },
    Socket { count: i32, color: SocketColor },
    Appearance { modifier_id: u32, priority: i32 },
    RequiredLevel(i32),
    /// Percentage applied multiplicatively to the repair cost
    RepairCostMultiplier(i32),
    ScalingStatDistribution { distribution: u32, priority: i32, content_tuning: u32 },
    ScalingStatDistributionFixed { distribution: u32, priority: i32, content_tuning: u32 },
    Bonding(BindType),
    RelicType(i32),
    OverrideRequiredLevel(i32),
    OverrideCanDisenchant(bool),
    OverrideCanScrap(bool),
    ItemEffectId(u32),
    RequiredLevelCurve { curve: u32, content_tuning: u32, priority: i32 },
}

impl BonusEntry {
    /// Decode a raw `(type, values)` row. Unknown types and out-of-range
    /// enum arguments decode to `None`.
    pub fn from_raw(bonus_type: u8, values: [i32; 4]) -> Option<Self> {
        let [v0, v1, v2, _] = values;
        Some(match BonusType::from_raw(bonus_type)? {
            BonusType::ItemLevel => BonusEntry::ItemLevel(v0),
            BonusType::Stat => BonusEntry::Stat { stat_type: v0, weight: v1 },
            BonusType::Quality => BonusEntry::Quality(ItemQuality::from_raw(v0)?),
            BonusType::Suffix => BonusEntry::Suffix { suffix_id: v0, priority: v1 },
            BonusType::Socket => BonusEntry::Socket { count: v0, color: SocketColor::from_raw(v1)? },
            BonusType::Appearance => BonusEntry::Appearance { modifier_id: v0 as u32, priority: v1 },
            BonusType::RequiredLevel => BonusEntry::RequiredLevel(v0),
            BonusType::RepairCostMultiplier => BonusEntry::RepairCostMultiplier(v0),
            BonusType::ScalingStatDistribution => BonusEntry::ScalingStatDistribution {
                distribution: v0 as u32,
                priority: v1,
                content_tuning: v2 as u32,
            },
            BonusType::ScalingStatDistributionFixed => BonusEntry::ScalingStatDistributionFixed {
                distribution: v0 as u32,
                priority: v1,
                content_tuning: v2 as u32,
            },
            BonusType::Bonding => BonusEntry::Bonding(BindType::from_raw(v0)?),
            BonusType::RelicType => BonusEntry::RelicType(v0),
            BonusType::OverrideRequiredLevel => BonusEntry::OverrideRequiredLevel(v0),
            BonusType::OverrideCanDisenchant => BonusEntry::OverrideCanDisenchant(v0 != 0),
            BonusType::OverrideCanScrap => BonusEntry::OverrideCanScrap(v0 != 0),
            BonusType::ItemEffectId => BonusEntry::ItemEffectId(v0 as u32),
            BonusType::RequiredLevelCurve => BonusEntry::RequiredLevelCurve {
                curve: v0 as u32,
                content_tuning: v1 as u32,
                priority: v2,
            },
        })
    }
}

/// How a curve interpolates between its points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveKind {
    Constant,
    #[default]
    Linear,
    Cosine,
}

/// A level-indexed scaling curve. Points are sorted by x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    #[serde(default)]
    pub kind: CurveKind,
    pub points: Vec<(f32, f32)>,
}

impl Curve {
    pub fn new(kind: CurveKind, mut points: Vec<(f32, f32)>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { kind, points }
    }

    /// Evaluate the curve at `x`, clamping to the end points
    pub fn value_at(&self, x: f32) -> f32 {
        let Some(&(_, first_y)) = self.points.first() else {
            return 0.0;
        };

        if matches!(self.kind, CurveKind::Constant) {
            return first_y;
        }

        let next = self.points.iter().take_while(|(px, _)| *px <= x).count();
        if next == 0 {
            return first_y;
        }
        if next >= self.points.len() {
            return self.points[self.points.len() - 1].1;
        }

        let (x0, y0) = self.points[next - 1];
        let (x1, y1) = self.points[next];
        let dx = x1 - x0;
        if dx == 0.0 {
            return y1;
        }

        let mu = (x - x0) / dx;
        let mu = match self.kind {
            CurveKind::Cosine => (1.0 - (mu * std::f32::consts::PI).cos()) / 2.0,
            _ => mu,
        };
        y0 + mu * (y1 - y0)
    }
}

/// Level bounds and the level to item level curve for scaling items
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingStatDistribution {
    pub id: u32,
    pub min_level: u32,
    pub max_level: u32,
    pub item_level_curve: u32,
}

/// Content tuning level bracket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentTuning {
    pub id: u32,
    pub min_level: u32,
    pub max_level: u32,
    /// When set, items ignore this bracket
    #[serde(default)]
    pub disabled_for_item: bool,
}

impl ContentTuning {
    pub fn clamp(&self, level: u32) -> u32 {
        level.max(self.min_level).min(self.max_level)
    }
}

/// Gem colour and the enchantment a socketed gem applies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GemProperties {
    pub id: u32,
    pub enchant_id: u32,
    /// Gem type bitmask, matched against `SocketColor::gem_type_mask`
    pub gem_type: u32,
}

/// One effect slot of an enchantment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnchantmentEffect {
    #[default]
    None,
    /// Grants a fixed bonus list
    BonusListId(u32),
    /// Grants a bonus list picked by the relic item-level curve
    BonusListCurve,
    Stat { stat_type: i32, amount: i32 },
}

/// Enchantment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effects: [EnchantmentEffect; MAX_ENCHANTMENT_EFFECTS],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve() {
        let curve = Curve::new(CurveKind::Linear, vec![(10.0, 100.0), (20.0, 200.0)]);
        assert_eq!(curve.value_at(5.0), 100.0);
        assert_eq!(curve.value_at(15.0), 150.0);
        assert_eq!(curve.value_at(25.0), 200.0);
    }

    #[test]
    fn test_cosine_curve_midpoint() {
        let curve = Curve::new(CurveKind::Cosine, vec![(0.0, 0.0), (10.0, 100.0)]);
        let mid = curve.value_at(5.0);
        assert!((mid - 50.0).abs() < 0.01);
        assert!(curve.value_at(2.5) < 25.0);
    }

    #[test]
    fn test_constant_and_empty_curve() {
        let constant = Curve::new(CurveKind::Constant, vec![(1.0, 42.0), (5.0, 99.0)]);
        assert_eq!(constant.value_at(100.0), 42.0);

        let empty = Curve::new(CurveKind::Linear, Vec::new());
        assert_eq!(empty.value_at(10.0), 0.0);
    }

    #[test]
    fn test_bonus_from_raw() {
        assert_eq!(BonusEntry::from_raw(1, [15, 0, 0, 0]), Some(BonusEntry::ItemLevel(15)));
        assert_eq!(
            BonusEntry::from_raw(5, [300, 2, 0, 0]),
            Some(BonusEntry::Suffix { suffix_id: 300, priority: 2 })
        );
        assert_eq!(
            BonusEntry::from_raw(27, [9, 4, 1, 0]),
            Some(BonusEntry::RequiredLevelCurve { curve: 9, content_tuning: 4, priority: 1 })
        );
        assert_eq!(BonusEntry::from_raw(99, [1, 2, 3, 4]), None);
        assert_eq!(BonusEntry::from_raw(3, [42, 0, 0, 0]), None);
    }

    #[test]
    fn test_prismatic_accepts_primary_colors() {
        let prismatic = SocketColor::Prismatic.gem_type_mask();
        assert_ne!(prismatic & SocketColor::Red.gem_type_mask(), 0);
        assert_ne!(prismatic & SocketColor::Blue.gem_type_mask(), 0);
        assert_eq!(prismatic & SocketColor::Meta.gem_type_mask(), 0);
    }
}
