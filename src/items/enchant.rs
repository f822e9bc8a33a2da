//! Enchantment slots
//!
//! Each item carries a fixed set of `(id, duration, charges)` triples, stored
//! as one space-separated string of `3 * MAX_ENCHANTMENT_SLOT` numbers.

use crate::error::ItemError;

pub const MAX_ENCHANTMENT_SLOT: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnchantmentSlot {
    Permanent = 0,
    Temporary = 1,
    Socket1 = 2,
    Socket2 = 3,
    Socket3 = 4,
    Bonus = 5,
    Prismatic = 6,
    OnUse = 7,
    Property0 = 8,
    Property1 = 9,
    Property2 = 10,
    Property3 = 11,
    Property4 = 12,
}

impl EnchantmentSlot {
    pub const ALL: [EnchantmentSlot; MAX_ENCHANTMENT_SLOT] = [
        EnchantmentSlot::Permanent,
        EnchantmentSlot::Temporary,
        EnchantmentSlot::Socket1,
        EnchantmentSlot::Socket2,
        EnchantmentSlot::Socket3,
        EnchantmentSlot::Bonus,
        EnchantmentSlot::Prismatic,
        EnchantmentSlot::OnUse,
        EnchantmentSlot::Property0,
        EnchantmentSlot::Property1,
        EnchantmentSlot::Property2,
        EnchantmentSlot::Property3,
        EnchantmentSlot::Property4,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Socket enchantment slot for a gem socket index
    pub fn socket(index: usize) -> Option<Self> {
        match index {
            0 => Some(EnchantmentSlot::Socket1),
            1 => Some(EnchantmentSlot::Socket2),
            2 => Some(EnchantmentSlot::Socket3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnchantmentData {
    pub id: u32,
    pub duration: u32,
    pub charges: u32,
}

impl EnchantmentData {
    pub fn is_empty(&self) -> bool {
        self.id == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Enchantments {
    slots: [EnchantmentData; MAX_ENCHANTMENT_SLOT],
}

impl Enchantments {
    pub fn get(&self, slot: EnchantmentSlot) -> EnchantmentData {
        self.slots[slot.index()]
    }

    /// Returns false when the slot already held exactly this triple
    pub fn set(&mut self, slot: EnchantmentSlot, data: EnchantmentData) -> bool {
        let current = &mut self.slots[slot.index()];
        if *current == data {
            return false;
        }
        *current = data;
        true
    }

    pub fn clear(&mut self, slot: EnchantmentSlot) -> bool {
        self.set(slot, EnchantmentData::default())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnchantmentSlot, &EnchantmentData)> {
        EnchantmentSlot::ALL.iter().copied().zip(self.slots.iter())
    }

    pub fn encode(&self) -> String {
        self.slots
            .iter()
            .map(|e| format!("{} {} {}", e.id, e.duration, e.charges))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Parse the persisted form. Missing trailing triples stay empty.
    pub fn decode(text: &str) -> Result<Self, ItemError> {
        let values = text
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|e| ItemError::Malformed {
                    field: "enchantments",
                    message: format!("{:?}: {}", token, e),
                })
            })
            .collect::<Result<Vec<u32>, _>>()?;

        let mut enchantments = Self::default();
        for (slot, triple) in enchantments.slots.iter_mut().zip(values.chunks_exact(3)) {
            *slot = EnchantmentData { id: triple[0], duration: triple[1], charges: triple[2] };
        }
        Ok(enchantments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let mut enchantments = Enchantments::default();
        enchantments.set(EnchantmentSlot::Temporary, EnchantmentData { id: 7, duration: 3600, charges: 2 });

        let text = enchantments.encode();
        let tokens: Vec<&str> = text.split(' ').collect();
        assert_eq!(tokens.len(), MAX_ENCHANTMENT_SLOT * 3);
        assert_eq!(&tokens[3..6], &["7", "3600", "2"]);

        assert_eq!(Enchantments::decode(&text).unwrap(), enchantments);
    }

    #[test]
    fn test_decode_short_and_empty() {
        let decoded = Enchantments::decode("5 10 1 6").unwrap();
        assert_eq!(decoded.get(EnchantmentSlot::Permanent), EnchantmentData { id: 5, duration: 10, charges: 1 });
        assert!(decoded.get(EnchantmentSlot::Temporary).is_empty());

        assert_eq!(Enchantments::decode("").unwrap(), Enchantments::default());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            Enchantments::decode("5 ten 1"),
            Err(ItemError::Malformed { field: "enchantments", .. })
        ));
    }

    #[test]
    fn test_set_reports_change() {
        let mut enchantments = Enchantments::default();
        let data = EnchantmentData { id: 1, duration: 0, charges: 0 };
        assert!(enchantments.set(EnchantmentSlot::Bonus, data));
        assert!(!enchantments.set(EnchantmentSlot::Bonus, data));
        assert!(enchantments.clear(EnchantmentSlot::Bonus));
    }

    #[test]
    fn test_slot_indices() {
        assert_eq!(EnchantmentSlot::from_index(12), Some(EnchantmentSlot::Property4));
        assert_eq!(EnchantmentSlot::from_index(13), None);
        assert_eq!(EnchantmentSlot::socket(1), Some(EnchantmentSlot::Socket2));
    }
}
