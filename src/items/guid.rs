//! Identities

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemGuid(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerGuid(pub u64);

impl fmt::Display for ItemGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item-{}", self.0)
    }
}

impl fmt::Display for OwnerGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Owner-{}", self.0)
    }
}

/// Hands out item guids in ascending order
#[derive(Debug, Clone)]
pub struct GuidGenerator {
    next: u64,
}

impl Default for GuidGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl GuidGenerator {
    /// Continue after the highest guid already in storage
    pub fn starting_after(highest: u64) -> Self {
        Self { next: highest.saturating_add(1) }
    }

    pub fn generate(&mut self) -> ItemGuid {
        let guid = ItemGuid(self.next);
        self.next += 1;
        guid
    }

    pub fn peek(&self) -> u64 {
        self.next
    }
}
