//! Dirty-state tag

/// What the next save has to do with an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemUpdateState {
    /// Never persisted, next save inserts
    #[default]
    New,
    Changed,
    /// Next save deletes
    Removed,
    Unchanged,
}

impl ItemUpdateState {
    /// New and Changed both upsert
    pub fn needs_upsert(&self) -> bool {
        matches!(self, ItemUpdateState::New | ItemUpdateState::Changed)
    }
}
