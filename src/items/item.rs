//! Item instances
//!
//! A mutable item: identity, ownership, stack, durability, enchantments,
//! applied bonus lists and sockets, plus the dirty-state that decides what
//! the next save writes.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

use crate::data::{BindType, GameData, ItemTemplate, TemplateFlags, MAX_ITEM_SPELLS};
use crate::error::ItemError;
use crate::save::{GemRecord, GiftRecord, ItemRecord, ModifierRecord, PersistedItem, RefundRecord, Transaction};
use super::bonus::{self, BonusData};
use super::enchant::{EnchantmentData, EnchantmentSlot, Enchantments};
use super::gems::{self, SocketedGem, MAX_GEM_SOCKETS};
use super::guid::{GuidGenerator, ItemGuid, OwnerGuid};
use super::item_level::{self, ItemLevelContext};
use super::owner::ItemOwner;
use super::state::ItemUpdateState;

/// Played seconds after which a purchase can no longer be refunded
pub const REFUND_WINDOW_SECS: u64 = 2 * 60 * 60;

/// Per-instance flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags(pub u32);

impl ItemFlags {
    pub const NONE: ItemFlags = ItemFlags(0);
    /// Bound to its owner
    pub const SOULBOUND: ItemFlags = ItemFlags(0x0000_0001);
    /// Gift-wrapped; has a gift row
    pub const WRAPPED: ItemFlags = ItemFlags(0x0000_0008);
    /// Can still be sold back; has a refund row
    pub const REFUNDABLE: ItemFlags = ItemFlags(0x0000_1000);

    /// True when every bit of `other` is set
    pub fn contains(&self, other: ItemFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ItemFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ItemFlags) {
        self.0 &= !other.0;
    }
}

/// Tracked modifiers, persisted only when one is non-zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemModifiers {
    /// Timewalker-style fixed scaling level
    pub fixed_scaling_level: u32,
    pub artifact_knowledge_level: u32,
}

impl ItemModifiers {
    pub fn is_empty(&self) -> bool {
        self.fixed_scaling_level == 0 && self.artifact_knowledge_level == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundInfo {
    pub recipient: OwnerGuid,
    pub paid_money: u64,
    pub paid_extended_cost: u32,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn parse_list<T>(text: &str, field: &'static str) -> Result<Vec<T>, ItemError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.split_whitespace()
        .map(|token| {
            token.parse().map_err(|e: T::Err| ItemError::Malformed {
                field,
                message: format!("{:?}: {}", token, e),
            })
        })
        .collect()
}

fn join_list<T: ToString>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct Item {
    guid: ItemGuid,
    template: Arc<ItemTemplate>,
    owner: Option<OwnerGuid>,
    creator: Option<OwnerGuid>,
    gift_creator: Option<OwnerGuid>,
    count: u32,
    durability: u32,
    duration: u32,
    spell_charges: [i32; MAX_ITEM_SPELLS],
    flags: ItemFlags,
    enchantments: Enchantments,
    /// Application order matters
    bonus_list_ids: Vec<u32>,
    random_bonus_list_id: u32,
    gems: [Option<SocketedGem>; MAX_GEM_SOCKETS],
    gem_scaling_levels: [u32; MAX_GEM_SOCKETS],
    modifiers: ItemModifiers,
    refund: Option<RefundInfo>,
    context: u8,
    created_at: u64,
    played_time: u32,
    played_checkpoint: u64,
    unlooted: bool,
    bonus: BonusData,
    state: ItemUpdateState,
    queue_pos: Option<usize>,
    /// Dropped for persistence purposes; saves do nothing
    released: bool,
}

impl Item {
    /// Create a fresh instance. The stack is capped at the template's max stack.
    pub fn create(
        template_id: u32,
        count: u32,
        context: u8,
        owner: Option<OwnerGuid>,
        guids: &mut GuidGenerator,
        data: &dyn GameData,
    ) -> Result<Self, ItemError> {
        if count == 0 {
            return Err(ItemError::ZeroCount);
        }
        let template = data
            .item_template(template_id)
            .ok_or(ItemError::UnknownTemplate(template_id))?;

        let mut spell_charges = [0; MAX_ITEM_SPELLS];
        for (charges, effect) in spell_charges.iter_mut().zip(&template.effects) {
            *charges = effect.charges;
        }

        let now = unix_now();
        let guid = guids.generate();
        log::debug!("Created {} from template {} ({})", guid, template.id, template.name);

        Ok(Self {
            guid,
            owner,
            creator: None,
            gift_creator: None,
            count: count.min(template.max_stack.max(1)),
            durability: template.max_durability,
            duration: template.duration,
            spell_charges,
            flags: ItemFlags::NONE,
            enchantments: Enchantments::default(),
            bonus_list_ids: Vec::new(),
            random_bonus_list_id: 0,
            gems: [None; MAX_GEM_SOCKETS],
            gem_scaling_levels: [0; MAX_GEM_SOCKETS],
            modifiers: ItemModifiers::default(),
            refund: None,
            context,
            created_at: now,
            played_time: 0,
            played_checkpoint: now,
            unlooted: false,
            bonus: BonusData::new(&template),
            template,
            state: ItemUpdateState::New,
            queue_pos: None,
            released: false,
        })
    }

    /// Hydrate an instance from its stored rows. Fix-ups applied on the way
    /// leave the item `Changed`; otherwise it starts `Unchanged`.
    pub fn load(persisted: &PersistedItem, data: &dyn GameData) -> Result<Self, ItemError> {
        let record = &persisted.item;
        let template = data
            .item_template(record.template_id)
            .ok_or(ItemError::UnknownTemplate(record.template_id))?;
        if record.count == 0 {
            return Err(ItemError::ZeroCount);
        }

        let enchantments = Enchantments::decode(&record.enchantments)?;
        let bonus_list_ids: Vec<u32> = parse_list(&record.bonus_list_ids, "bonus_list_ids")?;
        let mut spell_charges = [0; MAX_ITEM_SPELLS];
        for (slot, value) in spell_charges
            .iter_mut()
            .zip(parse_list::<i32>(&record.charges, "charges")?)
        {
            *slot = value;
        }

        let mut gems = [None; MAX_GEM_SOCKETS];
        let mut gem_scaling_levels = [0; MAX_GEM_SOCKETS];
        for row in persisted.gems.iter().filter(|row| !row.is_empty()) {
            let slot = row.slot as usize;
            if slot >= MAX_GEM_SOCKETS {
                return Err(ItemError::InvalidSlot { kind: "gem", slot });
            }
            gems[slot] = Some(SocketedGem::from_persisted(row.gem_item_id, &row.bonus_list_ids, row.context)?);
            gem_scaling_levels[slot] = row.scaling_level;
        }

        let modifiers = persisted
            .modifiers
            .map(|m| ItemModifiers {
                fixed_scaling_level: m.fixed_scaling_level,
                artifact_knowledge_level: m.artifact_knowledge_level,
            })
            .unwrap_or_default();

        let mut item = Self {
            guid: ItemGuid(record.guid),
            owner: record.owner.map(OwnerGuid),
            creator: record.creator.map(OwnerGuid),
            gift_creator: record.gift_creator.map(OwnerGuid),
            count: record.count,
            durability: record.durability,
            duration: record.duration,
            spell_charges,
            flags: ItemFlags(record.flags),
            enchantments,
            bonus: BonusData::from_bonus_lists(&template, &bonus_list_ids, data),
            bonus_list_ids,
            random_bonus_list_id: record.random_bonus_list_id,
            gems,
            gem_scaling_levels,
            modifiers,
            refund: persisted.refund.map(|r| RefundInfo {
                recipient: OwnerGuid(r.recipient),
                paid_money: r.paid_money,
                paid_extended_cost: r.paid_extended_cost,
            }),
            context: record.context,
            created_at: record.created_at,
            played_time: record.played_time,
            played_checkpoint: unix_now(),
            unlooted: record.unlooted,
            template,
            state: ItemUpdateState::Unchanged,
            queue_pos: None,
            released: false,
        };
        item.rederive_gems(data);

        let mut needs_save = false;

        let max_stack = item.template.max_stack.max(1);
        if item.count > max_stack {
            log::warn!("{} had stack {} above max {}, clamping", item.guid, item.count, max_stack);
            item.count = max_stack;
            needs_save = true;
        }

        if !item.is_wrapped() && item.durability > item.max_durability() {
            log::warn!(
                "{} had durability {} above max {}, clamping",
                item.guid,
                item.durability,
                item.max_durability()
            );
            item.durability = item.max_durability();
            needs_save = true;
        }

        if item.is_soulbound() && item.bonus.bonding == BindType::None {
            log::warn!("{} is soulbound but its bonding is none, clearing", item.guid);
            item.flags.remove(ItemFlags::SOULBOUND);
            needs_save = true;
        }

        if item.flags.contains(ItemFlags::REFUNDABLE) && item.refund.is_none() {
            log::warn!("{} is refundable without refund data, clearing", item.guid);
            item.flags.remove(ItemFlags::REFUNDABLE);
            needs_save = true;
        }

        if needs_save {
            item.state = ItemUpdateState::Changed;
        }
        Ok(item)
    }

    /// Move through the dirty-state machine, queueing with `owner` when given
    pub fn set_state(&mut self, next: ItemUpdateState, owner: Option<&mut ItemOwner>) {
        if self.released {
            return;
        }

        if self.state == ItemUpdateState::New && next == ItemUpdateState::Removed {
            // Never persisted, so nothing to delete
            if let Some(owner) = owner {
                owner.dequeue(self);
                owner.remove_refund_reference(self.guid);
            }
            self.released = true;
            return;
        }

        if next == ItemUpdateState::Unchanged {
            self.queue_pos = None;
            self.state = ItemUpdateState::Unchanged;
            return;
        }

        // New stays New until the first save
        if self.state != ItemUpdateState::New {
            self.state = next;
        }
        if let Some(owner) = owner {
            owner.enqueue(self);
        }
    }

    fn mark_changed(&mut self) {
        self.set_state(ItemUpdateState::Changed, None);
    }

    /// Push this item's writes into `tx` according to its dirty-state
    pub fn save(&mut self, tx: &mut Transaction) {
        if self.released {
            return;
        }

        match self.state {
            state if state.needs_upsert() => {
                let was_changed = self.state == ItemUpdateState::Changed;
                let guid = self.guid.0;

                tx.upsert_item(self.to_record());

                tx.delete_gems(guid);
                for slot in 0..MAX_GEM_SOCKETS {
                    tx.insert_gem(self.gem_record(slot));
                }

                tx.delete_modifiers(guid);
                if !self.modifiers.is_empty() {
                    tx.insert_modifiers(ModifierRecord {
                        item_guid: guid,
                        fixed_scaling_level: self.modifiers.fixed_scaling_level,
                        artifact_knowledge_level: self.modifiers.artifact_knowledge_level,
                    });
                }

                if was_changed && self.is_wrapped() {
                    tx.update_gift_owner(guid, self.owner.map(|o| o.0));
                }

                match self.refund {
                    Some(refund) => tx.upsert_refund(RefundRecord {
                        item_guid: guid,
                        recipient: refund.recipient.0,
                        paid_money: refund.paid_money,
                        paid_extended_cost: refund.paid_extended_cost,
                    }),
                    None if was_changed => tx.delete_refund(guid),
                    None => {}
                }

                self.set_state(ItemUpdateState::Unchanged, None);
            }
            ItemUpdateState::Removed => {
                self.delete(tx);
                self.released = true;
            }
            _ => {}
        }
    }

    /// Push deletes for every row of this item into `tx`
    pub fn delete(&self, tx: &mut Transaction) {
        let guid = self.guid.0;
        tx.delete_item(guid);
        tx.delete_gems(guid);
        tx.delete_modifiers(guid);
        if self.is_wrapped() {
            tx.delete_gift(guid);
        }
        tx.delete_refund(guid);
        if self.template.has_flag(TemplateFlags::HAS_LOOT) && self.unlooted {
            tx.delete_stored_loot(guid);
        }
    }

    /// Flatten the instance into its item row
    pub fn to_record(&self) -> ItemRecord {
        ItemRecord {
            guid: self.guid.0,
            template_id: self.template.id,
            owner: self.owner.map(|o| o.0),
            creator: self.creator.map(|o| o.0),
            gift_creator: self.gift_creator.map(|o| o.0),
            count: self.count,
            duration: self.duration,
            charges: join_list(&self.spell_charges),
            flags: self.flags.0,
            enchantments: self.enchantments.encode(),
            random_bonus_list_id: self.random_bonus_list_id,
            durability: self.durability,
            created_at: self.created_at,
            played_time: self.played_time,
            context: self.context,
            bonus_list_ids: join_list(&self.bonus_list_ids),
            unlooted: self.unlooted,
        }
    }

    fn gem_record(&self, slot: usize) -> GemRecord {
        match &self.gems[slot] {
            Some(gem) => GemRecord {
                item_guid: self.guid.0,
                slot: slot as u8,
                gem_item_id: gem.item_id,
                bonus_list_ids: gem.bonus_list_text(),
                context: gem.context,
                scaling_level: self.gem_scaling_levels[slot],
            },
            None => GemRecord::empty(self.guid.0, slot as u8),
        }
    }

    // Bonus lists

    /// Applied bonus lists in fold order
    pub fn bonus_list_ids(&self) -> &[u32] {
        &self.bonus_list_ids
    }

    pub fn has_bonus_list(&self, bonus_list_id: u32) -> bool {
        self.bonus_list_ids.contains(&bonus_list_id)
    }

    /// Append and fold a bonus list. Duplicates and unknown lists are not recorded.
    pub fn add_bonus_list(&mut self, bonus_list_id: u32, data: &dyn GameData) {
        if self.has_bonus_list(bonus_list_id) {
            return;
        }
        if data.bonus_list(bonus_list_id).is_some() {
            self.bonus_list_ids.push(bonus_list_id);
            self.bonus.add_bonus_list(bonus_list_id, data);
        }
        self.mark_changed();
    }

    /// Replace the applied bonus lists and rebuild the derived data
    pub fn set_bonuses(&mut self, bonus_list_ids: Vec<u32>, data: &dyn GameData) {
        self.bonus_list_ids = bonus_list_ids;
        self.rebuild_bonus(data);
        self.mark_changed();
    }

    /// Drop every bonus list. Template values and gem contributions remain.
    pub fn clear_bonuses(&mut self, data: &dyn GameData) {
        self.set_bonuses(Vec::new(), data);
    }

    fn rebuild_bonus(&mut self, data: &dyn GameData) {
        self.bonus = BonusData::from_bonus_lists(&self.template, &self.bonus_list_ids, data);
        self.rederive_gems(data);
    }

    fn rederive_gems(&mut self, data: &dyn GameData) {
        for slot in 0..MAX_GEM_SOCKETS {
            let contribution = match &self.gems[slot] {
                Some(gem) => gems::gem_contribution(gem, self.gem_scaling_levels[slot], data),
                None => gems::GemContribution::default(),
            };
            self.bonus.gem_item_level_bonus[slot] = contribution.item_level_bonus;
            self.bonus.gem_relic_types[slot] = contribution.relic_type;
        }
    }

    /// Bonus list picked by the random roll, 0 when none
    pub fn random_bonus_list_id(&self) -> u32 {
        self.random_bonus_list_id
    }

    /// Record the randomly rolled bonus list and apply it
    pub fn set_random_bonus_list(&mut self, bonus_list_id: u32, data: &dyn GameData) {
        if bonus_list_id == 0 {
            return;
        }
        self.random_bonus_list_id = bonus_list_id;
        self.add_bonus_list(bonus_list_id, data);
    }

    /// Roll one of the template's weighted random bonus lists
    pub fn roll_random_bonus_list(&mut self, rng: &mut impl Rng, data: &dyn GameData) -> Option<u32> {
        let rolled = bonus::roll_random_bonus_list(&self.template, rng)?;
        self.set_random_bonus_list(rolled, data);
        Some(rolled)
    }

    // Gems

    /// Gem in `slot`, if any
    pub fn gem(&self, slot: usize) -> Option<&SocketedGem> {
        self.gems.get(slot).and_then(Option::as_ref)
    }

    pub fn gems(&self) -> &[Option<SocketedGem>; MAX_GEM_SOCKETS] {
        &self.gems
    }

    /// Level the gem in `slot` was scaled at
    pub fn gem_scaling_level(&self, slot: usize) -> u32 {
        self.gem_scaling_levels.get(slot).copied().unwrap_or(0)
    }

    /// Put `gem` in `slot` and recompute that socket's contribution
    pub fn assign_gem(
        &mut self,
        slot: usize,
        gem: SocketedGem,
        scaling_level: u32,
        data: &dyn GameData,
    ) -> Result<(), ItemError> {
        if slot >= MAX_GEM_SOCKETS {
            return Err(ItemError::InvalidSlot { kind: "gem", slot });
        }

        self.gem_scaling_levels[slot] = scaling_level;
        let contribution = gems::gem_contribution(&gem, scaling_level, data);
        self.bonus.gem_item_level_bonus[slot] = contribution.item_level_bonus;
        self.bonus.gem_relic_types[slot] = contribution.relic_type;
        self.gems[slot] = Some(gem);
        self.mark_changed();
        Ok(())
    }

    /// Take the gem out of `slot` and drop its contribution.
    /// Returns the removed gem, or `None` when the socket was empty.
    pub fn remove_gem(&mut self, slot: usize) -> Result<Option<SocketedGem>, ItemError> {
        if slot >= MAX_GEM_SOCKETS {
            return Err(ItemError::InvalidSlot { kind: "gem", slot });
        }

        let removed = self.gems[slot].take();
        if removed.is_some() {
            self.gem_scaling_levels[slot] = 0;
            self.bonus.gem_item_level_bonus[slot] = 0;
            self.bonus.gem_relic_types[slot] = -1;
            self.mark_changed();
        }
        Ok(removed)
    }

    /// True when every gem matches its template socket colour
    pub fn gems_fit_sockets(&self, data: &dyn GameData) -> bool {
        gems::gems_fit_sockets(&self.gems, &self.template, data)
    }

    // Enchantments

    /// Enchantment in `slot`; id 0 when empty
    pub fn enchantment(&self, slot: EnchantmentSlot) -> EnchantmentData {
        self.enchantments.get(slot)
    }

    pub fn enchantments(&self) -> &Enchantments {
        &self.enchantments
    }

    /// Overwrite one enchantment slot. Writing the same triple again is a no-op.
    pub fn set_enchantment(&mut self, slot: EnchantmentSlot, id: u32, duration: u32, charges: u32) {
        if self.enchantments.set(slot, EnchantmentData { id, duration, charges }) {
            self.mark_changed();
        }
    }

    /// Empty one enchantment slot
    pub fn clear_enchantment(&mut self, slot: EnchantmentSlot) {
        if self.enchantments.clear(slot) {
            self.mark_changed();
        }
    }

    // Levels

    /// Item level for the given owner context
    pub fn item_level(&self, ctx: &ItemLevelContext, data: &dyn GameData) -> u32 {
        item_level::item_level(&self.template, &self.bonus, ctx, self.modifiers.fixed_scaling_level, data)
    }

    /// Level a character needs to use the item.
    ///
    /// A required-level curve wins over an override, which wins over the
    /// fixed scaling level of a scaled item. Otherwise the folded value is used.
    pub fn required_level(&self, data: &dyn GameData) -> i32 {
        let fixed_level = self.modifiers.fixed_scaling_level;
        if self.bonus.required_level_curve != 0 {
            return data.curve_value(self.bonus.required_level_curve, fixed_level as f32) as i32;
        }
        if self.bonus.required_level_override != 0 {
            return self.bonus.required_level_override;
        }
        if self.bonus.has_fixed_level && data.scaling_distribution(self.bonus.scaling_stat_distribution).is_some() {
            return fixed_level as i32;
        }
        self.bonus.required_level
    }

    /// Pinned scaling level, 0 when unset
    pub fn fixed_level(&self) -> u32 {
        self.modifiers.fixed_scaling_level
    }

    /// Pin the scaling level of a fixed-level item. Only the first call sticks.
    pub fn set_fixed_level(&mut self, level: u32, data: &dyn GameData) {
        if !self.bonus.has_fixed_level || self.modifiers.fixed_scaling_level != 0 {
            return;
        }
        let Some(ssd) = data.scaling_distribution(self.bonus.scaling_stat_distribution) else {
            return;
        };

        let mut level = level.max(ssd.min_level).min(ssd.max_level);
        if let Some(tuning) = data.item_content_tuning(self.bonus.content_tuning) {
            level = tuning.clamp(level);
        }
        self.modifiers.fixed_scaling_level = level;
        self.mark_changed();
    }

    /// Store the artifact knowledge level modifier
    pub fn set_artifact_knowledge_level(&mut self, level: u32) {
        if self.modifiers.artifact_knowledge_level != level {
            self.modifiers.artifact_knowledge_level = level;
            self.mark_changed();
        }
    }

    pub fn modifiers(&self) -> ItemModifiers {
        self.modifiers
    }

    // Stack and durability

    /// Change the stack size, capped at the template's max stack.
    /// Zero is rejected; deleting an item goes through `set_state`.
    pub fn set_count(&mut self, count: u32) -> Result<(), ItemError> {
        if count == 0 {
            return Err(ItemError::ZeroCount);
        }
        let count = count.min(self.template.max_stack.max(1));
        if count != self.count {
            self.count = count;
            self.mark_changed();
        }
        Ok(())
    }

    pub fn max_durability(&self) -> u32 {
        self.template.max_durability
    }

    /// Set durability, clamped to the template maximum
    pub fn set_durability(&mut self, durability: u32) {
        let durability = durability.min(self.max_durability());
        if durability != self.durability {
            self.durability = durability;
            self.mark_changed();
        }
    }

    /// Move the item to another owner.
    ///
    /// Does not touch any save queue. Dequeue from the old owner first.
    pub fn set_owner(&mut self, owner: Option<OwnerGuid>) {
        if self.owner != owner {
            self.owner = owner;
            self.mark_changed();
        }
    }

    /// Record who crafted the item
    pub fn set_creator(&mut self, creator: Option<OwnerGuid>) {
        self.creator = creator;
        self.mark_changed();
    }

    /// Set or clear the soulbound flag
    pub fn set_binding(&mut self, soulbound: bool) {
        if soulbound == self.is_soulbound() {
            return;
        }
        if soulbound {
            self.flags.insert(ItemFlags::SOULBOUND);
        } else {
            self.flags.remove(ItemFlags::SOULBOUND);
        }
        self.mark_changed();
    }

    pub fn is_soulbound(&self) -> bool {
        self.flags.contains(ItemFlags::SOULBOUND)
    }

    /// Mark a loot container as holding generated contents
    pub fn set_unlooted_contents(&mut self, unlooted: bool) {
        if self.unlooted != unlooted {
            self.unlooted = unlooted;
            self.mark_changed();
        }
    }

    // Gift wrapping

    /// True while gift-wrapped
    pub fn is_wrapped(&self) -> bool {
        self.flags.contains(ItemFlags::WRAPPED)
    }

    /// Who wrapped the item, if it was ever wrapped
    pub fn gift_creator(&self) -> Option<OwnerGuid> {
        self.gift_creator
    }

    /// Gift-wrap the item and insert its gift row into `tx`.
    /// Already wrapped items are left alone.
    pub fn wrap(&mut self, gift_creator: OwnerGuid, tx: &mut Transaction) {
        if self.is_wrapped() {
            return;
        }
        self.flags.insert(ItemFlags::WRAPPED);
        self.gift_creator = Some(gift_creator);
        tx.insert_gift(GiftRecord {
            item_guid: self.guid.0,
            owner: self.owner.map(|o| o.0),
            template_id: self.template.id,
            flags: self.flags.0,
        });
        self.mark_changed();
    }

    /// Open a wrapped item; stale durability is clamped now
    pub fn unwrap_gift(&mut self, tx: &mut Transaction) {
        if !self.is_wrapped() {
            return;
        }
        self.flags.remove(ItemFlags::WRAPPED);
        self.durability = self.durability.min(self.max_durability());
        tx.delete_gift(self.guid.0);
        self.mark_changed();
    }

    // Refunds

    /// Make the item refundable for `recipient`.
    ///
    /// The owner, when given, gets a refund reference. The refund row is
    /// written with the next save.
    pub fn set_refund_info(
        &mut self,
        recipient: OwnerGuid,
        paid_money: u64,
        paid_extended_cost: u32,
        owner: Option<&mut ItemOwner>,
    ) {
        self.refund = Some(RefundInfo { recipient, paid_money, paid_extended_cost });
        self.flags.insert(ItemFlags::REFUNDABLE);
        if let Some(owner) = owner {
            owner.add_refund_reference(self.guid);
        }
        self.mark_changed();
    }

    /// Drop refund data and the owner's refund reference.
    /// The next save deletes the refund row.
    pub fn set_not_refundable(&mut self, owner: Option<&mut ItemOwner>) {
        if !self.is_refundable() {
            return;
        }
        self.refund = None;
        self.flags.remove(ItemFlags::REFUNDABLE);
        if let Some(owner) = owner {
            owner.remove_refund_reference(self.guid);
        }
        self.mark_changed();
    }

    pub fn is_refundable(&self) -> bool {
        self.flags.contains(ItemFlags::REFUNDABLE)
    }

    /// Refund data while refundable
    pub fn refund_info(&self) -> Option<&RefundInfo> {
        self.refund.as_ref()
    }

    /// True once the played time has passed the refund window
    pub fn is_refund_expired(&self, window_secs: u64) -> bool {
        self.played_time as u64 > window_secs
    }

    // Played time

    /// Add the seconds since the last checkpoint, saturating
    pub fn update_played_time(&mut self, now: u64) {
        let elapsed = now.saturating_sub(self.played_checkpoint);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.played_time = self.played_time.saturating_add(elapsed);
        self.played_checkpoint = now;
    }

    /// Seconds the item has been owned
    pub fn played_time(&self) -> u32 {
        self.played_time
    }

    pub fn played_time_checkpoint(&self) -> u64 {
        self.played_checkpoint
    }

    // Eligibility

    /// Disenchanting needs the bonus data to allow it. Conjured, quest and
    /// stackable items never qualify.
    pub fn can_be_disenchanted(&self) -> bool {
        self.bonus.can_disenchant
            && !self.template.has_flag(TemplateFlags::CONJURED)
            && self.bonus.bonding != BindType::Quest
            && !self.template.is_stackable()
    }

    /// Scrapping is blocked while the item is still refundable
    pub fn can_be_scrapped(&self) -> bool {
        self.bonus.can_scrap && !self.is_refundable()
    }

    // Accessors

    pub fn guid(&self) -> ItemGuid {
        self.guid
    }

    /// Static definition this item was created from
    pub fn template(&self) -> &ItemTemplate {
        &self.template
    }

    pub fn template_id(&self) -> u32 {
        self.template.id
    }

    /// Current owner, `None` for world items
    pub fn owner(&self) -> Option<OwnerGuid> {
        self.owner
    }

    pub fn creator(&self) -> Option<OwnerGuid> {
        self.creator
    }

    /// Stack size, always at least 1
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn durability(&self) -> u32 {
        self.durability
    }

    pub fn context(&self) -> u8 {
        self.context
    }

    /// Charges left on spell `index`, 0 out of range
    pub fn spell_charges(&self, index: usize) -> i32 {
        self.spell_charges.get(index).copied().unwrap_or(0)
    }

    /// Derived bonus data. Read-only; change bonus lists or gems instead.
    pub fn bonus(&self) -> &BonusData {
        &self.bonus
    }

    /// What the next save will do
    pub fn state(&self) -> ItemUpdateState {
        self.state
    }

    /// True once the item has been deleted or discarded; it takes no more writes
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Position in the owner's save queue
    pub fn queue_pos(&self) -> Option<usize> {
        self.queue_pos
    }

    pub(crate) fn set_queue_pos(&mut self, pos: Option<usize>) {
        self.queue_pos = pos;
    }
}
