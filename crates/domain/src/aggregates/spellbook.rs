//! Spellbook aggregate - a named spell list with its own slot ledger
//!
//! A character can keep several spellbooks; each tracks the slots it has
//! left independently. Counters only move through `use_spell_slot`,
//! `reset_all_spell_slots` and `apply_max_slots`, so a current count is
//! never negative and never above its maximum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{CharacterId, SpellId, SpellbookId};
use crate::value_objects::{PactSlot, SpellSlots, SpellbookName, MAX_SLOT_TIER};

/// Available and maximum slots of one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlotPool {
    /// Currently available slots
    current: u8,
    /// Maximum slots
    max: u8,
}

impl SpellSlotPool {
    /// Create a full pool.
    pub fn new(max: u8) -> Self {
        Self { current: max, max }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn has_slots(&self) -> bool {
        self.current > 0
    }

    /// Use one slot. Returns `false` when the pool is empty.
    pub fn use_slot(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Restore all slots.
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// Change the maximum, keeping current within it.
    pub fn set_max(&mut self, max: u8) {
        self.max = max;
        self.current = self.current.min(max);
    }
}

/// The warlock pact pool: every slot is cast at `tier`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSlotPool {
    tier: u8,
    #[serde(flatten)]
    pool: SpellSlotPool,
}

impl PactSlotPool {
    pub fn tier(&self) -> u8 {
        self.tier
    }

    pub fn current(&self) -> u8 {
        self.pool.current()
    }

    pub fn max(&self) -> u8 {
        self.pool.max()
    }
}

/// Which pool a cast draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotUse {
    /// A shared slot of the given tier (1..=9)
    Tier(u8),
    /// The warlock pact pool
    Pact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spellbook {
    id: SpellbookId,
    owner_id: CharacterId,
    name: SpellbookName,
    description: String,
    spells: Vec<SpellId>,
    is_active: bool,
    is_shared: bool,
    /// Index 0 holds tier 1
    slots: [SpellSlotPool; 9],
    pact: PactSlotPool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_used: Option<DateTime<Utc>>,
}

impl Spellbook {
    /// An empty, active spellbook with no slots.
    pub fn new(owner_id: CharacterId, name: SpellbookName, now: DateTime<Utc>) -> Self {
        Self {
            id: SpellbookId::new(),
            owner_id,
            name,
            description: String::new(),
            spells: Vec::new(),
            is_active: true,
            is_shared: false,
            slots: [SpellSlotPool::default(); 9],
            pact: PactSlotPool::default(),
            created_at: now,
            updated_at: now,
            last_used: None,
        }
    }

    /// A spellbook whose maxima come from a calculator result, all slots full.
    pub fn with_max_slots(mut self, max_slots: &SpellSlots) -> Self {
        self.apply_max_slots(max_slots);
        self.reset_all_spell_slots();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_shared(mut self, is_shared: bool) -> Self {
        self.is_shared = is_shared;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> SpellbookId {
        self.id
    }

    pub fn owner_id(&self) -> CharacterId {
        self.owner_id
    }

    pub fn name(&self) -> &SpellbookName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn spells(&self) -> &[SpellId] {
        &self.spells
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_shared(&self) -> bool {
        self.is_shared
    }

    /// Pool for a tier, `None` outside 1..=9.
    pub fn slot(&self, tier: u8) -> Option<&SpellSlotPool> {
        self.slots.get(usize::from(tier.checked_sub(1)?))
    }

    pub fn slots(&self) -> &[SpellSlotPool; 9] {
        &self.slots
    }

    pub fn pact(&self) -> &PactSlotPool {
        &self.pact
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_used(&self) -> Option<DateTime<Utc>> {
        self.last_used
    }

    pub fn total_spells(&self) -> usize {
        self.spells.len()
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    /// Copy every maximum into its current count, pact pool included.
    pub fn reset_all_spell_slots(&mut self) {
        for pool in &mut self.slots {
            pool.restore();
        }
        self.pact.pool.restore();
    }

    /// Consume one slot. Returns `false` and changes nothing when the
    /// requested pool is empty or the tier does not exist.
    pub fn use_spell_slot(&mut self, slot: SlotUse, now: DateTime<Utc>) -> bool {
        let used = match slot {
            SlotUse::Pact => self.pact.pool.use_slot(),
            SlotUse::Tier(tier) => tier
                .checked_sub(1)
                .and_then(|index| self.slots.get_mut(usize::from(index)))
                .is_some_and(SpellSlotPool::use_slot),
        };
        if used {
            self.last_used = Some(now);
            self.updated_at = now;
        }
        used
    }

    /// Set maxima from a calculator result. Current counts are clamped to
    /// the new maxima, never raised.
    pub fn apply_max_slots(&mut self, max_slots: &SpellSlots) {
        for (tier, pool) in (1..=MAX_SLOT_TIER).zip(self.slots.iter_mut()) {
            pool.set_max(max_slots.tier(tier));
        }
        let PactSlot { tier, count } = max_slots.pact().unwrap_or(PactSlot { tier: 0, count: 0 });
        self.pact.tier = tier;
        self.pact.pool.set_max(count);
    }

    /// Maxima as a slot mapping, the inverse of `apply_max_slots`.
    pub fn max_slots(&self) -> SpellSlots {
        let mut counts = [0u8; 9];
        for (count, pool) in counts.iter_mut().zip(&self.slots) {
            *count = pool.max();
        }
        let mut slots = SpellSlots::from_tier_counts(&counts);
        if self.pact.tier > 0 {
            slots.set_pact(PactSlot {
                tier: self.pact.tier,
                count: self.pact.max(),
            });
        }
        slots
    }

    // =========================================================================
    // Spell list
    // =========================================================================

    /// Returns `false` if the spell is already in the book.
    pub fn add_spell(&mut self, spell_id: SpellId, now: DateTime<Utc>) -> bool {
        if self.spells.contains(&spell_id) {
            return false;
        }
        self.spells.push(spell_id);
        self.updated_at = now;
        true
    }

    /// Returns `false` if the spell was not in the book.
    pub fn remove_spell(&mut self, spell_id: SpellId, now: DateTime<Utc>) -> bool {
        let before = self.spells.len();
        self.spells.retain(|id| *id != spell_id);
        let removed = self.spells.len() != before;
        if removed {
            self.updated_at = now;
        }
        removed
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.updated_at = now;
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl fmt::Display for Spellbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
