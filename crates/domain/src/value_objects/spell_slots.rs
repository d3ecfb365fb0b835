//! Spell slot mappings produced by the slot calculator.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Highest spell-slot tier.
pub const MAX_SLOT_TIER: u8 = 9;
/// Highest tier a warlock pact slot reaches.
pub const MAX_PACT_TIER: u8 = 5;

const WARLOCK_PREFIX: &str = "warlock_";

/// Key into a [`SpellSlots`] mapping.
///
/// Ordinary tiers sort before the warlock entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotKey {
    /// A shared slot tier, 1 through 9.
    Tier(u8),
    /// The warlock pact pool at the given tier.
    Warlock(u8),
}

impl SlotKey {
    /// Build a tier key, rejecting anything outside 1..=9.
    pub fn tier(tier: u8) -> Result<Self, DomainError> {
        if (1..=MAX_SLOT_TIER).contains(&tier) {
            Ok(SlotKey::Tier(tier))
        } else {
            Err(DomainError::validation(format!(
                "Slot tier must be between 1 and {}, got {}",
                MAX_SLOT_TIER, tier
            )))
        }
    }

    pub fn is_warlock(&self) -> bool {
        matches!(self, SlotKey::Warlock(_))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Tier(tier) => write!(f, "{}", tier),
            SlotKey::Warlock(tier) => write!(f, "{}{}", WARLOCK_PREFIX, tier),
        }
    }
}

impl FromStr for SlotKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::parse(format!("Invalid slot key: {}", s));
        match s.strip_prefix(WARLOCK_PREFIX) {
            Some(tier) => {
                let tier: u8 = tier.parse().map_err(|_| invalid())?;
                if (1..=MAX_PACT_TIER).contains(&tier) {
                    Ok(SlotKey::Warlock(tier))
                } else {
                    Err(invalid())
                }
            }
            None => {
                let tier: u8 = s.parse().map_err(|_| invalid())?;
                SlotKey::tier(tier).map_err(|_| invalid())
            }
        }
    }
}

impl TryFrom<String> for SlotKey {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> String {
        key.to_string()
    }
}

/// The warlock pact pool: every slot is cast at the same tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PactSlot {
    pub tier: u8,
    pub count: u8,
}

/// Slot counts keyed by tier, plus at most one warlock entry.
///
/// Entries with a count of zero are never stored, so a character with no
/// spellcasting resources has an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellSlots(BTreeMap<SlotKey, u8>);

impl SpellSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a per-tier row, index 0 holding tier 1.
    pub fn from_tier_counts(counts: &[u8; 9]) -> Self {
        let mut slots = Self::new();
        for (tier, count) in (1..=MAX_SLOT_TIER).zip(counts) {
            slots.add(SlotKey::Tier(tier), *count);
        }
        slots
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Count stored under `key`, zero when absent.
    pub fn get(&self, key: SlotKey) -> u8 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    /// Count for a shared tier, zero when absent.
    pub fn tier(&self, tier: u8) -> u8 {
        self.get(SlotKey::Tier(tier))
    }

    /// The warlock entry, if any.
    pub fn pact(&self) -> Option<PactSlot> {
        self.0.iter().find_map(|(key, count)| match key {
            SlotKey::Warlock(tier) => Some(PactSlot {
                tier: *tier,
                count: *count,
            }),
            SlotKey::Tier(_) => None,
        })
    }

    /// Replace the warlock entry.
    pub fn set_pact(&mut self, pact: PactSlot) {
        self.0.retain(|key, _| !key.is_warlock());
        self.add(SlotKey::Warlock(pact.tier), pact.count);
    }

    /// Add `count` slots under `key`, saturating at `u8::MAX`.
    pub fn add(&mut self, key: SlotKey, count: u8) {
        if count == 0 {
            return;
        }
        let entry = self.0.entry(key).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    /// Sum another mapping into this one, tier by tier.
    pub fn merge(&mut self, other: &SpellSlots) {
        for (key, count) in other.iter() {
            self.add(key, count);
        }
    }

    /// Shared-tier counts as a fixed row, index 0 holding tier 1.
    pub fn tier_counts(&self) -> [u8; 9] {
        let mut counts = [0u8; 9];
        for (tier, count) in (1..=MAX_SLOT_TIER).zip(counts.iter_mut()) {
            *count = self.tier(tier);
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotKey, u8)> + '_ {
        self.0.iter().map(|(key, count)| (*key, *count))
    }
}

impl FromIterator<(SlotKey, u8)> for SpellSlots {
    fn from_iter<I: IntoIterator<Item = (SlotKey, u8)>>(iter: I) -> Self {
        let mut slots = SpellSlots::new();
        for (key, count) in iter {
            slots.add(key, count);
        }
        slots
    }
}
