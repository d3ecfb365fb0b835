//! Aggregates: records with invariants that are mutated as a whole.

mod character;
mod spellbook;

pub use character::{
    Character, HitPoints, MAX_PRIMARY_LEVEL, MAX_PROFICIENCY_BONUS, MAX_SECONDARY_LEVEL,
    MAX_WARLOCK_LEVEL, MIN_PROFICIENCY_BONUS,
};
pub use spellbook::{PactSlotPool, SlotUse, SpellSlotPool, Spellbook};
