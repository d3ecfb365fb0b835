//! Value objects: immutable, validated building blocks.

mod ability;
mod choices;
mod cost;
mod names;
mod spell_slots;

pub use ability::{
    Ability, AbilityScores, DEFAULT_ABILITY_SCORE, MAX_ABILITY_SCORE, MIN_ABILITY_SCORE,
};
pub use choices::{Alignment, Dice, EffectCategory};
pub use cost::GoldCost;
pub use names::{
    CharacterName, ClassName, ComponentName, DamageTypeName, EffectName, SchoolName,
    SpellName, SpellTimeLabel, SpellbookName, SubclassName,
};
pub use spell_slots::{PactSlot, SlotKey, SpellSlots, MAX_PACT_TIER, MAX_SLOT_TIER};
