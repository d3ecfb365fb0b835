//! Grimoire domain: characters, classes, spells, spellbooks and the D&D 5e
//! spellcasting rules. Pure types and functions, no I/O.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod value_objects;

pub use aggregates::{Character, HitPoints, PactSlotPool, SlotUse, SpellSlotPool, Spellbook};
pub use entities::{
    AttackType, CharacterClass, ComponentKind, DamageType, Effect, MagicSchool,
    MaterialComponent, Spell, SpellComponent, SpellLevel, SpellTime, Subclass,
};
pub use error::DomainError;
pub use game_systems::{
    CalculationEngine, ClassProgression, Dnd5eSystem, MagicType, SpellcasterSheet,
    SpellcastingSystem,
};
pub use ids::{
    CharacterClassId, CharacterId, DamageTypeId, EffectId, MagicSchoolId, MaterialComponentId,
    PlayerId, SpellId, SpellTimeId, SpellbookId, SubclassId,
};
pub use value_objects::{
    Ability, AbilityScores, Alignment, CharacterName, ClassName, ComponentName, Dice,
    EffectCategory, GoldCost, PactSlot, SlotKey, SpellName, SpellSlots, SpellbookName,
};
