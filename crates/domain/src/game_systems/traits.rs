//! Game system traits for spellcasting mechanics.
//!
//! These traits separate the rules arithmetic from the records it reads,
//! so the calculator can be driven by any character-like value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Ability, AbilityScores, PactSlot, SpellSlots};

/// How a class progresses through spell slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagicType {
    /// Full caster (Wizard, Cleric, Druid, Sorcerer, Bard)
    #[serde(rename = "FC")]
    FullCaster,
    /// Half caster (Paladin, Ranger)
    #[serde(rename = "HC")]
    HalfCaster,
    /// Third caster (Eldritch Knight, Arcane Trickster)
    #[serde(rename = "TC")]
    ThirdCaster,
    /// No spellcasting
    #[default]
    #[serde(rename = "NC")]
    NonCaster,
}

impl MagicType {
    pub fn code(&self) -> &'static str {
        match self {
            MagicType::FullCaster => "FC",
            MagicType::HalfCaster => "HC",
            MagicType::ThirdCaster => "TC",
            MagicType::NonCaster => "NC",
        }
    }

    pub fn is_caster(&self) -> bool {
        !matches!(self, MagicType::NonCaster)
    }
}

impl fmt::Display for MagicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MagicType::FullCaster => "Full caster",
            MagicType::HalfCaster => "Half caster",
            MagicType::ThirdCaster => "Third caster",
            MagicType::NonCaster => "Non-caster",
        };
        f.write_str(name)
    }
}

impl FromStr for MagicType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FC" | "FULL" => Ok(MagicType::FullCaster),
            "HC" | "HALF" => Ok(MagicType::HalfCaster),
            "TC" | "THIRD" => Ok(MagicType::ThirdCaster),
            "NC" | "NONE" => Ok(MagicType::NonCaster),
            _ => Err(DomainError::parse(format!("Unknown magic type: {}", s))),
        }
    }
}

/// One class slot on a character: its progression kind and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassProgression {
    pub magic_type: MagicType,
    pub level: u8,
}

impl ClassProgression {
    pub fn new(magic_type: MagicType, level: u8) -> Self {
        Self { magic_type, level }
    }
}

/// Everything the calculator needs to know about a spellcaster.
pub trait SpellcasterSheet {
    fn ability_scores(&self) -> &AbilityScores;

    /// Primary class, if one is assigned.
    fn primary_class(&self) -> Option<ClassProgression>;

    /// Secondary class for multiclass characters.
    fn secondary_class(&self) -> Option<ClassProgression>;

    fn warlock_level(&self) -> u8;

    fn proficiency_bonus(&self) -> i32;

    fn spellcasting_ability(&self) -> Option<Ability>;
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    ///
    /// For D&D-like systems: floor((score - 10) / 2)
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate proficiency bonus from character level.
    ///
    /// For D&D 5e: ((level - 1) / 4) + 2
    fn proficiency_bonus(&self, level: u8) -> i32;

    /// Modifier of the sheet's spellcasting ability, `None` without one.
    fn spellcasting_modifier(&self, sheet: &dyn SpellcasterSheet) -> Option<i32>;

    /// Calculate spell save DC, zero for non-spellcasters.
    ///
    /// For D&D 5e: 8 + proficiency + casting stat modifier
    fn spell_save_dc(&self, sheet: &dyn SpellcasterSheet) -> i32;

    /// Calculate spell attack bonus, zero for non-spellcasters.
    ///
    /// For D&D 5e: proficiency + casting stat modifier
    fn spell_attack_bonus(&self, sheet: &dyn SpellcasterSheet) -> i32;
}

/// Spell slot progression for systems with spellcasting.
pub trait SpellcastingSystem: Send + Sync {
    /// Slots granted by a single class at a given class level.
    ///
    /// Levels outside the progression table yield an empty mapping.
    fn caster_slots(&self, magic_type: MagicType, level: u8) -> SpellSlots;

    /// Pact magic pool at a given warlock level, `None` at level 0.
    fn pact_slot(&self, warlock_level: u8) -> Option<PactSlot>;

    /// Maximum slots for a whole character: primary and secondary class
    /// summed per tier, plus the pact pool.
    fn max_spell_slots(&self, sheet: &dyn SpellcasterSheet) -> SpellSlots;
}
