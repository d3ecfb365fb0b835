//! D&D 5th Edition spellcasting rules.

use crate::value_objects::{PactSlot, SpellSlots, MAX_PACT_TIER};

use super::traits::{CalculationEngine, MagicType, SpellcasterSheet, SpellcastingSystem};

// Spell slot progression tables, row N-1 holds class level N

static FULL_CASTER_SLOTS: [[u8; 9]; 20] = [
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 0, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 0, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 0],
    [4, 3, 3, 3, 2, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 1, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 1, 1, 1],
    [4, 3, 3, 3, 3, 2, 2, 1, 1],
];

// Half casters get nothing at level 1
static HALF_CASTER_SLOTS: [[u8; 9]; 20] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0],
    [2, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [3, 0, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 2, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 0, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 2, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 0, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 1, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 2, 0, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 1, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
    [4, 3, 3, 3, 2, 0, 0, 0, 0],
];

fn table_row(table: &'static [[u8; 9]; 20], level: u8) -> Option<&'static [u8; 9]> {
    let index = usize::from(level.checked_sub(1)?);
    table.get(index)
}

/// D&D 5th Edition game system.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dnd5eSystem;

impl Dnd5eSystem {
    /// Create a new D&D 5e system instance.
    pub fn new() -> Self {
        Self
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        // Rust's / rounds toward zero, the rules round down
        (score - 10).div_euclid(2)
    }

    fn proficiency_bonus(&self, level: u8) -> i32 {
        ((i32::from(level.max(1)) - 1) / 4) + 2
    }

    fn spellcasting_modifier(&self, sheet: &dyn SpellcasterSheet) -> Option<i32> {
        let ability = sheet.spellcasting_ability()?;
        Some(self.ability_modifier(sheet.ability_scores().get(ability)))
    }

    fn spell_save_dc(&self, sheet: &dyn SpellcasterSheet) -> i32 {
        self.spellcasting_modifier(sheet)
            .map_or(0, |modifier| 8 + sheet.proficiency_bonus() + modifier)
    }

    fn spell_attack_bonus(&self, sheet: &dyn SpellcasterSheet) -> i32 {
        self.spellcasting_modifier(sheet)
            .map_or(0, |modifier| sheet.proficiency_bonus() + modifier)
    }
}

impl SpellcastingSystem for Dnd5eSystem {
    fn caster_slots(&self, magic_type: MagicType, level: u8) -> SpellSlots {
        let row = match magic_type {
            MagicType::FullCaster => table_row(&FULL_CASTER_SLOTS, level),
            MagicType::HalfCaster => table_row(&HALF_CASTER_SLOTS, level),
            MagicType::ThirdCaster | MagicType::NonCaster => None,
        };
        row.map(SpellSlots::from_tier_counts).unwrap_or_default()
    }

    fn pact_slot(&self, warlock_level: u8) -> Option<PactSlot> {
        let count = match warlock_level {
            0 => return None,
            1 => 1,
            2..=10 => 2,
            11..=16 => 3,
            _ => 4,
        };
        let tier = warlock_level.div_ceil(2).min(MAX_PACT_TIER);
        Some(PactSlot { tier, count })
    }

    fn max_spell_slots(&self, sheet: &dyn SpellcasterSheet) -> SpellSlots {
        if sheet.spellcasting_ability().is_none() {
            return SpellSlots::new();
        }

        let mut slots = sheet
            .primary_class()
            .map(|class| self.caster_slots(class.magic_type, class.level))
            .unwrap_or_default();

        if let Some(class) = sheet.secondary_class() {
            slots.merge(&self.caster_slots(class.magic_type, class.level));
        }

        if let Some(pact) = self.pact_slot(sheet.warlock_level()) {
            slots.set_pact(pact);
        }

        slots
    }
}
