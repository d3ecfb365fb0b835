//! Character aggregate - a player character and its spellcasting inputs
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: level, score and bonus ranges are enforced by the
//!   constructors and setters, never by callers
//! - **Class snapshots**: the primary and secondary classes are embedded, so
//!   derived stats need nothing beyond the aggregate itself
//! - **Soft deletion**: characters are deactivated, never removed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::entities::CharacterClass;
use crate::error::{require_range, DomainError};
use crate::game_systems::{
    CalculationEngine, ClassProgression, Dnd5eSystem, SpellcasterSheet, SpellcastingSystem,
};
use crate::ids::{CharacterId, PlayerId, SubclassId};
use crate::value_objects::{Ability, AbilityScores, Alignment, CharacterName, SpellSlots};

pub const MAX_PRIMARY_LEVEL: u8 = 20;
pub const MAX_SECONDARY_LEVEL: u8 = 19;
pub const MAX_WARLOCK_LEVEL: u8 = 20;
pub const MIN_PROFICIENCY_BONUS: i32 = 2;
pub const MAX_PROFICIENCY_BONUS: i32 = 6;

/// Hit point track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub max: i32,
    pub current: i32,
    #[serde(default)]
    pub temporary: i32,
}

impl Default for HitPoints {
    fn default() -> Self {
        Self {
            max: 10,
            current: 10,
            temporary: 0,
        }
    }
}

/// A player character
///
/// # Invariants
///
/// - Every ability score is within 1..=30 (enforced by `AbilityScores`)
/// - `primary_level` is within 1..=20, `secondary_level` within 0..=19 and
///   `warlock_level` within 0..=20
/// - `proficiency_bonus` is within 2..=6
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use grimoire_domain::aggregates::Character;
/// use grimoire_domain::value_objects::CharacterName;
///
/// let name = CharacterName::new("Elminster").unwrap();
/// let character = Character::new(name, Utc::now());
///
/// assert_eq!(character.level(), 1);
/// assert!(character.is_active());
/// assert_eq!(character.spell_save_dc(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    id: CharacterId,
    player_id: Option<PlayerId>,
    name: CharacterName,

    // Classes
    primary_class: Option<CharacterClass>,
    primary_subclass: Option<SubclassId>,
    primary_level: u8,
    secondary_class: Option<CharacterClass>,
    secondary_subclass: Option<SubclassId>,
    secondary_level: u8,
    warlock_level: u8,

    // Background
    race: String,
    subrace: String,
    alignment: Option<Alignment>,
    background: String,

    // Stats
    ability_scores: AbilityScores,
    hit_points: HitPoints,
    armor_class: i32,
    initiative_bonus: i32,
    speed: u32,
    proficiency_bonus: i32,
    spellcasting_ability: Option<Ability>,

    // Metadata
    is_active: bool,
    is_favorite: bool,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    /// A level 1 character with no class and default stats.
    pub fn new(name: CharacterName, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            player_id: None,
            name,
            primary_class: None,
            primary_subclass: None,
            primary_level: 1,
            secondary_class: None,
            secondary_subclass: None,
            secondary_level: 0,
            warlock_level: 0,
            race: String::new(),
            subrace: String::new(),
            alignment: None,
            background: String::new(),
            ability_scores: AbilityScores::default(),
            hit_points: HitPoints::default(),
            armor_class: 10,
            initiative_bonus: 0,
            speed: 30,
            proficiency_bonus: MIN_PROFICIENCY_BONUS,
            spellcasting_ability: None,
            is_active: true,
            is_favorite: false,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn player_id(&self) -> Option<PlayerId> {
        self.player_id
    }

    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    pub fn primary_class(&self) -> Option<&CharacterClass> {
        self.primary_class.as_ref()
    }

    pub fn primary_subclass(&self) -> Option<SubclassId> {
        self.primary_subclass
    }

    pub fn primary_level(&self) -> u8 {
        self.primary_level
    }

    pub fn secondary_class(&self) -> Option<&CharacterClass> {
        self.secondary_class.as_ref()
    }

    pub fn secondary_subclass(&self) -> Option<SubclassId> {
        self.secondary_subclass
    }

    pub fn secondary_level(&self) -> u8 {
        self.secondary_level
    }

    pub fn warlock_level(&self) -> u8 {
        self.warlock_level
    }

    pub fn race(&self) -> &str {
        &self.race
    }

    pub fn subrace(&self) -> &str {
        &self.subrace
    }

    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    pub fn hit_points(&self) -> HitPoints {
        self.hit_points
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn initiative_bonus(&self) -> i32 {
        self.initiative_bonus
    }

    /// Walking speed in feet.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    pub fn spellcasting_ability(&self) -> Option<Ability> {
        self.spellcasting_ability
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total effective level across every class, warlock included.
    pub fn level(&self) -> u8 {
        self.primary_level + self.secondary_level + self.warlock_level
    }

    pub fn is_multiclass(&self) -> bool {
        self.secondary_class.is_some()
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_player(mut self, player_id: PlayerId) -> Self {
        self.player_id = Some(player_id);
        self
    }

    pub fn with_primary_class(
        mut self,
        class: CharacterClass,
        level: u8,
    ) -> Result<Self, DomainError> {
        self.primary_level = check_primary_level(level)?;
        self.primary_class = Some(class);
        Ok(self)
    }

    pub fn with_secondary_class(
        mut self,
        class: CharacterClass,
        level: u8,
    ) -> Result<Self, DomainError> {
        self.secondary_level = check_secondary_level(level)?;
        self.secondary_class = Some(class);
        Ok(self)
    }

    pub fn with_subclasses(
        mut self,
        primary: Option<SubclassId>,
        secondary: Option<SubclassId>,
    ) -> Self {
        self.primary_subclass = primary;
        self.secondary_subclass = secondary;
        self
    }

    pub fn with_warlock_level(mut self, level: u8) -> Result<Self, DomainError> {
        self.warlock_level = check_warlock_level(level)?;
        Ok(self)
    }

    pub fn with_ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = scores;
        self
    }

    pub fn with_proficiency_bonus(mut self, bonus: i32) -> Result<Self, DomainError> {
        self.proficiency_bonus = check_proficiency_bonus(bonus)?;
        Ok(self)
    }

    pub fn with_spellcasting_ability(mut self, ability: Option<Ability>) -> Self {
        self.spellcasting_ability = ability;
        self
    }

    pub fn with_origin(
        mut self,
        race: impl Into<String>,
        subrace: impl Into<String>,
        background: impl Into<String>,
    ) -> Self {
        self.race = race.into();
        self.subrace = subrace.into();
        self.background = background.into();
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn with_hit_points(mut self, hit_points: HitPoints) -> Self {
        self.hit_points = hit_points;
        self
    }

    pub fn with_combat_stats(mut self, armor_class: i32, initiative_bonus: i32, speed: u32) -> Self {
        self.armor_class = armor_class;
        self.initiative_bonus = initiative_bonus;
        self.speed = speed;
        self
    }

    pub fn with_flags(mut self, is_favorite: bool, is_public: bool) -> Self {
        self.is_favorite = is_favorite;
        self.is_public = is_public;
        self
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_ability_score(
        &mut self,
        ability: Ability,
        score: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ability_scores.set(ability, score)?;
        self.touch(now);
        Ok(())
    }

    pub fn set_levels(
        &mut self,
        primary: u8,
        secondary: u8,
        warlock: u8,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let primary = check_primary_level(primary)?;
        let secondary = check_secondary_level(secondary)?;
        let warlock = check_warlock_level(warlock)?;
        self.primary_level = primary;
        self.secondary_level = secondary;
        self.warlock_level = warlock;
        self.touch(now);
        Ok(())
    }

    /// Gain one level in the primary class.
    pub fn level_up(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        let next = self.primary_level.saturating_add(1);
        self.primary_level = check_primary_level(next)?;
        self.touch(now);
        Ok(())
    }

    pub fn set_proficiency_bonus(
        &mut self,
        bonus: i32,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.proficiency_bonus = check_proficiency_bonus(bonus)?;
        self.touch(now);
        Ok(())
    }

    /// Soft delete. Returns `false` if the character was already inactive.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.touch(now);
        true
    }

    pub fn activate(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.touch(now);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    // =========================================================================
    // Derived stats
    // =========================================================================

    /// Modifier of the spellcasting ability, `None` for non-spellcasters.
    pub fn spellcasting_modifier(&self) -> Option<i32> {
        Dnd5eSystem.spellcasting_modifier(self)
    }

    pub fn spell_save_dc(&self) -> i32 {
        Dnd5eSystem.spell_save_dc(self)
    }

    pub fn spell_attack_bonus(&self) -> i32 {
        Dnd5eSystem.spell_attack_bonus(self)
    }

    pub fn max_spell_slots(&self) -> SpellSlots {
        Dnd5eSystem.max_spell_slots(self)
    }
}

fn check_primary_level(level: u8) -> Result<u8, DomainError> {
    require_range(level, 1, MAX_PRIMARY_LEVEL, "primary_level")
}

fn check_secondary_level(level: u8) -> Result<u8, DomainError> {
    require_range(level, 0, MAX_SECONDARY_LEVEL, "secondary_level")
}

fn check_warlock_level(level: u8) -> Result<u8, DomainError> {
    require_range(level, 0, MAX_WARLOCK_LEVEL, "warlock_level")
}

fn check_proficiency_bonus(bonus: i32) -> Result<i32, DomainError> {
    require_range(
        bonus,
        MIN_PROFICIENCY_BONUS,
        MAX_PROFICIENCY_BONUS,
        "proficiency_bonus",
    )
}

impl SpellcasterSheet for Character {
    fn ability_scores(&self) -> &AbilityScores {
        &self.ability_scores
    }

    fn primary_class(&self) -> Option<ClassProgression> {
        self.primary_class
            .as_ref()
            .map(|class| ClassProgression::new(class.magic_type, self.primary_level))
    }

    fn secondary_class(&self) -> Option<ClassProgression> {
        self.secondary_class
            .as_ref()
            .map(|class| ClassProgression::new(class.magic_type, self.secondary_level))
    }

    fn warlock_level(&self) -> u8 {
        self.warlock_level
    }

    fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    fn spellcasting_ability(&self) -> Option<Ability> {
        self.spellcasting_ability
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(class) = &self.primary_class {
            write!(f, " {}", class.name)?;
        }
        write!(f, " lv.{}", self.primary_level)?;
        if let Some(class) = &self.secondary_class {
            write!(f, "/{} {}", self.secondary_level, class.name)?;
        }
        Ok(())
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

/// Intermediate format for serialization that matches the stored document
#[derive(Serialize, Deserialize)]
struct CharacterWireFormat {
    id: CharacterId,
    #[serde(default)]
    player_id: Option<PlayerId>,
    name: CharacterName,
    #[serde(default)]
    primary_class: Option<CharacterClass>,
    #[serde(default)]
    primary_subclass: Option<SubclassId>,
    primary_level: u8,
    #[serde(default)]
    secondary_class: Option<CharacterClass>,
    #[serde(default)]
    secondary_subclass: Option<SubclassId>,
    #[serde(default)]
    secondary_level: u8,
    #[serde(default)]
    warlock_level: u8,
    #[serde(default)]
    race: String,
    #[serde(default)]
    subrace: String,
    #[serde(default)]
    alignment: Option<Alignment>,
    #[serde(default)]
    background: String,
    ability_scores: AbilityScores,
    #[serde(default)]
    hit_points: HitPoints,
    armor_class: i32,
    #[serde(default)]
    initiative_bonus: i32,
    speed: u32,
    proficiency_bonus: i32,
    #[serde(default)]
    spellcasting_ability: Option<Ability>,
    is_active: bool,
    #[serde(default)]
    is_favorite: bool,
    #[serde(default)]
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Serialize for Character {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = CharacterWireFormat {
            id: self.id,
            player_id: self.player_id,
            name: self.name.clone(),
            primary_class: self.primary_class.clone(),
            primary_subclass: self.primary_subclass,
            primary_level: self.primary_level,
            secondary_class: self.secondary_class.clone(),
            secondary_subclass: self.secondary_subclass,
            secondary_level: self.secondary_level,
            warlock_level: self.warlock_level,
            race: self.race.clone(),
            subrace: self.subrace.clone(),
            alignment: self.alignment,
            background: self.background.clone(),
            ability_scores: self.ability_scores,
            hit_points: self.hit_points,
            armor_class: self.armor_class,
            initiative_bonus: self.initiative_bonus,
            speed: self.speed,
            proficiency_bonus: self.proficiency_bonus,
            spellcasting_ability: self.spellcasting_ability,
            is_active: self.is_active,
            is_favorite: self.is_favorite,
            is_public: self.is_public,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Character {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = CharacterWireFormat::deserialize(deserializer)?;

        // Stored documents go through the same range checks as the builders
        let primary_level =
            check_primary_level(wire.primary_level).map_err(serde::de::Error::custom)?;
        let secondary_level =
            check_secondary_level(wire.secondary_level).map_err(serde::de::Error::custom)?;
        let warlock_level =
            check_warlock_level(wire.warlock_level).map_err(serde::de::Error::custom)?;
        let proficiency_bonus =
            check_proficiency_bonus(wire.proficiency_bonus).map_err(serde::de::Error::custom)?;

        Ok(Character {
            id: wire.id,
            player_id: wire.player_id,
            name: wire.name,
            primary_class: wire.primary_class,
            primary_subclass: wire.primary_subclass,
            primary_level,
            secondary_class: wire.secondary_class,
            secondary_subclass: wire.secondary_subclass,
            secondary_level,
            warlock_level,
            race: wire.race,
            subrace: wire.subrace,
            alignment: wire.alignment,
            background: wire.background,
            ability_scores: wire.ability_scores,
            hit_points: wire.hit_points,
            armor_class: wire.armor_class,
            initiative_bonus: wire.initiative_bonus,
            speed: wire.speed,
            proficiency_bonus,
            spellcasting_ability: wire.spellcasting_ability,
            is_active: wire.is_active,
            is_favorite: wire.is_favorite,
            is_public: wire.is_public,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_systems::MagicType;
    use crate::value_objects::{ClassName, PactSlot};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn class(name: &str, magic_type: MagicType) -> CharacterClass {
        CharacterClass::new(ClassName::new(name).unwrap()).with_magic_type(magic_type)
    }

    fn create_test_character() -> Character {
        Character::new(CharacterName::new("Tasha").unwrap(), fixed_time())
    }

    mod constructor {
        use super::*;

        #[test]
        fn new_character_defaults() {
            let character = create_test_character();
            assert_eq!(character.level(), 1);
            assert_eq!(character.proficiency_bonus(), 2);
            assert_eq!(character.speed(), 30);
            assert_eq!(character.armor_class(), 10);
            assert_eq!(character.hit_points(), HitPoints::default());
            assert!(character.is_active());
            assert!(!character.is_multiclass());
            assert_eq!(character.created_at(), fixed_time());
        }

        #[test]
        fn level_ranges_are_enforced() {
            let wizard = class("Wizard", MagicType::FullCaster);
            assert!(create_test_character()
                .with_primary_class(wizard.clone(), 0)
                .is_err());
            assert!(create_test_character()
                .with_primary_class(wizard.clone(), 21)
                .is_err());
            assert!(create_test_character()
                .with_secondary_class(wizard, 20)
                .is_err());
            assert!(create_test_character().with_warlock_level(21).is_err());
            assert!(create_test_character().with_proficiency_bonus(1).is_err());
            assert!(create_test_character().with_proficiency_bonus(7).is_err());
        }
    }

    mod derived {
        use super::*;

        #[test]
        fn total_level_sums_all_classes() {
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap()
                .with_secondary_class(class("Paladin", MagicType::HalfCaster), 3)
                .unwrap()
                .with_warlock_level(2)
                .unwrap();
            assert_eq!(character.level(), 10);
            assert!(character.is_multiclass());
        }

        #[test]
        fn non_spellcaster_has_no_resources() {
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap();
            assert_eq!(character.spellcasting_modifier(), None);
            assert_eq!(character.spell_save_dc(), 0);
            assert_eq!(character.spell_attack_bonus(), 0);
            assert!(character.max_spell_slots().is_empty());
        }

        #[test]
        fn spellcaster_stats() {
            let scores = AbilityScores::default()
                .with(Ability::Intelligence, 18)
                .unwrap();
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap()
                .with_ability_scores(scores)
                .with_proficiency_bonus(3)
                .unwrap()
                .with_spellcasting_ability(Some(Ability::Intelligence));

            assert_eq!(character.spellcasting_modifier(), Some(4));
            assert_eq!(character.spell_save_dc(), 15);
            assert_eq!(character.spell_attack_bonus(), 7);
            assert_eq!(
                character.max_spell_slots().tier_counts(),
                [4, 3, 2, 0, 0, 0, 0, 0, 0]
            );
        }

        #[test]
        fn primary_slots_use_primary_level_only() {
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap()
                .with_secondary_class(class("Paladin", MagicType::HalfCaster), 3)
                .unwrap()
                .with_spellcasting_ability(Some(Ability::Intelligence));

            assert_eq!(
                character.max_spell_slots().tier_counts(),
                [7, 3, 2, 0, 0, 0, 0, 0, 0]
            );
        }

        #[test]
        fn warlock_levels_add_pact_pool() {
            let character = create_test_character()
                .with_warlock_level(3)
                .unwrap()
                .with_spellcasting_ability(Some(Ability::Charisma));
            let slots = character.max_spell_slots();
            assert_eq!(slots.pact(), Some(PactSlot { tier: 2, count: 2 }));
            assert_eq!(slots.len(), 1);
        }
    }

    mod mutations {
        use super::*;

        #[test]
        fn set_ability_score_validates_and_touches() {
            let mut character = create_test_character();
            let later = fixed_time() + chrono::Duration::hours(1);

            assert!(character
                .set_ability_score(Ability::Strength, 31, later)
                .is_err());
            assert_eq!(character.updated_at(), fixed_time());

            character
                .set_ability_score(Ability::Strength, 18, later)
                .unwrap();
            assert_eq!(character.ability_scores().get(Ability::Strength), 18);
            assert_eq!(character.updated_at(), later);
        }

        #[test]
        fn level_up_stops_at_twenty() {
            let mut character = create_test_character()
                .with_primary_class(class("Cleric", MagicType::FullCaster), 19)
                .unwrap();
            character.level_up(fixed_time()).unwrap();
            assert_eq!(character.primary_level(), 20);
            assert!(character.level_up(fixed_time()).is_err());
            assert_eq!(character.primary_level(), 20);
        }

        #[test]
        fn set_levels_is_all_or_nothing() {
            let mut character = create_test_character();
            assert!(character.set_levels(5, 3, 21, fixed_time()).is_err());
            assert_eq!(character.level(), 1);
            character.set_levels(5, 3, 2, fixed_time()).unwrap();
            assert_eq!(character.level(), 10);
        }

        #[test]
        fn deactivate_is_idempotent() {
            let mut character = create_test_character();
            assert!(character.deactivate(fixed_time()));
            assert!(!character.is_active());
            assert!(!character.deactivate(fixed_time()));
            character.activate(fixed_time());
            assert!(character.is_active());
        }
    }

    mod display {
        use super::*;

        #[test]
        fn single_class() {
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap();
            assert_eq!(character.to_string(), "Tasha Wizard lv.5");
        }

        #[test]
        fn multiclass() {
            let character = create_test_character()
                .with_primary_class(class("Wizard", MagicType::FullCaster), 5)
                .unwrap()
                .with_secondary_class(class("Paladin", MagicType::HalfCaster), 3)
                .unwrap();
            assert_eq!(character.to_string(), "Tasha Wizard lv.5/3 Paladin");
        }

        #[test]
        fn without_class() {
            assert_eq!(create_test_character().to_string(), "Tasha lv.1");
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn round_trip_preserves_everything() {
            let character = create_test_character()
                .with_primary_class(class("Bard", MagicType::FullCaster), 4)
                .unwrap()
                .with_alignment(Alignment::ChaoticGood)
                .with_origin("Half-elf", "", "Entertainer")
                .with_spellcasting_ability(Some(Ability::Charisma))
                .with_flags(true, false);

            let json = serde_json::to_string(&character).unwrap();
            let back: Character = serde_json::from_str(&json).unwrap();
            assert_eq!(back, character);
        }

        #[test]
        fn out_of_range_documents_are_rejected() {
            let character = create_test_character();
            let mut json = serde_json::to_value(&character).unwrap();
            json["warlock_level"] = serde_json::json!(25);
            assert!(serde_json::from_value::<Character>(json).is_err());
        }
    }
}
