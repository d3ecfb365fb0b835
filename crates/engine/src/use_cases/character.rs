//! Character operations and the derived spellcasting summary.

use serde::Serialize;
use std::sync::Arc;

use grimoire_domain::aggregates::{MAX_PROFICIENCY_BONUS, MIN_PROFICIENCY_BONUS};
use grimoire_domain::{
    Ability, AbilityScores, Alignment, CalculationEngine, Character, CharacterClass,
    CharacterClassId, CharacterId, CharacterName, Dnd5eSystem, PlayerId, SpellSlots, SubclassId,
};

use super::validation::{require_level, require_max_length, ValidationError};
use crate::infrastructure::ports::{CharacterRepo, ClassRepo, ClockPort, RepoError};

/// Longest race, subrace or background text, in characters.
pub const MAX_ORIGIN_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found: {0}")]
    NotFound(CharacterId),
    #[error("Unknown character class: {0}")]
    UnknownClass(CharacterClassId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Everything needed to create a character. Ability scores are in
/// STR, DEX, CON, INT, WIS, CHA order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCharacter {
    pub name: String,
    pub player_id: Option<PlayerId>,
    pub primary_class_id: Option<CharacterClassId>,
    pub primary_subclass_id: Option<SubclassId>,
    pub primary_level: u8,
    pub secondary_class_id: Option<CharacterClassId>,
    pub secondary_subclass_id: Option<SubclassId>,
    pub secondary_level: u8,
    pub warlock_level: u8,
    pub race: String,
    pub subrace: String,
    pub background: String,
    pub alignment: Option<Alignment>,
    pub ability_scores: [i32; 6],
    /// Derived from the total level when absent
    pub proficiency_bonus: Option<i32>,
    /// Taken from the first caster class when absent
    pub spellcasting_ability: Option<Ability>,
    pub armor_class: Option<i32>,
    pub initiative_bonus: Option<i32>,
    pub speed: Option<u32>,
    pub is_favorite: bool,
    pub is_public: bool,
}

impl Default for NewCharacter {
    fn default() -> Self {
        Self {
            name: String::new(),
            player_id: None,
            primary_class_id: None,
            primary_subclass_id: None,
            primary_level: 1,
            secondary_class_id: None,
            secondary_subclass_id: None,
            secondary_level: 0,
            warlock_level: 0,
            race: String::new(),
            subrace: String::new(),
            background: String::new(),
            alignment: None,
            ability_scores: [10; 6],
            proficiency_bonus: None,
            spellcasting_ability: None,
            armor_class: None,
            initiative_bonus: None,
            speed: None,
            is_favorite: false,
            is_public: false,
        }
    }
}

/// Partial edit of a character. `None` leaves a field alone. Ability scores
/// are in STR, DEX, CON, INT, WIS, CHA order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterUpdate {
    pub ability_scores: [Option<i32>; 6],
    pub primary_level: Option<u8>,
    pub secondary_level: Option<u8>,
    pub warlock_level: Option<u8>,
    pub proficiency_bonus: Option<i32>,
    pub is_favorite: Option<bool>,
    pub is_public: Option<bool>,
}

/// Derived spellcasting numbers for one character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellcastingSummary {
    pub character_id: CharacterId,
    pub level: u8,
    pub proficiency_bonus: i32,
    pub spellcasting_ability: Option<Ability>,
    pub spellcasting_modifier: Option<i32>,
    pub spell_save_dc: i32,
    pub spell_attack_bonus: i32,
    pub max_spell_slots: SpellSlots,
}

impl SpellcastingSummary {
    pub fn of(character: &Character) -> Self {
        Self {
            character_id: character.id(),
            level: character.level(),
            proficiency_bonus: character.proficiency_bonus(),
            spellcasting_ability: character.spellcasting_ability(),
            spellcasting_modifier: character.spellcasting_modifier(),
            spell_save_dc: character.spell_save_dc(),
            spell_attack_bonus: character.spell_attack_bonus(),
            max_spell_slots: character.max_spell_slots(),
        }
    }
}

pub struct CharacterUseCases {
    characters: Arc<dyn CharacterRepo>,
    classes: Arc<dyn ClassRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        classes: Arc<dyn ClassRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            classes,
            clock,
        }
    }

    pub async fn create(&self, input: NewCharacter) -> Result<Character, CharacterError> {
        let name = CharacterName::new(input.name).map_err(ValidationError::from)?;
        require_max_length(&input.race, MAX_ORIGIN_LENGTH, "race")?;
        require_max_length(&input.subrace, MAX_ORIGIN_LENGTH, "subrace")?;
        require_max_length(&input.background, MAX_ORIGIN_LENGTH, "background")?;
        if input.secondary_class_id.is_some() {
            require_level(input.secondary_level, 1, u8::MAX, "secondary_level")?;
        }
        let scores = AbilityScores::new(input.ability_scores).map_err(ValidationError::from)?;

        let primary_class = self.resolve_class(input.primary_class_id).await?;
        let secondary_class = self.resolve_class(input.secondary_class_id).await?;

        let spellcasting_ability = input.spellcasting_ability.or_else(|| {
            [&primary_class, &secondary_class]
                .into_iter()
                .flatten()
                .find(|class| class.is_caster())
                .map(|class| class.spellcasting_ability)
        });

        let now = self.clock.now();
        let mut character = Character::new(name, now)
            .with_origin(input.race, input.subrace, input.background)
            .with_ability_scores(scores)
            .with_spellcasting_ability(spellcasting_ability)
            .with_subclasses(input.primary_subclass_id, input.secondary_subclass_id)
            .with_combat_stats(
                input.armor_class.unwrap_or(10),
                input.initiative_bonus.unwrap_or(0),
                input.speed.unwrap_or(30),
            )
            .with_flags(input.is_favorite, input.is_public);
        if let Some(player_id) = input.player_id {
            character = character.with_player(player_id);
        }
        if let Some(alignment) = input.alignment {
            character = character.with_alignment(alignment);
        }
        if let Some(class) = primary_class {
            character = character
                .with_primary_class(class, input.primary_level)
                .map_err(ValidationError::from)?;
        }
        if let Some(class) = secondary_class {
            character = character
                .with_secondary_class(class, input.secondary_level)
                .map_err(ValidationError::from)?;
        }
        character
            .set_levels(
                input.primary_level,
                input.secondary_level,
                input.warlock_level,
                now,
            )
            .map_err(ValidationError::from)?;

        let proficiency_bonus = input
            .proficiency_bonus
            .unwrap_or_else(|| default_proficiency_bonus(character.level()));
        character
            .set_proficiency_bonus(proficiency_bonus, now)
            .map_err(ValidationError::from)?;

        self.characters.save(&character).await?;
        tracing::info!(
            character_id = %character.id(),
            name = %character.name(),
            level = character.level(),
            "Created character"
        );
        Ok(character)
    }

    pub async fn get(&self, id: CharacterId) -> Result<Character, CharacterError> {
        self.characters
            .get(id)
            .await?
            .ok_or(CharacterError::NotFound(id))
    }

    pub async fn list_active(&self) -> Result<Vec<Character>, CharacterError> {
        Ok(self.characters.list_active().await?)
    }

    /// Soft delete. Deactivating an inactive character is a no-op.
    pub async fn deactivate(&self, id: CharacterId) -> Result<(), CharacterError> {
        let mut character = self.get(id).await?;
        if character.deactivate(self.clock.now()) {
            self.characters.save(&character).await?;
            tracing::info!(character_id = %id, "Deactivated character");
        }
        Ok(())
    }

    /// Apply a partial edit. Nothing is saved unless every field is valid.
    pub async fn update(
        &self,
        id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<Character, CharacterError> {
        let mut character = self.get(id).await?;
        let now = self.clock.now();

        for (ability, score) in Ability::ALL.into_iter().zip(update.ability_scores) {
            if let Some(score) = score {
                character
                    .set_ability_score(ability, score, now)
                    .map_err(ValidationError::from)?;
            }
        }

        if update.primary_level.is_some()
            || update.secondary_level.is_some()
            || update.warlock_level.is_some()
        {
            let secondary_level = update
                .secondary_level
                .unwrap_or(character.secondary_level());
            if character.secondary_class().is_some() {
                require_level(secondary_level, 1, u8::MAX, "secondary_level")?;
            }
            character
                .set_levels(
                    update.primary_level.unwrap_or(character.primary_level()),
                    secondary_level,
                    update.warlock_level.unwrap_or(character.warlock_level()),
                    now,
                )
                .map_err(ValidationError::from)?;
        }

        if let Some(bonus) = update.proficiency_bonus {
            character
                .set_proficiency_bonus(bonus, now)
                .map_err(ValidationError::from)?;
        }

        if update.is_favorite.is_some() || update.is_public.is_some() {
            let is_favorite = update.is_favorite.unwrap_or(character.is_favorite());
            let is_public = update.is_public.unwrap_or(character.is_public());
            character = character.with_flags(is_favorite, is_public);
            character.touch(now);
        }

        self.characters.save(&character).await?;
        tracing::info!(character_id = %id, level = character.level(), "Updated character");
        Ok(character)
    }

    /// One more level in the primary class. The proficiency bonus follows the
    /// new total level unless it was already set higher.
    pub async fn level_up(&self, id: CharacterId) -> Result<Character, CharacterError> {
        let mut character = self.get(id).await?;
        let now = self.clock.now();
        character.level_up(now).map_err(ValidationError::from)?;

        let bonus = default_proficiency_bonus(character.level());
        if bonus > character.proficiency_bonus() {
            character
                .set_proficiency_bonus(bonus, now)
                .map_err(ValidationError::from)?;
        }

        self.characters.save(&character).await?;
        tracing::info!(
            character_id = %id,
            primary_level = character.primary_level(),
            level = character.level(),
            "Character levelled up"
        );
        Ok(character)
    }

    pub async fn spellcasting(&self, id: CharacterId) -> Result<SpellcastingSummary, CharacterError> {
        let character = self.get(id).await?;
        Ok(SpellcastingSummary::of(&character))
    }

    async fn resolve_class(
        &self,
        id: Option<CharacterClassId>,
    ) -> Result<Option<CharacterClass>, CharacterError> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.classes
            .get(id)
            .await?
            .map(Some)
            .ok_or(CharacterError::UnknownClass(id))
    }
}

/// Level-based proficiency bonus kept within the range a character accepts.
fn default_proficiency_bonus(total_level: u8) -> i32 {
    Dnd5eSystem
        .proficiency_bonus(total_level)
        .clamp(MIN_PROFICIENCY_BONUS, MAX_PROFICIENCY_BONUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockCharacterRepo, MockClassRepo};
    use chrono::Utc;
    use grimoire_domain::{ClassName, MagicType, SlotKey};
    use mockall::predicate::eq;

    fn class(name: &str, magic_type: MagicType, ability: Ability) -> CharacterClass {
        CharacterClass::new(ClassName::new(name).expect("name"))
            .with_magic_type(magic_type)
            .with_spellcasting_ability(ability)
    }

    fn use_cases(characters: MockCharacterRepo, classes: MockClassRepo) -> CharacterUseCases {
        CharacterUseCases::new(
            Arc::new(characters),
            Arc::new(classes),
            Arc::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn create_resolves_classes_and_derives_defaults() {
        let wizard = class("Wizard", MagicType::FullCaster, Ability::Intelligence);
        let paladin = class("Paladin", MagicType::HalfCaster, Ability::Charisma);
        let (wizard_id, paladin_id) = (wizard.id, paladin.id);

        let mut classes = MockClassRepo::new();
        classes
            .expect_get()
            .with(eq(wizard_id))
            .returning(move |_| Ok(Some(wizard.clone())));
        classes
            .expect_get()
            .with(eq(paladin_id))
            .returning(move |_| Ok(Some(paladin.clone())));
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().times(1).returning(|_| Ok(()));

        let character = use_cases(characters, classes)
            .create(NewCharacter {
                name: "Tasha".to_string(),
                primary_class_id: Some(wizard_id),
                primary_level: 5,
                secondary_class_id: Some(paladin_id),
                secondary_level: 3,
                ability_scores: [10, 12, 14, 18, 10, 13],
                ..Default::default()
            })
            .await
            .expect("create");

        assert_eq!(character.level(), 8);
        assert_eq!(character.proficiency_bonus(), 3);
        assert_eq!(character.spellcasting_ability(), Some(Ability::Intelligence));
        assert_eq!(character.spell_save_dc(), 15);
        let slots = character.max_spell_slots();
        assert_eq!(slots.tier(1), 7);
        assert_eq!(slots.tier(2), 3);
        assert_eq!(slots.tier(3), 2);
    }

    #[tokio::test]
    async fn explicit_spellcasting_ability_wins() {
        let cleric = class("Cleric", MagicType::FullCaster, Ability::Wisdom);
        let cleric_id = cleric.id;
        let mut classes = MockClassRepo::new();
        classes
            .expect_get()
            .returning(move |_| Ok(Some(cleric.clone())));
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().returning(|_| Ok(()));

        let character = use_cases(characters, classes)
            .create(NewCharacter {
                name: "Odd cleric".to_string(),
                primary_class_id: Some(cleric_id),
                spellcasting_ability: Some(Ability::Charisma),
                proficiency_bonus: Some(4),
                ..Default::default()
            })
            .await
            .expect("create");

        assert_eq!(character.spellcasting_ability(), Some(Ability::Charisma));
        assert_eq!(character.proficiency_bonus(), 4);
    }

    #[tokio::test]
    async fn non_caster_without_ability_has_no_spellcasting() {
        let fighter = class("Fighter", MagicType::NonCaster, Ability::Wisdom);
        let fighter_id = fighter.id;
        let mut classes = MockClassRepo::new();
        classes
            .expect_get()
            .returning(move |_| Ok(Some(fighter.clone())));
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().returning(|_| Ok(()));

        let character = use_cases(characters, classes)
            .create(NewCharacter {
                name: "Brute".to_string(),
                primary_class_id: Some(fighter_id),
                primary_level: 20,
                ..Default::default()
            })
            .await
            .expect("create");

        assert_eq!(character.spellcasting_ability(), None);
        assert_eq!(character.spell_save_dc(), 0);
        assert_eq!(character.proficiency_bonus(), 6);
    }

    #[tokio::test]
    async fn unknown_class_is_rejected_before_saving() {
        let mut classes = MockClassRepo::new();
        classes.expect_get().returning(|_| Ok(None));
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().never();

        let err = use_cases(characters, classes)
            .create(NewCharacter {
                name: "Lost".to_string(),
                primary_class_id: Some(CharacterClassId::new()),
                ..Default::default()
            })
            .await
            .expect_err("unknown class");

        assert!(matches!(err, CharacterError::UnknownClass(_)));
    }

    #[tokio::test]
    async fn out_of_range_inputs_are_validation_errors() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().never();
        let use_cases = use_cases(characters, MockClassRepo::new());

        let bad_score = use_cases
            .create(NewCharacter {
                name: "Titan".to_string(),
                ability_scores: [31, 10, 10, 10, 10, 10],
                ..Default::default()
            })
            .await
            .expect_err("score");
        assert!(matches!(bad_score, CharacterError::Validation(_)));

        let bad_level = use_cases
            .create(NewCharacter {
                name: "Ancient".to_string(),
                primary_level: 21,
                ..Default::default()
            })
            .await
            .expect_err("level");
        assert!(matches!(bad_level, CharacterError::Validation(_)));

        let bad_race = use_cases
            .create(NewCharacter {
                name: "Verbose".to_string(),
                race: "r".repeat(MAX_ORIGIN_LENGTH + 1),
                ..Default::default()
            })
            .await
            .expect_err("race");
        assert_eq!(bad_race.to_string(), "race exceeds maximum length of 100");
    }

    #[tokio::test]
    async fn warlock_only_character_gets_a_pact_entry() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_save().returning(|_| Ok(()));

        let character = use_cases(characters, MockClassRepo::new())
            .create(NewCharacter {
                name: "Hexer".to_string(),
                warlock_level: 3,
                spellcasting_ability: Some(Ability::Charisma),
                ..Default::default()
            })
            .await
            .expect("create");

        let slots = character.max_spell_slots();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get(SlotKey::Warlock(2)), 2);
    }

    #[tokio::test]
    async fn deactivate_saves_only_on_change() {
        let now = Utc::now();
        let active = Character::new(CharacterName::new("Mira").expect("name"), now);
        let id = active.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(active.clone())));
        characters
            .expect_save()
            .withf(|c| !c.is_active())
            .times(1)
            .returning(|_| Ok(()));

        use_cases(characters, MockClassRepo::new())
            .deactivate(id)
            .await
            .expect("deactivate");

        let mut inactive = Character::new(CharacterName::new("Gone").expect("name"), now);
        inactive.deactivate(now);
        let inactive_id = inactive.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(inactive.clone())));
        characters.expect_save().never();

        use_cases(characters, MockClassRepo::new())
            .deactivate(inactive_id)
            .await
            .expect("already inactive");
    }

    #[tokio::test]
    async fn spellcasting_summary_reflects_derived_stats() {
        let now = Utc::now();
        let druid = class("Druid", MagicType::FullCaster, Ability::Wisdom);
        let character = Character::new(CharacterName::new("Ash").expect("name"), now)
            .with_primary_class(druid, 1)
            .expect("level")
            .with_ability_scores(AbilityScores::new([10, 10, 10, 10, 16, 10]).expect("scores"))
            .with_spellcasting_ability(Some(Ability::Wisdom));
        let id = character.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(character.clone())));

        let summary = use_cases(characters, MockClassRepo::new())
            .spellcasting(id)
            .await
            .expect("summary");

        assert_eq!(summary.level, 1);
        assert_eq!(summary.spellcasting_modifier, Some(3));
        assert_eq!(summary.spell_save_dc, 13);
        assert_eq!(summary.spell_attack_bonus, 5);
        assert_eq!(summary.max_spell_slots.tier(1), 2);
        assert_eq!(summary.max_spell_slots.len(), 1);
    }

    #[tokio::test]
    async fn get_missing_character_is_not_found() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|_| Ok(None));

        let err = use_cases(characters, MockClassRepo::new())
            .get(CharacterId::new())
            .await
            .expect_err("missing");

        assert!(matches!(err, CharacterError::NotFound(_)));
    }

    fn wizard_at(level: u8) -> Character {
        Character::new(CharacterName::new("Elminster").expect("name"), Utc::now())
            .with_primary_class(
                class("Wizard", MagicType::FullCaster, Ability::Intelligence),
                level,
            )
            .expect("level")
            .with_spellcasting_ability(Some(Ability::Intelligence))
    }

    #[tokio::test]
    async fn level_up_raises_level_and_proficiency() {
        let wizard = wizard_at(4);
        let id = wizard.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(wizard.clone())));
        characters
            .expect_save()
            .withf(|c| c.primary_level() == 5 && c.proficiency_bonus() == 3)
            .times(1)
            .returning(|_| Ok(()));

        let levelled = use_cases(characters, MockClassRepo::new())
            .level_up(id)
            .await
            .expect("level up");

        assert_eq!(levelled.level(), 5);
        assert_eq!(levelled.max_spell_slots().tier(3), 2);
    }

    #[tokio::test]
    async fn level_up_past_twenty_is_rejected() {
        let wizard = wizard_at(20);
        let id = wizard.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(wizard.clone())));
        characters.expect_save().never();

        let err = use_cases(characters, MockClassRepo::new())
            .level_up(id)
            .await
            .expect_err("cap");

        assert!(matches!(err, CharacterError::Validation(_)));
    }

    #[tokio::test]
    async fn update_edits_only_the_given_fields() {
        let wizard = wizard_at(3);
        let id = wizard.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(wizard.clone())));
        characters.expect_save().times(1).returning(|_| Ok(()));

        let updated = use_cases(characters, MockClassRepo::new())
            .update(
                id,
                CharacterUpdate {
                    ability_scores: [None, None, None, Some(18), None, None],
                    warlock_level: Some(2),
                    is_favorite: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.ability_scores().get(Ability::Intelligence), 18);
        assert_eq!(updated.ability_scores().get(Ability::Strength), 10);
        assert_eq!(updated.primary_level(), 3);
        assert_eq!(updated.warlock_level(), 2);
        assert!(updated.is_favorite());
        assert!(!updated.is_public());
        assert_eq!(updated.spell_save_dc(), 14);
    }

    #[tokio::test]
    async fn invalid_update_saves_nothing() {
        let wizard = wizard_at(3);
        let id = wizard.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(wizard.clone())));
        characters.expect_save().never();

        let err = use_cases(characters, MockClassRepo::new())
            .update(
                id,
                CharacterUpdate {
                    ability_scores: [Some(12), None, None, None, None, Some(31)],
                    ..Default::default()
                },
            )
            .await
            .expect_err("score");

        assert!(matches!(err, CharacterError::Validation(_)));
    }
}
