//! Spell catalogue operations.

use std::sync::Arc;

use grimoire_domain::{
    Ability, AttackType, CharacterClassId, MaterialComponentId, Spell, SpellId, SpellLevel,
    SpellName,
};

use super::validation::{require_max_length, require_non_empty, ValidationError};
use crate::infrastructure::ports::{ClassRepo, ClockPort, MaterialComponentRepo, RepoError, SpellRepo};

/// Longest range, duration or source book text, in characters.
pub const MAX_SPELL_TEXT_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum SpellError {
    #[error("Spell not found: {0}")]
    NotFound(SpellId),
    #[error("A spell named {0} already exists")]
    DuplicateName(String),
    #[error("Unknown material component: {0}")]
    UnknownComponent(MaterialComponentId),
    #[error("Unknown character class: {0}")]
    UnknownClass(CharacterClassId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSpell {
    pub name: String,
    pub level: u8,
    pub range: String,
    pub duration: String,
    pub description: String,
    pub higher_level: String,
    pub verbal: bool,
    pub somatic: bool,
    pub material_components: Vec<MaterialComponentId>,
    pub concentration: bool,
    pub ritual: bool,
    pub attack_type: AttackType,
    pub saving_throw: Option<Ability>,
    pub available_classes: Vec<CharacterClassId>,
    pub source_book: String,
    pub page_number: Option<u32>,
}

pub struct SpellUseCases {
    spells: Arc<dyn SpellRepo>,
    components: Arc<dyn MaterialComponentRepo>,
    classes: Arc<dyn ClassRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SpellUseCases {
    pub fn new(
        spells: Arc<dyn SpellRepo>,
        components: Arc<dyn MaterialComponentRepo>,
        classes: Arc<dyn ClassRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            spells,
            components,
            classes,
            clock,
        }
    }

    pub async fn list(&self) -> Result<Vec<Spell>, SpellError> {
        Ok(self.spells.list().await?)
    }

    pub async fn get(&self, id: SpellId) -> Result<Spell, SpellError> {
        self.spells.get(id).await?.ok_or(SpellError::NotFound(id))
    }

    /// Add a spell. Component and class references must already exist.
    pub async fn create(&self, input: NewSpell) -> Result<Spell, SpellError> {
        let name = SpellName::new(input.name).map_err(ValidationError::from)?;
        let level = SpellLevel::new(input.level).map_err(ValidationError::from)?;
        require_non_empty(&input.duration, "duration")?;
        require_non_empty(&input.description, "description")?;
        require_max_length(&input.range, MAX_SPELL_TEXT_LENGTH, "range")?;
        require_max_length(&input.duration, MAX_SPELL_TEXT_LENGTH, "duration")?;
        require_max_length(&input.source_book, MAX_SPELL_TEXT_LENGTH, "source_book")?;

        for &id in &input.material_components {
            if self.components.get(id).await?.is_none() {
                return Err(SpellError::UnknownComponent(id));
            }
        }
        for &id in &input.available_classes {
            if self.classes.get(id).await?.is_none() {
                return Err(SpellError::UnknownClass(id));
            }
        }

        let mut spell = Spell::new(
            name,
            level,
            input.duration,
            input.description,
            self.clock.now(),
        );
        spell.range = input.range;
        spell.higher_level = input.higher_level;
        spell.verbal = input.verbal;
        spell.somatic = input.somatic;
        spell.material_components = input.material_components;
        spell.concentration = input.concentration;
        spell.ritual = input.ritual;
        spell.attack_type = input.attack_type;
        spell.saving_throw = input.saving_throw;
        spell.available_classes = input.available_classes;
        spell.source_book = input.source_book;
        spell.page_number = input.page_number;

        match self.spells.save(&spell).await {
            Ok(()) => {}
            Err(RepoError::ConstraintViolation(_)) => {
                return Err(SpellError::DuplicateName(spell.name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(spell_id = %spell.id, name = %spell.name, level = %spell.level, "Created spell");
        Ok(spell)
    }
}
