//! Character classes and their subclasses.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{require_range, DomainError};
use crate::game_systems::MagicType;
use crate::ids::{CharacterClassId, SubclassId};
use crate::value_objects::{Ability, ClassName, Dice, SubclassName};

/// A playable class such as Wizard or Paladin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub id: CharacterClassId,
    pub name: ClassName,
    #[serde(default)]
    pub description: String,
    /// Slot progression this class follows
    #[serde(default)]
    pub magic_type: MagicType,
    #[serde(default)]
    pub hit_die: Dice,
    /// Ability the class casts with
    #[serde(default = "default_class_ability")]
    pub spellcasting_ability: Ability,
}

fn default_class_ability() -> Ability {
    Ability::Wisdom
}

impl CharacterClass {
    /// A non-caster class with a d8 hit die, casting on WIS if it ever does.
    pub fn new(name: ClassName) -> Self {
        Self {
            id: CharacterClassId::new(),
            name,
            description: String::new(),
            magic_type: MagicType::NonCaster,
            hit_die: Dice::D8,
            spellcasting_ability: default_class_ability(),
        }
    }

    pub fn with_id(mut self, id: CharacterClassId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_magic_type(mut self, magic_type: MagicType) -> Self {
        self.magic_type = magic_type;
        self
    }

    pub fn with_hit_die(mut self, hit_die: Dice) -> Self {
        self.hit_die = hit_die;
        self
    }

    pub fn with_spellcasting_ability(mut self, ability: Ability) -> Self {
        self.spellcasting_ability = ability;
        self
    }

    pub fn is_caster(&self) -> bool {
        self.magic_type.is_caster()
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

/// Default class level at which a subclass is chosen.
pub const DEFAULT_SUBCLASS_LEVEL: u8 = 3;

/// An archetype within a class, e.g. "School of Evocation".
///
/// Schema only: spells may list subclass ids, but subclasses themselves are
/// not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subclass {
    pub id: SubclassId,
    pub class_id: CharacterClassId,
    /// Name of the owning class, kept for display
    pub class_name: ClassName,
    pub name: SubclassName,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features_description: String,
    level_gained: u8,
}

impl Subclass {
    pub fn new(class: &CharacterClass, name: SubclassName) -> Self {
        Self {
            id: SubclassId::new(),
            class_id: class.id,
            class_name: class.name.clone(),
            name,
            description: String::new(),
            features_description: String::new(),
            level_gained: DEFAULT_SUBCLASS_LEVEL,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features_description = features.into();
        self
    }

    /// Set the class level the subclass is gained at (1..=20).
    pub fn with_level_gained(mut self, level: u8) -> Result<Self, DomainError> {
        self.level_gained = require_range(level, 1, 20, "level_gained")?;
        Ok(self)
    }

    pub fn level_gained(&self) -> u8 {
        self.level_gained
    }

    pub fn belongs_to(&self, class_id: CharacterClassId) -> bool {
        self.class_id == class_id
    }
}

impl fmt::Display for Subclass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.class_name)
    }
}
