//! Spell catalogue: spells and the reference data they point at.
//!
//! Only [`Spell`] is persisted and served by the engine. [`SpellTime`],
//! [`MagicSchool`], [`DamageType`] and [`Effect`] are schema types: spells
//! refer to them by id, but no repository stores them and no route lists them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{require_range, DomainError};
use crate::ids::{
    CharacterClassId, DamageTypeId, EffectId, MagicSchoolId, MaterialComponentId, PlayerId,
    SpellId, SpellTimeId, SubclassId,
};
use crate::value_objects::{
    Ability, DamageTypeName, EffectCategory, EffectName, SchoolName, SpellName, SpellTimeLabel,
};

/// Spell level: 0 for cantrips, otherwise 1 through 9.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpellLevel(u8);

impl SpellLevel {
    pub const CANTRIP: SpellLevel = SpellLevel(0);

    pub fn new(level: u8) -> Result<Self, DomainError> {
        Ok(Self(require_range(level, 0, 9, "spell level")?))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_cantrip(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cantrip() {
            f.write_str("Cantrip")
        } else {
            write!(f, "Level {}", self.0)
        }
    }
}

impl TryFrom<u8> for SpellLevel {
    type Error = DomainError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<SpellLevel> for u8 {
    fn from(level: SpellLevel) -> u8 {
        level.0
    }
}

/// How a spell resolves against its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttackType {
    /// Spell attack roll
    Attack,
    /// Target makes a saving throw
    Save,
    /// Always takes effect
    Auto,
    /// Both an attack roll and a save
    Mixed,
    #[default]
    None,
}

/// A spell definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: SpellId,
    pub name: SpellName,
    pub level: SpellLevel,
    pub casting_time: Option<SpellTimeId>,
    pub school: Option<MagicSchoolId>,
    #[serde(default)]
    pub verbal: bool,
    #[serde(default)]
    pub somatic: bool,
    #[serde(default)]
    pub material_components: Vec<MaterialComponentId>,
    /// Range, in feet unless stated otherwise
    #[serde(default)]
    pub range: String,
    pub duration: String,
    #[serde(default)]
    pub concentration: bool,
    #[serde(default)]
    pub ritual: bool,
    pub description: String,
    /// What changes when cast with a higher slot
    #[serde(default)]
    pub higher_level: String,
    #[serde(default)]
    pub attack_type: AttackType,
    pub saving_throw: Option<Ability>,
    #[serde(default)]
    pub effects: Vec<EffectId>,
    #[serde(default)]
    pub available_classes: Vec<CharacterClassId>,
    #[serde(default)]
    pub available_subclasses: Vec<SubclassId>,
    #[serde(default)]
    pub source_book: String,
    pub page_number: Option<u32>,
    #[serde(default = "default_official")]
    pub is_official: bool,
    pub created_by: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_official() -> bool {
    true
}

impl Spell {
    pub fn new(
        name: SpellName,
        level: SpellLevel,
        duration: impl Into<String>,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SpellId::new(),
            name,
            level,
            casting_time: None,
            school: None,
            verbal: false,
            somatic: false,
            material_components: Vec::new(),
            range: String::new(),
            duration: duration.into(),
            concentration: false,
            ritual: false,
            description: description.into(),
            higher_level: String::new(),
            attack_type: AttackType::None,
            saving_throw: None,
            effects: Vec::new(),
            available_classes: Vec::new(),
            available_subclasses: Vec::new(),
            source_book: String::new(),
            page_number: None,
            is_official: true,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level.is_cantrip()
    }

    pub fn requires_material(&self) -> bool {
        !self.material_components.is_empty()
    }

    /// Whether characters of the given class may learn this spell.
    pub fn available_to(&self, class_id: CharacterClassId) -> bool {
        self.available_classes.contains(&class_id)
    }

    /// Component shorthand such as "V, S, M".
    pub fn component_summary(&self) -> String {
        let mut parts = Vec::new();
        if self.verbal {
            parts.push("V");
        }
        if self.somatic {
            parts.push("S");
        }
        if self.requires_material() {
            parts.push("M");
        }
        parts.join(", ")
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.level)
    }
}

/// How long a spell takes to cast, e.g. "1 action".
///
/// Schema only; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellTime {
    pub id: SpellTimeId,
    pub label: SpellTimeLabel,
    #[serde(default)]
    pub description: String,
}

impl SpellTime {
    pub fn new(label: SpellTimeLabel, description: impl Into<String>) -> Self {
        Self {
            id: SpellTimeId::new(),
            label,
            description: description.into(),
        }
    }
}

impl fmt::Display for SpellTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label.as_str())
    }
}

const DEFAULT_SCHOOL_COLOUR: &str = "#3498db";

/// A school of magic such as Evocation.
///
/// Schema only; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicSchool {
    pub id: MagicSchoolId,
    pub name: SchoolName,
    #[serde(default)]
    pub description: String,
    colour: String,
}

impl MagicSchool {
    pub fn new(name: SchoolName, description: impl Into<String>) -> Self {
        Self {
            id: MagicSchoolId::new(),
            name,
            description: description.into(),
            colour: DEFAULT_SCHOOL_COLOUR.to_string(),
        }
    }

    /// Set the display colour, a `#rrggbb` hex string.
    pub fn with_colour(mut self, colour: &str) -> Result<Self, DomainError> {
        let hex = colour
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| DomainError::validation(format!("Invalid colour: {}", colour)))?;
        self.colour = format!("#{}", hex.to_ascii_lowercase());
        Ok(self)
    }

    pub fn colour(&self) -> &str {
        &self.colour
    }
}

impl fmt::Display for MagicSchool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}

/// A kind of damage, e.g. Fire or Bludgeoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageType {
    pub id: DamageTypeId,
    pub name: DamageTypeName,
    #[serde(default)]
    pub description: String,
    pub is_magical: bool,
}

impl DamageType {
    pub fn new(name: DamageTypeName, is_magical: bool) -> Self {
        Self {
            id: DamageTypeId::new(),
            name,
            description: String::new(),
            is_magical,
        }
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_magical {
            "(magical)"
        } else {
            "(non-magical)"
        };
        write!(f, "{} - {}", self.name, kind)
    }
}

/// Something a spell does to its target.
///
/// Schema only; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub name: EffectName,
    #[serde(default)]
    pub description: String,
    pub category: Option<EffectCategory>,
    #[serde(default)]
    pub duration: String,
    pub damage_type: Option<DamageTypeId>,
}

impl Effect {
    pub fn new(name: EffectName, category: Option<EffectCategory>) -> Self {
        Self {
            id: EffectId::new(),
            name,
            description: String::new(),
            category,
            duration: String::new(),
            damage_type: None,
        }
    }

    pub fn with_damage_type(mut self, damage_type: DamageTypeId) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    pub fn deals_damage(&self) -> bool {
        self.damage_type.is_some() || self.category == Some(EffectCategory::Damage)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_str())
    }
}
