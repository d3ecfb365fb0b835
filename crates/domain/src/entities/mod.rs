//! Catalogue entities: classes, spells and components.

mod character_class;
mod material_component;
mod spell;

pub use character_class::{CharacterClass, Subclass, DEFAULT_SUBCLASS_LEVEL};
pub use material_component::{
    truncate_text, ComponentKind, MaterialComponent, SpellComponent, DESCRIPTION_PREVIEW_LENGTH,
};
pub use spell::{
    AttackType, DamageType, Effect, MagicSchool, Spell, SpellLevel, SpellTime,
};
