//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area.
//! Use cases load records through port traits, apply domain rules and save.

pub mod character;
pub mod class;
pub mod material_component;
pub mod spell;
pub mod spellbook;
pub mod validation;

// Re-export main types
pub use character::{
    CharacterError, CharacterUpdate, CharacterUseCases, NewCharacter, SpellcastingSummary,
};
pub use class::{ClassError, ClassUseCases, NewClass};
pub use material_component::{
    MaterialComponentError, MaterialComponentInput, MaterialComponentPatch,
    MaterialComponentUseCases,
};
pub use spell::{NewSpell, SpellError, SpellUseCases};
pub use spellbook::{NewSpellbook, SlotUseOutcome, SpellbookError, SpellbookUseCases};
pub use validation::ValidationError;
