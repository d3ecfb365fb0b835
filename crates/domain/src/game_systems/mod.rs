//! Game system rules: the traits the calculator is exposed through, and the
//! D&D 5e implementation.

mod dnd5e;
mod traits;

pub use dnd5e::Dnd5eSystem;
pub use traits::{
    CalculationEngine, ClassProgression, MagicType, SpellcasterSheet, SpellcastingSystem,
};
