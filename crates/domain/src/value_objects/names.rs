//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits (counted in characters)
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Longest accepted value, in characters.
            pub const MAX_LENGTH: usize = $max;

            /// Create a new validated name.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after
            /// trimming or longer than [`Self::MAX_LENGTH`] characters.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.chars().count() > Self::MAX_LENGTH {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label,
                        Self::MAX_LENGTH
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_name!(
    /// A character's name (<=100 chars).
    CharacterName, "Character name", 100
);
define_name!(
    /// A character class name such as "Wizard" (<=50 chars).
    ClassName, "Class name", 50
);
define_name!(
    /// A subclass name such as "School of Evocation" (<=100 chars).
    SubclassName, "Subclass name", 100
);
define_name!(
    /// A spell name (<=150 chars).
    SpellName, "Spell name", 150
);
define_name!(
    /// A material component name (<=49 chars).
    ComponentName, "Component name", 49
);
define_name!(
    /// A casting time label such as "1 action" (<=49 chars).
    SpellTimeLabel, "Casting time", 49
);
define_name!(
    /// A school of magic (<=99 chars).
    SchoolName, "School name", 99
);
define_name!(
    /// A damage type such as "Fire" (<=30 chars).
    DamageTypeName, "Damage type", 30
);
define_name!(
    /// A spell effect name (<=49 chars).
    EffectName, "Effect name", 49
);
define_name!(
    /// A spellbook title (<=100 chars).
    SpellbookName, "Spellbook name", 100
);
