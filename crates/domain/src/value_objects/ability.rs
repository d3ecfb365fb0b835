//! Ability scores - the six core attributes every character carries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{require_range, DomainError};

/// Lowest legal ability score.
pub const MIN_ABILITY_SCORE: i32 = 1;
/// Highest legal ability score.
pub const MAX_ABILITY_SCORE: i32 = 30;
/// Score a freshly created character starts with.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

/// The six abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
}

impl Ability {
    /// All abilities in sheet order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter abbreviation used on character sheets.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    fn index(self) -> usize {
        match self {
            Ability::Strength => 0,
            Ability::Dexterity => 1,
            Ability::Constitution => 2,
            Ability::Intelligence => 3,
            Ability::Wisdom => 4,
            Ability::Charisma => 5,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Strength),
            "dex" | "dexterity" => Ok(Ability::Dexterity),
            "con" | "constitution" => Ok(Ability::Constitution),
            "int" | "intelligence" => Ok(Ability::Intelligence),
            "wis" | "wisdom" => Ok(Ability::Wisdom),
            "cha" | "charisma" => Ok(Ability::Charisma),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// A full set of ability scores, each within 1..=30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AbilityScoresRecord", into = "AbilityScoresRecord")]
pub struct AbilityScores([i32; 6]);

impl AbilityScores {
    /// Build a score set in STR, DEX, CON, INT, WIS, CHA order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if any score is outside 1..=30.
    pub fn new(scores: [i32; 6]) -> Result<Self, DomainError> {
        for (ability, score) in Ability::ALL.iter().zip(scores) {
            check_score(*ability, score)?;
        }
        Ok(Self(scores))
    }

    /// Score for one ability.
    pub fn get(&self, ability: Ability) -> i32 {
        self.0[ability.index()]
    }

    /// Replace the score for one ability.
    pub fn set(&mut self, ability: Ability, score: i32) -> Result<(), DomainError> {
        self.0[ability.index()] = check_score(ability, score)?;
        Ok(())
    }

    /// Builder-style variant of [`AbilityScores::set`].
    pub fn with(mut self, ability: Ability, score: i32) -> Result<Self, DomainError> {
        self.set(ability, score)?;
        Ok(self)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self([DEFAULT_ABILITY_SCORE; 6])
    }
}

fn check_score(ability: Ability, score: i32) -> Result<i32, DomainError> {
    require_range(
        score,
        MIN_ABILITY_SCORE,
        MAX_ABILITY_SCORE,
        ability.abbreviation(),
    )
}

/// Named-field wire form of [`AbilityScores`].
#[derive(Serialize, Deserialize)]
struct AbilityScoresRecord {
    #[serde(default = "default_score")]
    strength: i32,
    #[serde(default = "default_score")]
    dexterity: i32,
    #[serde(default = "default_score")]
    constitution: i32,
    #[serde(default = "default_score")]
    intelligence: i32,
    #[serde(default = "default_score")]
    wisdom: i32,
    #[serde(default = "default_score")]
    charisma: i32,
}

fn default_score() -> i32 {
    DEFAULT_ABILITY_SCORE
}

impl TryFrom<AbilityScoresRecord> for AbilityScores {
    type Error = DomainError;

    fn try_from(r: AbilityScoresRecord) -> Result<Self, Self::Error> {
        Self::new([
            r.strength,
            r.dexterity,
            r.constitution,
            r.intelligence,
            r.wisdom,
            r.charisma,
        ])
    }
}

impl From<AbilityScores> for AbilityScoresRecord {
    fn from(scores: AbilityScores) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores.0;
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }
}
