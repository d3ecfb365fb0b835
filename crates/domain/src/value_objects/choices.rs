//! Small closed vocabularies used across the catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// The nine-way alignment grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[serde(rename = "LG")]
    LawfulGood,
    #[serde(rename = "NG")]
    NeutralGood,
    #[serde(rename = "CG")]
    ChaoticGood,
    #[serde(rename = "LN")]
    LawfulNeutral,
    #[serde(rename = "TN")]
    TrueNeutral,
    #[serde(rename = "CN")]
    ChaoticNeutral,
    #[serde(rename = "LE")]
    LawfulEvil,
    #[serde(rename = "NE")]
    NeutralEvil,
    #[serde(rename = "CE")]
    ChaoticEvil,
}

impl Alignment {
    pub fn code(&self) -> &'static str {
        match self {
            Alignment::LawfulGood => "LG",
            Alignment::NeutralGood => "NG",
            Alignment::ChaoticGood => "CG",
            Alignment::LawfulNeutral => "LN",
            Alignment::TrueNeutral => "TN",
            Alignment::ChaoticNeutral => "CN",
            Alignment::LawfulEvil => "LE",
            Alignment::NeutralEvil => "NE",
            Alignment::ChaoticEvil => "CE",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::LawfulGood => "Lawful Good",
            Alignment::NeutralGood => "Neutral Good",
            Alignment::ChaoticGood => "Chaotic Good",
            Alignment::LawfulNeutral => "Lawful Neutral",
            Alignment::TrueNeutral => "True Neutral",
            Alignment::ChaoticNeutral => "Chaotic Neutral",
            Alignment::LawfulEvil => "Lawful Evil",
            Alignment::NeutralEvil => "Neutral Evil",
            Alignment::ChaoticEvil => "Chaotic Evil",
        };
        f.write_str(name)
    }
}

/// Polyhedral dice used for hit dice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dice {
    #[serde(rename = "d2")]
    D2,
    #[serde(rename = "d4")]
    D4,
    #[serde(rename = "d6")]
    D6,
    #[default]
    #[serde(rename = "d8")]
    D8,
    #[serde(rename = "d10")]
    D10,
    #[serde(rename = "d12")]
    D12,
    #[serde(rename = "d20")]
    D20,
    #[serde(rename = "d100")]
    D100,
}

impl Dice {
    pub fn sides(&self) -> u8 {
        match self {
            Dice::D2 => 2,
            Dice::D4 => 4,
            Dice::D6 => 6,
            Dice::D8 => 8,
            Dice::D10 => 10,
            Dice::D12 => 12,
            Dice::D20 => 20,
            Dice::D100 => 100,
        }
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

impl FromStr for Dice {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let sides = s
            .trim()
            .trim_start_matches(['d', 'D'])
            .parse::<u8>()
            .map_err(|_| DomainError::parse(format!("Invalid die: {}", s)))?;
        match sides {
            2 => Ok(Dice::D2),
            4 => Ok(Dice::D4),
            6 => Ok(Dice::D6),
            8 => Ok(Dice::D8),
            10 => Ok(Dice::D10),
            12 => Ok(Dice::D12),
            20 => Ok(Dice::D20),
            100 => Ok(Dice::D100),
            _ => Err(DomainError::parse(format!("Invalid die: {}", s))),
        }
    }
}

/// What kind of effect a spell produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectCategory {
    #[serde(rename = "COND")]
    Condition,
    #[serde(rename = "CTRL")]
    Control,
    #[serde(rename = "DEBF")]
    Debuff,
    #[serde(rename = "BUFF")]
    Buff,
    #[serde(rename = "UTIL")]
    Utility,
    #[serde(rename = "MOVE")]
    Movement,
    #[serde(rename = "TP")]
    Teleport,
    #[serde(rename = "HEAL")]
    Healing,
    #[serde(rename = "DMG")]
    Damage,
    #[serde(rename = "PROT")]
    Protection,
    #[serde(rename = "TMUT")]
    Transmutation,
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EffectCategory::Condition => "Condition",
            EffectCategory::Control => "Control",
            EffectCategory::Debuff => "Debuff",
            EffectCategory::Buff => "Buff",
            EffectCategory::Utility => "Utility",
            EffectCategory::Movement => "Movement",
            EffectCategory::Teleport => "Teleport",
            EffectCategory::Healing => "Healing",
            EffectCategory::Damage => "Damage",
            EffectCategory::Protection => "Protection",
            EffectCategory::Transmutation => "Transmutation",
        };
        f.write_str(name)
    }
}
