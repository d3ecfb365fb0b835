//! Spell components: the material component catalogue and generic
//! verbal / somatic / material component records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::ids::MaterialComponentId;
use crate::value_objects::{ComponentName, GoldCost};

/// Default cut-off for descriptions in list views.
pub const DESCRIPTION_PREVIEW_LENGTH: usize = 20;

/// Shorten `text` to `max_length` characters, appending `...` when cut.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// A physical item consumed or held while casting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialComponent {
    pub id: MaterialComponentId,
    pub name: ComponentName,
    pub description: Option<String>,
    /// Price in gold pieces
    pub cost: Option<GoldCost>,
    /// Used up when the spell is cast
    #[serde(default)]
    pub is_consumable: bool,
    /// Can serve as a spellcasting focus
    #[serde(default)]
    pub is_focus: bool,
}

impl MaterialComponent {
    pub fn new(name: ComponentName) -> Self {
        Self {
            id: MaterialComponentId::new(),
            name,
            description: None,
            cost: None,
            is_consumable: false,
            is_focus: false,
        }
    }

    pub fn with_id(mut self, id: MaterialComponentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cost(mut self, cost: GoldCost) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn consumable(mut self) -> Self {
        self.is_consumable = true;
        self
    }

    pub fn focus(mut self) -> Self {
        self.is_focus = true;
        self
    }

    /// The description cut to `max_length` characters, empty when absent.
    pub fn truncate_description(&self, max_length: usize) -> String {
        self.description
            .as_deref()
            .map(|text| truncate_text(text, max_length))
            .unwrap_or_default()
    }

    /// Whether the component has a price worth mentioning.
    pub fn has_cost(&self) -> bool {
        self.cost.is_some_and(|cost| !cost.is_zero())
    }
}

impl fmt::Display for MaterialComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.name)?;
        if let Some(cost) = self.cost.filter(|cost| !cost.is_zero()) {
            write!(f, "| ({} gp) ", cost)?;
        }
        write!(
            f,
            "({})",
            self.truncate_description(DESCRIPTION_PREVIEW_LENGTH)
        )
    }
}

/// Verbal, somatic or material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    #[serde(rename = "V")]
    Verbal,
    #[serde(rename = "S")]
    Somatic,
    #[serde(rename = "M")]
    Material,
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Verbal => "Verbal",
            ComponentKind::Somatic => "Somatic",
            ComponentKind::Material => "Material",
        };
        f.write_str(name)
    }
}

/// A single component requirement of a spell.
///
/// Only material components may carry a cost. Schema only: stored spells
/// keep plain V/S flags plus material component ids instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellComponent {
    kind: Option<ComponentKind>,
    description: Option<String>,
    cost: GoldCost,
}

impl SpellComponent {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a non-material component is
    /// given a cost.
    pub fn new(
        kind: Option<ComponentKind>,
        description: Option<String>,
        cost: GoldCost,
    ) -> Result<Self, DomainError> {
        let component = Self {
            kind,
            description,
            cost,
        };
        component.validate()?;
        Ok(component)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.kind != Some(ComponentKind::Material) && !self.cost.is_zero() {
            return Err(DomainError::validation(
                "cost: only material components can have a cost",
            ));
        }
        Ok(())
    }

    pub fn kind(&self) -> Option<ComponentKind> {
        self.kind
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cost(&self) -> GoldCost {
        self.cost
    }
}
