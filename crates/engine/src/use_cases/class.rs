//! Character class catalogue operations.

use std::sync::Arc;

use grimoire_domain::{Ability, CharacterClass, ClassName, Dice, MagicType};

use super::validation::ValidationError;
use crate::infrastructure::ports::{ClassRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum ClassError {
    #[error("A class named {0} already exists")]
    DuplicateName(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClass {
    pub name: String,
    pub description: String,
    pub magic_type: MagicType,
    pub hit_die: Option<Dice>,
    pub spellcasting_ability: Option<Ability>,
}

pub struct ClassUseCases {
    repo: Arc<dyn ClassRepo>,
}

impl ClassUseCases {
    pub fn new(repo: Arc<dyn ClassRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<CharacterClass>, ClassError> {
        Ok(self.repo.list().await?)
    }

    pub async fn create(&self, input: NewClass) -> Result<CharacterClass, ClassError> {
        let name = ClassName::new(input.name).map_err(ValidationError::from)?;
        let mut class = CharacterClass::new(name)
            .with_description(input.description)
            .with_magic_type(input.magic_type);
        if let Some(hit_die) = input.hit_die {
            class = class.with_hit_die(hit_die);
        }
        if let Some(ability) = input.spellcasting_ability {
            class = class.with_spellcasting_ability(ability);
        }

        match self.repo.save(&class).await {
            Ok(()) => {}
            Err(RepoError::ConstraintViolation(_)) => {
                return Err(ClassError::DuplicateName(class.name.to_string()))
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            class_id = %class.id,
            name = %class.name,
            magic_type = %class.magic_type,
            "Created character class"
        );
        Ok(class)
    }
}
