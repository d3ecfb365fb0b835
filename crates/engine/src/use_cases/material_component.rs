//! Material component catalogue operations.

use std::sync::Arc;

use grimoire_domain::{ComponentName, GoldCost, MaterialComponent, MaterialComponentId};

use super::validation::ValidationError;
use crate::infrastructure::ports::{MaterialComponentRepo, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum MaterialComponentError {
    #[error("Material component not found: {0}")]
    NotFound(MaterialComponentId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

/// Every field of a component, as submitted for create or full replace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialComponentInput {
    pub name: String,
    pub description: Option<String>,
    /// Gold pieces
    pub cost: Option<f64>,
    pub is_consumable: bool,
    pub is_focus: bool,
}

impl MaterialComponentInput {
    fn into_component(self, id: MaterialComponentId) -> Result<MaterialComponent, ValidationError> {
        Ok(MaterialComponent {
            id,
            name: ComponentName::new(self.name)?,
            description: self.description,
            cost: self.cost.map(GoldCost::from_gp).transpose()?,
            is_consumable: self.is_consumable,
            is_focus: self.is_focus,
        })
    }
}

/// Partial update. The outer `Option` means "leave unchanged"; an inner `None`
/// clears a nullable field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialComponentPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub cost: Option<Option<f64>>,
    pub is_consumable: Option<bool>,
    pub is_focus: Option<bool>,
}

impl MaterialComponentPatch {
    fn apply_to(self, component: &mut MaterialComponent) -> Result<(), ValidationError> {
        // Validate everything before touching the component.
        let name = self.name.map(ComponentName::new).transpose()?;
        let cost = match self.cost {
            Some(cost) => Some(cost.map(GoldCost::from_gp).transpose()?),
            None => None,
        };

        if let Some(name) = name {
            component.name = name;
        }
        if let Some(description) = self.description {
            component.description = description;
        }
        if let Some(cost) = cost {
            component.cost = cost;
        }
        if let Some(is_consumable) = self.is_consumable {
            component.is_consumable = is_consumable;
        }
        if let Some(is_focus) = self.is_focus {
            component.is_focus = is_focus;
        }
        Ok(())
    }
}

pub struct MaterialComponentUseCases {
    repo: Arc<dyn MaterialComponentRepo>,
}

impl MaterialComponentUseCases {
    pub fn new(repo: Arc<dyn MaterialComponentRepo>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<MaterialComponent>, MaterialComponentError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(
        &self,
        id: MaterialComponentId,
    ) -> Result<MaterialComponent, MaterialComponentError> {
        self.repo
            .get(id)
            .await?
            .ok_or(MaterialComponentError::NotFound(id))
    }

    pub async fn create(
        &self,
        input: MaterialComponentInput,
    ) -> Result<MaterialComponent, MaterialComponentError> {
        let component = input.into_component(MaterialComponentId::new())?;
        self.repo.save(&component).await?;
        tracing::info!(component_id = %component.id, name = %component.name, "Created material component");
        Ok(component)
    }

    /// Full update: every field is overwritten, absent optionals are cleared.
    pub async fn replace(
        &self,
        id: MaterialComponentId,
        input: MaterialComponentInput,
    ) -> Result<MaterialComponent, MaterialComponentError> {
        self.get(id).await?;
        let component = input.into_component(id)?;
        self.repo.save(&component).await?;
        tracing::debug!(component_id = %id, "Replaced material component");
        Ok(component)
    }

    pub async fn patch(
        &self,
        id: MaterialComponentId,
        patch: MaterialComponentPatch,
    ) -> Result<MaterialComponent, MaterialComponentError> {
        let mut component = self.get(id).await?;
        patch.apply_to(&mut component)?;
        self.repo.save(&component).await?;
        tracing::debug!(component_id = %id, "Patched material component");
        Ok(component)
    }

    pub async fn delete(&self, id: MaterialComponentId) -> Result<(), MaterialComponentError> {
        if !self.repo.delete(id).await? {
            return Err(MaterialComponentError::NotFound(id));
        }
        tracing::info!(component_id = %id, "Deleted material component");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockMaterialComponentRepo;
    use mockall::predicate::eq;

    fn guano() -> MaterialComponent {
        MaterialComponent::new(ComponentName::new("Bat guano").expect("name"))
            .with_description("A pinch of bat guano and sulfur")
    }

    #[tokio::test]
    async fn create_saves_a_valid_component() {
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_save()
            .withf(|c| c.name.as_str() == "Pearl" && c.cost.map(|c| c.cents()) == Some(10_000))
            .times(1)
            .returning(|_| Ok(()));

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let created = use_cases
            .create(MaterialComponentInput {
                name: "Pearl".to_string(),
                cost: Some(100.0),
                ..Default::default()
            })
            .await
            .expect("create");

        assert_eq!(created.name.as_str(), "Pearl");
    }

    #[tokio::test]
    async fn create_rejects_an_overlong_name_without_saving() {
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_save().never();

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let err = use_cases
            .create(MaterialComponentInput {
                name: "x".repeat(50),
                ..Default::default()
            })
            .await
            .expect_err("too long");

        assert!(matches!(err, MaterialComponentError::Validation(_)));
        assert_eq!(err.to_string(), "Component name cannot exceed 49 characters");
    }

    #[tokio::test]
    async fn create_rejects_a_negative_cost() {
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_save().never();

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let err = use_cases
            .create(MaterialComponentInput {
                name: "Ruby".to_string(),
                cost: Some(-1.0),
                ..Default::default()
            })
            .await
            .expect_err("negative");

        assert_eq!(err.to_string(), "Cost cannot be negative");
    }

    #[tokio::test]
    async fn get_missing_component_is_not_found() {
        let id = MaterialComponentId::new();
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_get().with(eq(id)).returning(|_| Ok(None));

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let err = use_cases.get(id).await.expect_err("missing");

        assert!(matches!(err, MaterialComponentError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn replace_clears_fields_left_out() {
        let existing = guano().with_cost(GoldCost::from_gp(1.0).expect("cost"));
        let id = existing.id;
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_save()
            .withf(|c| c.description.is_none() && c.cost.is_none() && c.is_focus)
            .times(1)
            .returning(|_| Ok(()));

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let replaced = use_cases
            .replace(
                id,
                MaterialComponentInput {
                    name: "Bat guano".to_string(),
                    is_focus: true,
                    ..Default::default()
                },
            )
            .await
            .expect("replace");

        assert_eq!(replaced.id, id);
    }

    #[tokio::test]
    async fn patch_changes_only_supplied_fields() {
        let existing = guano();
        let id = existing.id;
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_get()
            .with(eq(id))
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_save().times(1).returning(|_| Ok(()));

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let patched = use_cases
            .patch(
                id,
                MaterialComponentPatch {
                    cost: Some(Some(0.5)),
                    is_consumable: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("patch");

        assert_eq!(patched.name.as_str(), "Bat guano");
        assert_eq!(
            patched.description.as_deref(),
            Some("A pinch of bat guano and sulfur")
        );
        assert_eq!(patched.cost.map(|c| c.cents()), Some(50));
        assert!(patched.is_consumable);
    }

    #[tokio::test]
    async fn invalid_patch_leaves_storage_untouched() {
        let existing = guano();
        let id = existing.id;
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_get()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_save().never();

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let err = use_cases
            .patch(
                id,
                MaterialComponentPatch {
                    name: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect_err("blank name");

        assert!(matches!(err, MaterialComponentError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_missing_component_is_not_found() {
        let mut repo = MockMaterialComponentRepo::new();
        repo.expect_delete().returning(|_| Ok(false));

        let use_cases = MaterialComponentUseCases::new(Arc::new(repo));
        let err = use_cases
            .delete(MaterialComponentId::new())
            .await
            .expect_err("missing");

        assert!(matches!(err, MaterialComponentError::NotFound(_)));
    }
}
