
//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    ports::{
        CharacterRepo, ClassRepo, ClockPort, MaterialComponentRepo, SpellRepo, SpellbookRepo,
    },
    sqlite::SqliteRepositories,
};
use crate::use_cases;

/// Main application state.
///
/// Holds all repositories and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repositories, injected as port traits.
pub struct Repositories {
    pub material_component: Arc<dyn MaterialComponentRepo>,
    pub class: Arc<dyn ClassRepo>,
    pub character: Arc<dyn CharacterRepo>,
    pub spell: Arc<dyn SpellRepo>,
    pub spellbook: Arc<dyn SpellbookRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub material_component: use_cases::MaterialComponentUseCases,
    pub class: use_cases::ClassUseCases,
    pub character: use_cases::CharacterUseCases,
    pub spell: use_cases::SpellUseCases,
    pub spellbook: use_cases::SpellbookUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repos: SqliteRepositories, clock: Arc<dyn ClockPort>) -> Self {
        let material_component_repo: Arc<dyn MaterialComponentRepo> =
            repos.material_component.clone();
        let class_repo: Arc<dyn ClassRepo> = repos.class.clone();
        let character_repo: Arc<dyn CharacterRepo> = repos.character.clone();
        let spell_repo: Arc<dyn SpellRepo> = repos.spell.clone();
        let spellbook_repo: Arc<dyn SpellbookRepo> = repos.spellbook.clone();

        let use_cases = UseCases {
            material_component: use_cases::MaterialComponentUseCases::new(
                material_component_repo.clone(),
            ),
            class: use_cases::ClassUseCases::new(class_repo.clone()),
            character: use_cases::CharacterUseCases::new(
                character_repo.clone(),
                class_repo.clone(),
                clock.clone(),
            ),
            spell: use_cases::SpellUseCases::new(
                spell_repo.clone(),
                material_component_repo.clone(),
                class_repo.clone(),
                clock.clone(),
            ),
            spellbook: use_cases::SpellbookUseCases::new(
                spellbook_repo.clone(),
                character_repo.clone(),
                spell_repo.clone(),
                clock,
            ),
        };

        let repositories = Repositories {
            material_component: material_component_repo,
            class: class_repo,
            character: character_repo,
            spell: spell_repo,
            spellbook: spellbook_repo,
        };

        Self {
            repositories,
            use_cases,
        }
    }
}
