//! Repository port traits for database access.

use async_trait::async_trait;
use grimoire_domain::{
    Character, CharacterClass, CharacterClassId, CharacterId, MaterialComponent,
    MaterialComponentId, Spell, SpellId, Spellbook, SpellbookId,
};

use super::error::RepoError;

/// A stored record and the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Revisioned<T> {
    pub record: T,
    pub revision: i64,
}

// =============================================================================
// Catalogue
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaterialComponentRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<MaterialComponent>, RepoError>;
    async fn get(&self, id: MaterialComponentId) -> Result<Option<MaterialComponent>, RepoError>;
    /// Insert or replace.
    async fn save(&self, component: &MaterialComponent) -> Result<(), RepoError>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: MaterialComponentId) -> Result<bool, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<CharacterClass>, RepoError>;
    async fn get(&self, id: CharacterClassId) -> Result<Option<CharacterClass>, RepoError>;
    /// Insert or replace. Fails with `ConstraintViolation` on a duplicate name.
    async fn save(&self, class: &CharacterClass) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpellRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<Spell>, RepoError>;
    async fn get(&self, id: SpellId) -> Result<Option<Spell>, RepoError>;
    /// Insert or replace. Fails with `ConstraintViolation` on a duplicate name.
    async fn save(&self, spell: &Spell) -> Result<(), RepoError>;
}

// =============================================================================
// Characters and spellbooks
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn list_active(&self) -> Result<Vec<Character>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpellbookRepo: Send + Sync {
    async fn get(&self, id: SpellbookId) -> Result<Option<Spellbook>, RepoError>;
    /// Insert or replace unconditionally.
    async fn save(&self, spellbook: &Spellbook) -> Result<(), RepoError>;
    /// Read a spellbook together with its stored revision.
    async fn get_revisioned(&self, id: SpellbookId)
        -> Result<Option<Revisioned<Spellbook>>, RepoError>;
    /// Write only if the stored revision is still `revision`. Returns `false`
    /// when another writer got there first.
    async fn save_if_unchanged(
        &self,
        spellbook: &Spellbook,
        revision: i64,
    ) -> Result<bool, RepoError>;
    async fn list_for_owner(&self, owner_id: CharacterId) -> Result<Vec<Spellbook>, RepoError>;
}
