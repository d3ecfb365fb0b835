//! Spellbook creation and the spell-slot ledger.
//!
//! Every change to a stored spellbook is a revision-checked write: read,
//! mutate, then save only if nobody else saved in between, retrying on a
//! lost race. A slot can therefore never be spent twice.

use serde::Serialize;
use std::sync::Arc;

use grimoire_domain::value_objects::MAX_SLOT_TIER;
use grimoire_domain::{CharacterId, SlotUse, SpellId, Spellbook, SpellbookId, SpellbookName};

use super::validation::{require_level, ValidationError};
use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError, SpellRepo, SpellbookRepo};

/// Attempts at a contended write before giving up with `Conflict`.
const MAX_WRITE_ATTEMPTS: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum SpellbookError {
    #[error("Spellbook not found: {0}")]
    NotFound(SpellbookId),
    #[error("Character not found: {0}")]
    OwnerNotFound(CharacterId),
    #[error("Unknown spell: {0}")]
    UnknownSpell(SpellId),
    #[error("Spellbook {0} is being changed by another request, try again")]
    Conflict(SpellbookId),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSpellbook {
    pub name: String,
    pub description: String,
    pub is_shared: bool,
}

/// Result of trying to spend a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotUseOutcome {
    pub consumed: bool,
    pub spellbook: Spellbook,
}

pub struct SpellbookUseCases {
    spellbooks: Arc<dyn SpellbookRepo>,
    characters: Arc<dyn CharacterRepo>,
    spells: Arc<dyn SpellRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SpellbookUseCases {
    pub fn new(
        spellbooks: Arc<dyn SpellbookRepo>,
        characters: Arc<dyn CharacterRepo>,
        spells: Arc<dyn SpellRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            spellbooks,
            characters,
            spells,
            clock,
        }
    }

    /// A new spellbook whose maxima are the owner's current slot allowance,
    /// with every slot available.
    pub async fn create(
        &self,
        owner_id: CharacterId,
        input: NewSpellbook,
    ) -> Result<Spellbook, SpellbookError> {
        let name = SpellbookName::new(input.name).map_err(ValidationError::from)?;
        let owner = self
            .characters
            .get(owner_id)
            .await?
            .ok_or(SpellbookError::OwnerNotFound(owner_id))?;

        let spellbook = Spellbook::new(owner_id, name, self.clock.now())
            .with_max_slots(&owner.max_spell_slots())
            .with_description(input.description)
            .with_shared(input.is_shared);

        self.spellbooks.save(&spellbook).await?;
        tracing::info!(
            spellbook_id = %spellbook.id(),
            owner_id = %owner_id,
            "Created spellbook"
        );
        Ok(spellbook)
    }

    pub async fn get(&self, id: SpellbookId) -> Result<Spellbook, SpellbookError> {
        self.spellbooks
            .get(id)
            .await?
            .ok_or(SpellbookError::NotFound(id))
    }

    pub async fn list_for_owner(
        &self,
        owner_id: CharacterId,
    ) -> Result<Vec<Spellbook>, SpellbookError> {
        if self.characters.get(owner_id).await?.is_none() {
            return Err(SpellbookError::OwnerNotFound(owner_id));
        }
        Ok(self.spellbooks.list_for_owner(owner_id).await?)
    }

    /// Long rest: every pool, the pact pool included, back to its maximum.
    pub async fn rest(&self, id: SpellbookId) -> Result<Spellbook, SpellbookError> {
        let now = self.clock.now();
        let (spellbook, _) = self
            .update(id, |book| {
                book.reset_all_spell_slots();
                book.touch(now);
                true
            })
            .await?;
        tracing::debug!(spellbook_id = %id, "Spell slots restored");
        Ok(spellbook)
    }

    /// Spend one slot. An empty pool is not an error: the outcome reports
    /// `consumed: false` and nothing is written.
    pub async fn use_slot(
        &self,
        id: SpellbookId,
        slot: SlotUse,
    ) -> Result<SlotUseOutcome, SpellbookError> {
        if let SlotUse::Tier(tier) = slot {
            require_level(tier, 1, MAX_SLOT_TIER, "tier")?;
        }

        let now = self.clock.now();
        let (spellbook, consumed) = self
            .update(id, |book| book.use_spell_slot(slot, now))
            .await?;
        tracing::debug!(spellbook_id = %id, ?slot, consumed, "Spell slot use");
        Ok(SlotUseOutcome {
            consumed,
            spellbook,
        })
    }

    /// Re-read the owner's slot allowance, e.g. after a level-up. Current
    /// counts are kept, clamped to the new maxima.
    pub async fn sync_max_slots(&self, id: SpellbookId) -> Result<Spellbook, SpellbookError> {
        let owner_id = self.get(id).await?.owner_id();
        let owner = self
            .characters
            .get(owner_id)
            .await?
            .ok_or(SpellbookError::OwnerNotFound(owner_id))?;
        let max_slots = owner.max_spell_slots();

        let now = self.clock.now();
        let (spellbook, _) = self
            .update(id, |book| {
                book.apply_max_slots(&max_slots);
                book.touch(now);
                true
            })
            .await?;
        tracing::info!(spellbook_id = %id, owner_id = %owner_id, "Spell slot maxima synced");
        Ok(spellbook)
    }

    /// Add a catalogue spell. Adding a spell twice is a no-op.
    pub async fn add_spell(
        &self,
        id: SpellbookId,
        spell_id: SpellId,
    ) -> Result<Spellbook, SpellbookError> {
        if self.spells.get(spell_id).await?.is_none() {
            return Err(SpellbookError::UnknownSpell(spell_id));
        }
        let now = self.clock.now();
        let (spellbook, added) = self
            .update(id, |book| book.add_spell(spell_id, now))
            .await?;
        tracing::debug!(spellbook_id = %id, spell_id = %spell_id, added, "Spell added");
        Ok(spellbook)
    }

    /// Removing a spell that is not in the book is a no-op.
    pub async fn remove_spell(
        &self,
        id: SpellbookId,
        spell_id: SpellId,
    ) -> Result<Spellbook, SpellbookError> {
        let now = self.clock.now();
        let (spellbook, removed) = self
            .update(id, |book| book.remove_spell(spell_id, now))
            .await?;
        tracing::debug!(spellbook_id = %id, spell_id = %spell_id, removed, "Spell removed");
        Ok(spellbook)
    }

    /// Apply `change` to the stored spellbook and write it back if it reports
    /// a change, retrying from a fresh read whenever another writer got in
    /// first. Returns the resulting spellbook and whether it changed.
    async fn update<F>(
        &self,
        id: SpellbookId,
        mut change: F,
    ) -> Result<(Spellbook, bool), SpellbookError>
    where
        F: FnMut(&mut Spellbook) -> bool + Send,
    {
        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let read = self
                .spellbooks
                .get_revisioned(id)
                .await?
                .ok_or(SpellbookError::NotFound(id))?;
            let mut spellbook = read.record;
            if !change(&mut spellbook) {
                return Ok((spellbook, false));
            }
            if self
                .spellbooks
                .save_if_unchanged(&spellbook, read.revision)
                .await?
            {
                return Ok((spellbook, true));
            }
            tracing::debug!(spellbook_id = %id, attempt, "Spellbook changed underneath, retrying");
        }
        tracing::warn!(spellbook_id = %id, "Gave up on a contended spellbook write");
        Err(SpellbookError::Conflict(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, SystemClock};
    use crate::infrastructure::ports::{
        MockCharacterRepo, MockSpellRepo, MockSpellbookRepo, Revisioned,
    };
    use crate::infrastructure::sqlite::test_support::temp_pool;
    use crate::infrastructure::sqlite::SqliteSpellbookRepo;
    use chrono::{TimeZone, Utc};
    use grimoire_domain::{
        Ability, Character, CharacterClass, CharacterName, ClassName, MagicType, PactSlot,
        Spell, SpellLevel, SpellName, SpellSlots,
    };
    use mockall::predicate::eq;

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("time"),
        ))
    }

    fn use_cases(spellbooks: MockSpellbookRepo, characters: MockCharacterRepo) -> SpellbookUseCases {
        with_spells(spellbooks, characters, MockSpellRepo::new())
    }

    fn with_spells(
        spellbooks: MockSpellbookRepo,
        characters: MockCharacterRepo,
        spells: MockSpellRepo,
    ) -> SpellbookUseCases {
        SpellbookUseCases::new(
            Arc::new(spellbooks),
            Arc::new(characters),
            Arc::new(spells),
            clock(),
        )
    }

    fn ranger_warlock(ranger_level: u8) -> Character {
        let ranger = CharacterClass::new(ClassName::new("Ranger").expect("name"))
            .with_magic_type(MagicType::HalfCaster)
            .with_spellcasting_ability(Ability::Wisdom);
        Character::new(CharacterName::new("Vex").expect("name"), Utc::now())
            .with_primary_class(ranger, ranger_level)
            .expect("level")
            .with_warlock_level(3)
            .expect("warlock")
            .with_spellcasting_ability(Some(Ability::Wisdom))
    }

    fn book_with(slots: [u8; 9], pact: Option<PactSlot>) -> Spellbook {
        let mut max = SpellSlots::from_tier_counts(&slots);
        if let Some(pact) = pact {
            max.set_pact(pact);
        }
        Spellbook::new(
            CharacterId::new(),
            SpellbookName::new("Field notes").expect("name"),
            Utc::now(),
        )
        .with_max_slots(&max)
    }

    /// A repo that always hands out `book` at revision 7.
    fn stored(book: Spellbook) -> MockSpellbookRepo {
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_get_revisioned().returning(move |_| {
            Ok(Some(Revisioned {
                record: book.clone(),
                revision: 7,
            }))
        });
        spellbooks
    }

    #[tokio::test]
    async fn create_seeds_maxima_from_the_owner() {
        let owner = ranger_warlock(5);
        let owner_id = owner.id();
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .with(eq(owner_id))
            .returning(move |_| Ok(Some(owner.clone())));
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_save().times(1).returning(|_| Ok(()));

        let book = use_cases(spellbooks, characters)
            .create(
                owner_id,
                NewSpellbook {
                    name: "Hunter's lore".to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect("create");

        assert_eq!(book.owner_id(), owner_id);
        assert_eq!(book.slot(1).map(|p| (p.current(), p.max())), Some((4, 4)));
        assert_eq!(book.slot(2).map(|p| (p.current(), p.max())), Some((2, 2)));
        assert_eq!(book.slot(3).map(|p| p.max()), Some(0));
        assert_eq!(book.pact().tier(), 2);
        assert_eq!((book.pact().current(), book.pact().max()), (2, 2));
    }

    #[tokio::test]
    async fn create_for_missing_owner_fails() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|_| Ok(None));
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_save().never();

        let err = use_cases(spellbooks, characters)
            .create(
                CharacterId::new(),
                NewSpellbook {
                    name: "Orphan".to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect_err("owner");

        assert!(matches!(err, SpellbookError::OwnerNotFound(_)));
    }

    #[tokio::test]
    async fn use_slot_decrements_and_saves_at_the_read_revision() {
        let book = book_with([2, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let id = book.id();
        let mut spellbooks = stored(book);
        spellbooks
            .expect_save_if_unchanged()
            .withf(|b, revision| {
                *revision == 7 && b.slot(1).map(|p| p.current()) == Some(1) && b.last_used().is_some()
            })
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(id, SlotUse::Tier(1))
            .await
            .expect("use");

        assert!(outcome.consumed);
        assert_eq!(outcome.spellbook.slot(1).map(|p| p.current()), Some(1));
    }

    #[tokio::test]
    async fn lost_race_is_retried_from_a_fresh_read() {
        let full = book_with([1, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let mut spent = full.clone();
        assert!(spent.use_spell_slot(SlotUse::Tier(1), Utc::now()));
        let id = full.id();

        let mut spellbooks = MockSpellbookRepo::new();
        let mut reads = vec![(spent, 2), (full, 1)];
        spellbooks
            .expect_get_revisioned()
            .times(2)
            .returning(move |_| {
                let (record, revision) = reads.pop().expect("read");
                Ok(Some(Revisioned { record, revision }))
            });
        // The first write loses to a concurrent one that spent the slot.
        spellbooks
            .expect_save_if_unchanged()
            .with(mockall::predicate::always(), eq(1))
            .times(1)
            .returning(|_, _| Ok(false));

        let outcome = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(id, SlotUse::Tier(1))
            .await
            .expect("use");

        assert!(!outcome.consumed);
        assert_eq!(outcome.spellbook.slot(1).map(|p| p.current()), Some(0));
    }

    #[tokio::test]
    async fn endless_contention_ends_in_conflict() {
        let book = book_with([1, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let id = book.id();
        let mut spellbooks = stored(book);
        spellbooks
            .expect_save_if_unchanged()
            .times(MAX_WRITE_ATTEMPTS)
            .returning(|_, _| Ok(false));

        let err = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(id, SlotUse::Tier(1))
            .await
            .expect_err("conflict");

        assert!(matches!(err, SpellbookError::Conflict(conflicted) if conflicted == id));
    }

    #[tokio::test]
    async fn empty_tier_is_reported_without_writing() {
        let book = book_with([1, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let id = book.id();
        let before = book.clone();
        let mut spellbooks = stored(book);
        spellbooks.expect_save_if_unchanged().never();

        let outcome = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(id, SlotUse::Tier(2))
            .await
            .expect("use");

        assert!(!outcome.consumed);
        assert_eq!(outcome.spellbook, before);
    }

    #[tokio::test]
    async fn pact_slot_is_spent_from_the_pact_pool() {
        let book = book_with([0; 9], Some(PactSlot { tier: 3, count: 2 }));
        let id = book.id();
        let mut spellbooks = stored(book);
        spellbooks
            .expect_save_if_unchanged()
            .times(1)
            .returning(|_, _| Ok(true));

        let outcome = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(id, SlotUse::Pact)
            .await
            .expect("use");

        assert!(outcome.consumed);
        assert_eq!(outcome.spellbook.pact().current(), 1);
        assert_eq!(outcome.spellbook.slot(3).map(|p| p.current()), Some(0));
    }

    #[tokio::test]
    async fn tier_outside_one_to_nine_is_rejected() {
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_get_revisioned().never();

        let err = use_cases(spellbooks, MockCharacterRepo::new())
            .use_slot(SpellbookId::new(), SlotUse::Tier(10))
            .await
            .expect_err("tier");

        assert!(matches!(err, SpellbookError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_spellbook_is_not_found() {
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_get_revisioned().returning(|_| Ok(None));

        let err = use_cases(spellbooks, MockCharacterRepo::new())
            .rest(SpellbookId::new())
            .await
            .expect_err("missing");

        assert!(matches!(err, SpellbookError::NotFound(_)));
    }

    #[tokio::test]
    async fn rest_restores_every_pool() {
        let mut book = book_with([3, 2, 0, 0, 0, 0, 0, 0, 0], Some(PactSlot { tier: 1, count: 1 }));
        let now = Utc::now();
        assert!(book.use_spell_slot(SlotUse::Tier(1), now));
        assert!(book.use_spell_slot(SlotUse::Tier(2), now));
        assert!(book.use_spell_slot(SlotUse::Pact, now));
        let id = book.id();
        let mut spellbooks = stored(book);
        spellbooks
            .expect_save_if_unchanged()
            .times(1)
            .returning(|_, _| Ok(true));

        let rested = use_cases(spellbooks, MockCharacterRepo::new())
            .rest(id)
            .await
            .expect("rest");

        assert_eq!(rested.slot(1).map(|p| p.current()), Some(3));
        assert_eq!(rested.slot(2).map(|p| p.current()), Some(2));
        assert_eq!(rested.pact().current(), 1);
    }

    #[tokio::test]
    async fn sync_raises_maxima_after_a_level_up() {
        let owner = ranger_warlock(5);
        let owner_id = owner.id();
        let levelled = ranger_warlock(9).with_id(owner_id);
        let book = Spellbook::new(
            owner_id,
            SpellbookName::new("Hunter's lore").expect("name"),
            Utc::now(),
        )
        .with_max_slots(&owner.max_spell_slots());
        let id = book.id();

        let mut spellbooks = stored(book.clone());
        spellbooks
            .expect_get()
            .returning(move |_| Ok(Some(book.clone())));
        spellbooks
            .expect_save_if_unchanged()
            .times(1)
            .returning(|_, _| Ok(true));
        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .with(eq(owner_id))
            .returning(move |_| Ok(Some(levelled.clone())));

        let synced = use_cases(spellbooks, characters)
            .sync_max_slots(id)
            .await
            .expect("sync");

        // Level 9 half caster: 4 / 3 / 2
        assert_eq!(synced.slot(1).map(|p| (p.current(), p.max())), Some((4, 4)));
        assert_eq!(synced.slot(2).map(|p| (p.current(), p.max())), Some((2, 3)));
        assert_eq!(synced.slot(3).map(|p| (p.current(), p.max())), Some((0, 2)));
        assert_eq!(synced.pact().tier(), 2);
    }

    #[tokio::test]
    async fn unknown_spell_cannot_be_added() {
        let mut spells = MockSpellRepo::new();
        spells.expect_get().returning(|_| Ok(None));
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_save_if_unchanged().never();

        let err = with_spells(spellbooks, MockCharacterRepo::new(), spells)
            .add_spell(SpellbookId::new(), SpellId::new())
            .await
            .expect_err("spell");

        assert!(matches!(err, SpellbookError::UnknownSpell(_)));
    }

    #[tokio::test]
    async fn spells_are_added_once_and_removed() {
        let spell = Spell::new(
            SpellName::new("Hunter's Mark").expect("name"),
            SpellLevel::new(1).expect("level"),
            "1 hour",
            "Mark a quarry.",
            Utc::now(),
        );
        let spell_id = spell.id;
        let mut book = book_with([2, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let id = book.id();

        let mut spells = MockSpellRepo::new();
        spells
            .expect_get()
            .returning(move |_| Ok(Some(spell.clone())));
        let mut spellbooks = stored(book.clone());
        spellbooks
            .expect_save_if_unchanged()
            .withf(move |b, _| b.spells() == [spell_id])
            .times(1)
            .returning(|_, _| Ok(true));
        let added = with_spells(spellbooks, MockCharacterRepo::new(), spells)
            .add_spell(id, spell_id)
            .await
            .expect("add");
        assert_eq!(added.total_spells(), 1);

        assert!(book.add_spell(spell_id, Utc::now()));
        let mut spellbooks = stored(book);
        spellbooks
            .expect_save_if_unchanged()
            .withf(|b, _| b.spells().is_empty())
            .times(1)
            .returning(|_, _| Ok(true));
        let removed = use_cases(spellbooks, MockCharacterRepo::new())
            .remove_spell(id, spell_id)
            .await
            .expect("remove");
        assert_eq!(removed.total_spells(), 0);
    }

    #[tokio::test]
    async fn list_for_unknown_owner_is_not_found() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|_| Ok(None));
        let mut spellbooks = MockSpellbookRepo::new();
        spellbooks.expect_list_for_owner().never();

        let err = use_cases(spellbooks, characters)
            .list_for_owner(CharacterId::new())
            .await
            .expect_err("owner");

        assert!(matches!(err, SpellbookError::OwnerNotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_uses_never_spend_a_slot_twice() {
        let (_dir, pool) = temp_pool().await;
        let repo = Arc::new(SqliteSpellbookRepo::new(pool));
        let book = book_with([1, 0, 0, 0, 0, 0, 0, 0, 0], None);
        let id = book.id();
        repo.save(&book).await.expect("save");
        let use_cases = Arc::new(SpellbookUseCases::new(
            repo.clone(),
            Arc::new(MockCharacterRepo::new()),
            Arc::new(MockSpellRepo::new()),
            Arc::new(SystemClock::new()),
        ));

        for _ in 0..10 {
            let tasks: Vec<_> = (0..8)
                .map(|_| {
                    let use_cases = use_cases.clone();
                    tokio::spawn(async move { use_cases.use_slot(id, SlotUse::Tier(1)).await })
                })
                .collect();

            let mut consumed = 0;
            for task in tasks {
                if task.await.expect("join").expect("use").consumed {
                    consumed += 1;
                }
            }
            assert_eq!(consumed, 1);

            let stored = repo.get(id).await.expect("get").expect("found");
            assert_eq!(stored.slot(1).map(|p| p.current()), Some(0));
            use_cases.rest(id).await.expect("rest");
        }
    }
}
