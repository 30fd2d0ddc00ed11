//! In-memory CharacterStore for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use shards_core::CharacterSnapshot;

use super::{CharacterStore, RepositoryError, Result};

#[derive(Default)]
pub struct InMemoryStore {
    characters: RwLock<HashMap<String, CharacterSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one character.
    pub fn with_character(id: impl Into<String>, character: CharacterSnapshot) -> Self {
        let mut characters = HashMap::new();
        characters.insert(id.into(), character);
        Self {
            characters: RwLock::new(characters),
        }
    }
}

impl CharacterStore for InMemoryStore {
    fn save(&self, id: &str, character: &CharacterSnapshot) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.insert(id.to_string(), character.clone());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CharacterSnapshot>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.get(id).cloned())
    }

    fn exists(&self, id: &str) -> bool {
        self.characters
            .read()
            .map(|characters| characters.contains_key(id))
            .unwrap_or(false)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        characters.remove(id);
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let mut ids: Vec<String> = characters.keys().cloned().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn name_taken(&self, name: &str) -> Result<bool> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(characters.values().any(|c| c.name == name))
    }
}
