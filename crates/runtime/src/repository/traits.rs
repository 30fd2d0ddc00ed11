use shards_core::CharacterSnapshot;

use super::Result;

/// Keyed storage for character records.
pub trait CharacterStore: Send + Sync {
    /// Insert or replace the record for `id`.
    fn save(&self, id: &str, character: &CharacterSnapshot) -> Result<()>;

    fn load(&self, id: &str) -> Result<Option<CharacterSnapshot>>;

    fn exists(&self, id: &str) -> bool;

    fn delete(&self, id: &str) -> Result<()>;

    /// All stored ids, sorted.
    fn list_ids(&self) -> Result<Vec<String>>;

    /// True if any stored character already uses `name`.
    fn name_taken(&self, name: &str) -> Result<bool> {
        for id in self.list_ids()? {
            if self.load(&id)?.is_some_and(|c| c.name == name) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
