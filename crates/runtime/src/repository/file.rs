//! File-based CharacterStore.

use std::fs;
use std::path::{Path, PathBuf};

use shards_core::CharacterSnapshot;

use super::{CharacterStore, RepositoryError, Result};

/// Stores each character as `character_{id}.json` under one directory.
///
/// Writes go to a temp file and are renamed into place.
pub struct FileCharacterStore {
    base_dir: PathBuf,
}

impl FileCharacterStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn character_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(RepositoryError::InvalidId(id.to_string()));
        }
        Ok(self.base_dir.join(format!("character_{id}.json")))
    }
}

impl CharacterStore for FileCharacterStore {
    fn save(&self, id: &str, character: &CharacterSnapshot) -> Result<()> {
        let path = self.character_path(id)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(character)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(id, path = %path.display(), "saved character");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CharacterSnapshot>> {
        let path = self.character_path(id)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn exists(&self, id: &str) -> bool {
        self.character_path(id).is_ok_and(|path| path.exists())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.character_path(id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(id, "deleted character");
        }
        Ok(())
    }

    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(id) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_prefix("character_"))
                .and_then(|name| name.strip_suffix(".json"))
            {
                ids.push(id.to_string());
            }
        }

        ids.sort_unstable();
        Ok(ids)
    }
}
