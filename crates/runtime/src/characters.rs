//! Character upkeep routed through the store.

use shards_content::{CharacterSpec, RestKind, Restored, create_character, equip, rest};
use shards_core::{CharacterSnapshot, RngOracle};

use crate::api::{Result, RuntimeError};
use crate::repository::CharacterStore;

/// Creates a character and stores it under `id`.
///
/// Fails if `id` is in use or another stored character has the same name.
pub fn register_character(
    store: &dyn CharacterStore,
    id: &str,
    spec: CharacterSpec,
    rng: &mut dyn RngOracle,
) -> Result<CharacterSnapshot> {
    if store.exists(id) {
        return Err(RuntimeError::CharacterExists(id.to_string()));
    }

    let taken = store.name_taken(&spec.name)?;
    let character = create_character(spec, |_| taken, rng)?;
    store.save(id, &character)?;

    tracing::info!(id, name = %character.name, class = %character.class, "character registered");
    Ok(character)
}

pub fn rest_character(store: &dyn CharacterStore, id: &str, kind: RestKind) -> Result<Restored> {
    let mut character = load(store, id)?;
    let restored = rest(&mut character, kind);
    store.save(id, &character)?;
    Ok(restored)
}

/// Toggles an item and saves the result. Returns false if nothing changed.
pub fn equip_item(store: &dyn CharacterStore, id: &str, item: &str) -> Result<bool> {
    let mut character = load(store, id)?;
    if !equip(&mut character, item) {
        return Ok(false);
    }
    store.save(id, &character)?;
    Ok(true)
}

fn load(store: &dyn CharacterStore, id: &str) -> Result<CharacterSnapshot> {
    store
        .load(id)?
        .ok_or_else(|| RuntimeError::CharacterNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use shards_content::CreationError;
    use shards_core::{ClassKind, PrimaryStats, Race, ScriptedRng};

    fn spec(name: &str) -> CharacterSpec {
        CharacterSpec::new(name, Race::Dwarf, ClassKind::Paladin).with_stats(PrimaryStats::uniform(12))
    }

    #[test]
    fn names_and_ids_are_unique() {
        let store = InMemoryStore::new();
        let mut rng = ScriptedRng::constant(0.0);

        register_character(&store, "a", spec("Brom"), &mut rng).unwrap();

        let same_id = register_character(&store, "a", spec("Other"), &mut rng);
        assert!(matches!(same_id, Err(RuntimeError::CharacterExists(_))));

        let same_name = register_character(&store, "b", spec("Brom"), &mut rng);
        assert!(matches!(
            same_name,
            Err(RuntimeError::Creation(CreationError::NameTaken(_)))
        ));
        assert_eq!(store.list_ids().unwrap(), vec!["a"]);
    }

    #[test]
    fn rest_and_equip_persist() {
        let store = InMemoryStore::new();
        let hero =
            register_character(&store, "a", spec("Brom"), &mut ScriptedRng::constant(0.0)).unwrap();

        let mut wounded = hero.clone();
        wounded.health = 1;
        store.save("a", &wounded).unwrap();

        let restored = rest_character(&store, "a", RestKind::Full).unwrap();
        assert_eq!(restored.health, hero.max_health - 1);
        assert_eq!(store.load("a").unwrap().unwrap().health, hero.max_health);

        let weapon = hero.inventory[0].name.clone();
        assert!(equip_item(&store, "a", &weapon).unwrap());
        assert!(store.load("a").unwrap().unwrap().inventory[0].equipped);
        assert!(!equip_item(&store, "a", "Nothing").unwrap());

        assert!(matches!(
            rest_character(&store, "ghost", RestKind::Partial),
            Err(RuntimeError::CharacterNotFound(_))
        ));
    }
}
