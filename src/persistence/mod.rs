//! Profile persistence
//!
//! The store is an injected capability: the session talks to a
//! `ProfileStore`, never to LocalStorage directly, so tests substitute a
//! double and a broken store degrades to defaults instead of crashing.

use crate::profile::Profile;

/// Where the player profile lives between runs
pub trait ProfileStore {
    /// `None` when nothing is stored or the blob fails to parse
    fn load(&self) -> Option<Profile>;
    /// Best effort; `false` means the profile was not written
    fn save(&self, profile: &Profile) -> bool;
}

/// LocalStorage-backed store (browser builds)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "berry-ninja-save";

    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_arch = "wasm32")]
impl ProfileStore for LocalStorageStore {
    fn load(&self) -> Option<Profile> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(Self::STORAGE_KEY).ok()??;
        match serde_json::from_str(&json) {
            Ok(profile) => {
                log::info!("Loaded profile from LocalStorage");
                Some(profile)
            }
            Err(err) => {
                log::warn!("Discarding corrupt save: {err}");
                None
            }
        }
    }

    fn save(&self, profile: &Profile) -> bool {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            return false;
        };
        let Ok(json) = serde_json::to_string(profile) else {
            return false;
        };
        storage.set_item(Self::STORAGE_KEY, &json).is_ok()
    }
}

/// In-memory store for tests and the native demo
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: std::cell::RefCell<Option<Profile>>,
    saves: std::cell::Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: Profile) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(profile);
        store
    }

    /// The profile last written through `save`, if any
    pub fn saved(&self) -> Option<Profile> {
        self.slot.borrow().clone()
    }

    /// How many times `save` was called
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Option<Profile> {
        self.slot.borrow().clone()
    }

    fn save(&self, profile: &Profile) -> bool {
        self.saves.set(self.saves.get() + 1);
        *self.slot.borrow_mut() = Some(profile.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.load().is_none());

        let mut profile = Profile::default();
        profile.record_score(77);
        assert!(store.save(&profile));
        assert_eq!(store.load(), Some(profile));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_with_profile_preloads() {
        let mut profile = Profile::default();
        profile.record_score(5);
        let store = MemoryStore::with_profile(profile.clone());
        assert_eq!(store.load(), Some(profile));
        assert_eq!(store.save_count(), 0);
    }
}
