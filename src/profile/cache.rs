use tracing::{error, warn};

use super::{store::KeyValueStore, ProfileData, PROFILE_CACHE_KEY};

/// The local copy of the profile, stored as JSON under [`PROFILE_CACHE_KEY`].
///
/// Neither operation surfaces an error: a value that cannot be written is
/// logged and dropped, a value that cannot be read is "no profile".
/// There is no schema version, so a record written by an older layout that
/// no longer parses also reads back as "no profile".
pub struct ProfileCache<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProfileCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&self, profile: &ProfileData) {
        let value = match serde_json::to_string(profile) {
            Ok(val) => val,
            Err(err) => {
                error!("serialize profile for cache: {}", err);
                return;
            }
        };
        if let Err(err) = self.store.set(PROFILE_CACHE_KEY, &value) {
            error!("write profile cache: {}", err);
        }
    }

    pub fn load(&self) -> Option<ProfileData> {
        let value = match self.store.get(PROFILE_CACHE_KEY) {
            Ok(val) => val?,
            Err(err) => {
                warn!("read profile cache: {}", err);
                return None;
            }
        };
        match serde_json::from_str::<ProfileData>(&value) {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("parse profile cache: {}", err);
                None
            }
        }
    }
}
