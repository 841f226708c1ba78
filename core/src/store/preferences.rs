use super::{DocumentStore, KeyValueStore, PREFERENCES};
use crate::error::StoreResult;
use crate::model::{PreferencesUpdate, UserPreferences};

const PREFERENCES_KEY: &str = "user";

impl<S: KeyValueStore> DocumentStore<S> {
    /// Stored preferences, or the defaults when none were saved
    pub fn get_preferences(&self) -> StoreResult<UserPreferences> {
        Ok(self
            .get_record(PREFERENCES, PREFERENCES_KEY)?
            .unwrap_or_default())
    }

    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> StoreResult<UserPreferences> {
        let updated = self.get_preferences()?.merged(update);
        self.put_record(PREFERENCES, PREFERENCES_KEY, &updated)?;
        Ok(updated)
    }

    pub fn reset_preferences(&mut self) -> StoreResult<UserPreferences> {
        let defaults = UserPreferences::default();
        self.put_record(PREFERENCES, PREFERENCES_KEY, &defaults)?;
        Ok(defaults)
    }

    /// Write the defaults if nothing is stored yet. Returns whether they were written.
    pub fn initialize_preferences(&mut self) -> StoreResult<bool> {
        if self.store.get(PREFERENCES, PREFERENCES_KEY)?.is_some() {
            return Ok(false);
        }
        self.reset_preferences()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{PreferencesUpdate, Theme, UserPreferences};
    use crate::store::{DocumentStore, MemoryStore};

    #[test]
    fn test_preferences_lifecycle() {
        let mut store = DocumentStore::new(MemoryStore::new());
        assert_eq!(store.get_preferences().unwrap(), UserPreferences::default());

        assert!(store.initialize_preferences().unwrap());
        assert!(!store.initialize_preferences().unwrap());

        let updated = store
            .update_preferences(PreferencesUpdate {
                theme: Some(Theme::Dark),
                auto_save_interval: Some(5_000),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.theme, Theme::Dark);
        assert_eq!(store.get_preferences().unwrap().auto_save_interval, 5_000);

        store.reset_preferences().unwrap();
        assert_eq!(store.get_preferences().unwrap(), UserPreferences::default());
    }
}
