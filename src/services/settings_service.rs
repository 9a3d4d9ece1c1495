use crate::domain::settings::{ConsoleSettings, SETTINGS_KEY};
use crate::storage::{KeyValueStore, StorageError};
use std::sync::Arc;

/// Loads and saves the user-editable settings blob.
#[derive(Clone, Debug)]
pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored settings, or defaults when absent or unreadable.
    #[must_use]
    pub fn load(&self) -> ConsoleSettings {
        let Some(raw) = self.store.get(SETTINGS_KEY) else {
            return ConsoleSettings::default();
        };
        match serde_json::from_str::<ConsoleSettings>(&raw) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored console settings are unreadable, using defaults");
                ConsoleSettings::default()
            }
        }
    }

    /// # Errors
    /// Returns an error if the blob cannot be persisted.
    pub fn save(&self, settings: &ConsoleSettings) -> Result<(), StorageError> {
        let raw = serde_json::to_string(settings)?;
        self.store.set(SETTINGS_KEY, &raw)?;
        tracing::info!("Console settings saved");
        Ok(())
    }

    /// # Errors
    /// Returns an error if the blob cannot be persisted.
    pub fn reset_prompt(&self) -> Result<ConsoleSettings, StorageError> {
        let mut settings = self.load();
        settings.reset_prompt();
        self.save(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settings::DEFAULT_PROMPT;
    use crate::storage::MemoryStore;

    #[test]
    fn test_round_trip_through_store() {
        let service = SettingsService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.load(), ConsoleSettings::default());

        let settings = ConsoleSettings { api_url: "http://api:8000".into(), prompt: "custom".into(), ..ConsoleSettings::default() };
        service.save(&settings).unwrap();
        assert_eq!(service.load(), settings);

        let reset = service.reset_prompt().unwrap();
        assert_eq!(reset.prompt, DEFAULT_PROMPT);
        assert_eq!(service.load().api_url, "http://api:8000");
    }

    #[test]
    fn test_unreadable_blob_falls_back() {
        let store = Arc::new(MemoryStore::new());
        store.set(SETTINGS_KEY, "not json").unwrap();
        let service = SettingsService::new(store);
        assert_eq!(service.load(), ConsoleSettings::default());
    }
}
