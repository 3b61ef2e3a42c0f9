use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::persisted::PersistedData;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("state store is unavailable")]
    Unavailable,
}

pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedData>, StoreError>;
    fn save(&self, data: &PersistedData) -> Result<(), StoreError>;
}

/// Keeps the whole bot state in one JSON file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<PersistedData>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, data: &PersistedData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(data)?;
        // the old file stays intact until the rename
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    data: Mutex<Option<PersistedData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: PersistedData) -> Self {
        Self {
            data: Mutex::new(Some(data)),
        }
    }

    pub fn snapshot(&self) -> Option<PersistedData> {
        self.data.lock().ok().and_then(|data| data.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<PersistedData>, StoreError> {
        let data = self.data.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(data.clone())
    }

    fn save(&self, data: &PersistedData) -> Result<(), StoreError> {
        let mut stored = self.data.lock().map_err(|_| StoreError::Unavailable)?;
        *stored = Some(data.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{game::Game, message::OutboundMessage, persisted::PmChannel};

    fn sample() -> PersistedData {
        let mut game = Game::new("chan".to_string(), "host".to_string());
        game.join("1", "one").unwrap();
        PersistedData {
            channels_activated: vec!["chan".to_string()],
            pm_channels: vec![PmChannel {
                player_id: "1".to_string(),
                channel_id: "dm-1".to_string(),
            }],
            games: vec![game],
            sync_messages: vec![OutboundMessage::new("chan", "hello")],
        }
    }

    #[test]
    fn file_store_round_trips_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("mafia.json"));
        assert!(store.load().unwrap().is_none());

        let data = sample();
        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), Some(data));
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mafia.json");
        fs::write(&path, r#"{"channels_activated": ["chan"]}"#).unwrap();

        let data = JsonFileStore::new(path).load().unwrap().unwrap();
        assert_eq!(data.channels_activated, vec!["chan"]);
        assert!(data.games.is_empty());
        assert!(data.sync_messages.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mafia.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileStore::new(path).load(),
            Err(StoreError::Serialization(_))
        ));
    }
}
