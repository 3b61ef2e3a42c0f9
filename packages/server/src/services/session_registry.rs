use log::info;
use std::collections::HashMap;

use crate::models::{error::GameError, game::Game};

/// Active games keyed by channel id; at most one per channel.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    games: HashMap<String, Game>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the registry from persisted games. Later duplicates of a channel are dropped.
    pub fn from_games(games: Vec<Game>) -> Self {
        let mut registry = Self::new();
        for game in games {
            registry
                .games
                .entry(game.channel_id.clone())
                .or_insert(game);
        }
        registry
    }

    pub fn create(&mut self, channel_id: &str, host_id: &str) -> Result<&mut Game, GameError> {
        if self.games.contains_key(channel_id) {
            return Err(GameError::AlreadyExists);
        }
        info!("Creating game in {} hosted by {}", channel_id, host_id);
        let game = Game::new(channel_id.to_string(), host_id.to_string());
        Ok(self.games.entry(channel_id.to_string()).or_insert(game))
    }

    pub fn find(&self, channel_id: &str) -> Option<&Game> {
        self.games.get(channel_id)
    }

    pub fn find_mut(&mut self, channel_id: &str) -> Option<&mut Game> {
        self.games.get_mut(channel_id)
    }

    /// Removes the game in `channel_id`, if any.
    pub fn destroy(&mut self, channel_id: &str) -> Option<Game> {
        let removed = self.games.remove(channel_id);
        if removed.is_some() {
            info!("Destroyed game in {}", channel_id);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Games ordered by channel id.
    pub fn snapshot(&self) -> Vec<Game> {
        let mut games: Vec<Game> = self.games.values().cloned().collect();
        games.sort_by(|a, b| a.channel_id.cmp(&b.channel_id));
        games
    }
}
