use serde::{Deserialize, Serialize};

use super::{error::GameError, player::Player};

/// Players of one game, in join order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        if self.contains(player_id) {
            return Err(GameError::AlreadyJoined);
        }
        self.players
            .push(Player::new(player_id.to_string(), name.to_string()));
        Ok(())
    }

    pub fn leave(&mut self, player_id: &str) -> Result<Player, GameError> {
        let index = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(GameError::NotJoined)?;
        Ok(self.players.remove(index))
    }

    pub fn confirm(&mut self, player_id: &str) -> Result<(), GameError> {
        let player = self.get_mut(player_id).ok_or(GameError::NotJoined)?;
        player.confirmed = true;
        Ok(())
    }

    /// Marks the player dead. Returns false if they were not on the roster.
    pub fn kill(&mut self, player_id: &str) -> bool {
        match self.get_mut(player_id) {
            Some(player) => {
                player.alive = false;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn get_mut(&mut self, player_id: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Looks a player up by mention (`<@id>` or `<@!id>`), raw id, or
    /// case-insensitive display name.
    pub fn find_by_reference(&self, reference: &str) -> Option<&Player> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let id = reference
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|id| id.trim_start_matches('!'))
            .unwrap_or(reference);
        self.get(id).or_else(|| {
            self.players
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(reference))
        })
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.get(player_id).is_some()
    }

    pub fn is_alive(&self, player_id: &str) -> bool {
        self.get(player_id).map(|p| p.alive).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn count_alive(&self) -> usize {
        self.players.iter().filter(|p| p.alive).count()
    }

    pub fn all_confirmed(&self) -> bool {
        self.players.iter().all(|p| p.confirmed)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn alive(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }

    pub fn unconfirmed(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(ids: &[&str]) -> Roster {
        let mut roster = Roster::new();
        for id in ids {
            roster.join(id, &format!("Player{}", id)).unwrap();
        }
        roster
    }

    #[test]
    fn join_twice_is_rejected_and_roster_unchanged() {
        let mut roster = roster_of(&["1", "2"]);
        assert_eq!(roster.join("1", "Again"), Err(GameError::AlreadyJoined));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("1").unwrap().name, "Player1");
    }

    #[test]
    fn leave_keeps_join_order_of_the_rest() {
        let mut roster = roster_of(&["1", "2", "3"]);
        let left = roster.leave("2").unwrap();
        assert_eq!(left.id, "2");
        let ids: Vec<_> = roster.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(roster.leave("2"), Err(GameError::NotJoined));
    }

    #[test]
    fn confirm_tracks_outstanding_players() {
        let mut roster = roster_of(&["1", "2"]);
        assert!(!roster.all_confirmed());
        roster.confirm("1").unwrap();
        assert_eq!(roster.unconfirmed().count(), 1);
        roster.confirm("2").unwrap();
        assert!(roster.all_confirmed());
        assert_eq!(roster.confirm("9"), Err(GameError::NotJoined));
    }

    #[test]
    fn references_resolve_by_mention_id_or_name() {
        let roster = roster_of(&["1", "2"]);
        assert_eq!(roster.find_by_reference("<@2>").unwrap().id, "2");
        assert_eq!(roster.find_by_reference("<@!2>").unwrap().id, "2");
        assert_eq!(roster.find_by_reference("1").unwrap().id, "1");
        assert_eq!(roster.find_by_reference("player2").unwrap().id, "2");
        assert!(roster.find_by_reference("").is_none());
        assert!(roster.find_by_reference("nobody").is_none());
    }

    #[test]
    fn kill_only_flips_alive() {
        let mut roster = roster_of(&["1", "2", "3"]);
        assert!(roster.kill("2"));
        assert!(!roster.is_alive("2"));
        assert!(roster.contains("2"));
        assert_eq!(roster.count_alive(), 2);
        assert_eq!(roster.len(), 3);
        assert!(!roster.kill("9"));
    }
}
