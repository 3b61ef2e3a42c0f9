use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::GameError;

/// Smallest vote count strictly greater than half of `population`.
///
/// Equivalent to `ceil(population / 2 + 0.1)`: four voters need three votes, not two.
pub fn majority_threshold(population: usize) -> usize {
    population / 2 + 1
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Player(String),
    NoLynch,
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTarget::Player(id) => write!(f, "<@{}>", id),
            VoteTarget::NoLynch => write!(f, "No Lynch"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Vote {
    pub voter_id: String,
    pub target: VoteTarget,
    pub time: DateTime<Utc>,
}

/// Votes cast for one target, in the order they appear in the tally.
#[derive(Debug, PartialEq)]
pub struct VoteGroup<'a> {
    pub target: &'a VoteTarget,
    pub votes: Vec<&'a Vote>,
}

/// Lynch votes for the current day plus the standing votes to end the game.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct VoteTally {
    votes: Vec<Vote>,
    end_game_votes: Vec<String>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `voter_id`'s vote, replacing any earlier one. Returns the replaced vote.
    pub fn upsert(
        &mut self,
        voter_id: &str,
        target: VoteTarget,
        time: DateTime<Utc>,
    ) -> Option<Vote> {
        let previous = self.remove(voter_id);
        self.votes.push(Vote {
            voter_id: voter_id.to_string(),
            target,
            time,
        });
        previous
    }

    pub fn remove(&mut self, voter_id: &str) -> Option<Vote> {
        let index = self.votes.iter().position(|v| v.voter_id == voter_id)?;
        Some(self.votes.remove(index))
    }

    pub fn get(&self, voter_id: &str) -> Option<&Vote> {
        self.votes.iter().find(|v| v.voter_id == voter_id)
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn clear(&mut self) {
        self.votes.clear();
    }

    /// Groups votes by target, ordered by each target's first appearance.
    pub fn groups(&self) -> Vec<VoteGroup<'_>> {
        let mut groups: Vec<VoteGroup<'_>> = Vec::new();
        for vote in &self.votes {
            match groups.iter_mut().find(|g| *g.target == vote.target) {
                Some(group) => group.votes.push(vote),
                None => groups.push(VoteGroup {
                    target: &vote.target,
                    votes: vec![vote],
                }),
            }
        }
        groups
    }

    /// First target, in first-appearance order, whose votes reach `threshold`.
    pub fn winner(&self, threshold: usize) -> Option<VoteTarget> {
        self.groups()
            .into_iter()
            .find(|g| g.votes.len() >= threshold)
            .map(|g| g.target.clone())
    }

    pub fn add_end_game_vote(&mut self, voter_id: &str) -> Result<usize, GameError> {
        if self.end_game_votes.iter().any(|id| id == voter_id) {
            return Err(GameError::AlreadyVoted);
        }
        self.end_game_votes.push(voter_id.to_string());
        Ok(self.end_game_votes.len())
    }

    pub fn end_game_votes(&self) -> &[String] {
        &self.end_game_votes
    }
}
