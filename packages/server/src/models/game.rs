use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    error::GameError,
    phase::GamePhase,
    roster::Roster,
    vote::{majority_threshold, Vote, VoteTally, VoteTarget},
};

/// One game of mafia bound to a chat channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Game {
    pub channel_id: String,
    pub host_id: String,
    pub phase: GamePhase,
    pub day: u32,
    pub players: Roster,
    pub votes: VoteTally,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// INIT → CONFIRMING: roles must be sent out.
    RolesSent,
    /// READY → DAY 1.
    DayStarted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LynchOutcome {
    pub target: VoteTarget,
    /// Day number after resolution.
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoteCast {
    pub replaced: Option<Vote>,
    pub lynch: Option<LynchOutcome>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EndVoteOutcome {
    Pending { votes: usize, remaining: usize },
    Passed { votes: usize },
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Game {{ channel_id: {}, host_id: {}, phase: {}, day: {}, players: {}, votes: {} }}",
            self.channel_id,
            self.host_id,
            self.phase,
            self.day,
            self.players.len(),
            self.votes.votes().len()
        )
    }
}

impl Game {
    pub fn new(channel_id: String, host_id: String) -> Self {
        Game {
            channel_id,
            host_id,
            phase: GamePhase::Init,
            day: 0,
            players: Roster::new(),
            votes: VoteTally::new(),
        }
    }

    pub fn is_host(&self, user_id: &str) -> bool {
        self.host_id == user_id
    }

    pub fn host_mention(&self) -> String {
        format!("<@{}>", self.host_id)
    }

    pub fn join(&mut self, player_id: &str, name: &str) -> Result<(), GameError> {
        self.phase.require(GamePhase::Init)?;
        self.players.join(player_id, name)
    }

    pub fn leave(&mut self, player_id: &str) -> Result<(), GameError> {
        self.phase.require(GamePhase::Init)?;
        self.players.leave(player_id).map(|_| ())
    }

    /// Host's start command: INIT → CONFIRMING, or READY → DAY 1.
    pub fn start(&mut self, user_id: &str) -> Result<StartOutcome, GameError> {
        if !self.is_host(user_id) {
            return Err(GameError::NotHost);
        }
        match self.phase {
            GamePhase::Init => {
                if self.players.is_empty() {
                    return Err(GameError::EmptyRoster);
                }
                self.transition(GamePhase::Confirming);
                Ok(StartOutcome::RolesSent)
            }
            GamePhase::Ready => {
                self.transition(GamePhase::Day);
                self.day = 1;
                Ok(StartOutcome::DayStarted)
            }
            phase => Err(GameError::WrongPhase(phase)),
        }
    }

    /// Confirms a player. Returns true when this was the last outstanding
    /// confirmation and the game moved to READY.
    pub fn confirm(&mut self, player_id: &str) -> Result<bool, GameError> {
        self.phase.require(GamePhase::Confirming)?;
        self.players.confirm(player_id)?;
        if self.players.all_confirmed() {
            self.transition(GamePhase::Ready);
            return Ok(true);
        }
        Ok(false)
    }

    pub fn majority_to_lynch(&self) -> usize {
        majority_threshold(self.players.count_alive())
    }

    /// End-game votes are counted against the whole roster, dead players included.
    pub fn majority_to_end(&self) -> usize {
        majority_threshold(self.players.len())
    }

    pub fn cast_vote(
        &mut self,
        voter_id: &str,
        target: VoteTarget,
        time: DateTime<Utc>,
    ) -> Result<VoteCast, GameError> {
        self.phase.require(GamePhase::Day)?;
        if !self.players.is_alive(voter_id) {
            return Err(GameError::NotEligible);
        }
        if let VoteTarget::Player(target_id) = &target {
            let player = self
                .players
                .get(target_id)
                .ok_or_else(|| GameError::InvalidTarget(target_id.clone()))?;
            if !player.alive {
                return Err(GameError::DeadTarget);
            }
            if player.id == voter_id {
                return Err(GameError::SelfVote);
            }
        }

        let replaced = self.votes.upsert(voter_id, target, time);
        let lynch = self.resolve_lynch();
        Ok(VoteCast { replaced, lynch })
    }

    pub fn unvote(&mut self, voter_id: &str) -> Result<Option<Vote>, GameError> {
        self.phase.require(GamePhase::Day)?;
        if !self.players.is_alive(voter_id) {
            return Err(GameError::NotEligible);
        }
        Ok(self.votes.remove(voter_id))
    }

    /// Fires when some target holds a majority of the alive players' votes.
    fn resolve_lynch(&mut self) -> Option<LynchOutcome> {
        let target = self.votes.winner(self.majority_to_lynch())?;
        if let VoteTarget::Player(id) = &target {
            self.players.kill(id);
        }
        // DAY loops back to DAY; NIGHT is never entered.
        self.day += 1;
        self.votes.clear();
        info!(
            "Lynch resolved in {}: {} (now day {})",
            self.channel_id, target, self.day
        );
        Some(LynchOutcome {
            target,
            day: self.day,
        })
    }

    pub fn vote_to_end(&mut self, voter_id: &str) -> Result<EndVoteOutcome, GameError> {
        if !self.players.contains(voter_id) {
            return Err(GameError::NotJoined);
        }
        let votes = self.votes.add_end_game_vote(voter_id)?;
        let remaining = self.majority_to_end().saturating_sub(votes);
        if remaining == 0 {
            Ok(EndVoteOutcome::Passed { votes })
        } else {
            Ok(EndVoteOutcome::Pending { votes, remaining })
        }
    }

    fn transition(&mut self, to: GamePhase) {
        info!("Game in {}: {} -> {}", self.channel_id, self.phase, to);
        self.phase = to;
    }
}
