use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::GameError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum GamePhase {
    Init,       // waiting for players to join
    Confirming, // roles sent, waiting for every player to confirm
    Ready,      // everyone confirmed, waiting for the host
    Day,        // voting
    Night,      // declared for display; no transition enters it yet
}

impl GamePhase {
    pub fn description(&self) -> &'static str {
        match self {
            GamePhase::Init => "Waiting for players",
            GamePhase::Confirming => "Waiting for confirmation from players",
            GamePhase::Ready => "Waiting for host to start game",
            GamePhase::Day => "Daytime, waiting for votes",
            GamePhase::Night => "Nighttime, waiting for actions",
        }
    }

    /// Fails with `WrongPhase` unless `self` is `expected`.
    pub fn require(self, expected: GamePhase) -> Result<(), GameError> {
        if self == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase(self))
        }
    }

    pub fn accepts_roster_changes(&self) -> bool {
        *self == GamePhase::Init
    }

    pub fn accepts_confirmations(&self) -> bool {
        *self == GamePhase::Confirming
    }

    pub fn accepts_votes(&self) -> bool {
        *self == GamePhase::Day
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamePhase::Init => write!(f, "INIT"),
            GamePhase::Confirming => write!(f, "CONFIRMING"),
            GamePhase::Ready => write!(f, "READY"),
            GamePhase::Day => write!(f, "DAY"),
            GamePhase::Night => write!(f, "NIGHT"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_day_accepts_votes() {
        for phase in [
            GamePhase::Init,
            GamePhase::Confirming,
            GamePhase::Ready,
            GamePhase::Night,
        ] {
            assert!(!phase.accepts_votes());
            assert_eq!(
                phase.require(GamePhase::Day),
                Err(GameError::WrongPhase(phase))
            );
        }
        assert!(GamePhase::Day.accepts_votes());
        assert!(GamePhase::Day.require(GamePhase::Day).is_ok());
    }

    #[test]
    fn roster_changes_and_confirmations_are_gated() {
        assert!(GamePhase::Init.accepts_roster_changes());
        assert!(!GamePhase::Confirming.accepts_roster_changes());
        assert!(GamePhase::Confirming.accepts_confirmations());
        assert!(!GamePhase::Ready.accepts_confirmations());
    }
}
