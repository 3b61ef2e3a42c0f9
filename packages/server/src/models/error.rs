use super::phase::GamePhase;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error("a game is already running in this channel")]
    AlreadyExists,
    #[error("no game is running in this channel")]
    NoSession,
    #[error("player is already in the game")]
    AlreadyJoined,
    #[error("player is not in the game")]
    NotJoined,
    #[error("command is not accepted during {0:?}")]
    WrongPhase(GamePhase),
    #[error("only the host can do that")]
    NotHost,
    #[error("the game has no players")]
    EmptyRoster,
    #[error("voter must be an alive player")]
    NotEligible,
    #[error("'{0}' is not a valid vote target")]
    InvalidTarget(String),
    #[error("players cannot vote for themselves")]
    SelfVote,
    #[error("cannot vote for a dead player")]
    DeadTarget,
    #[error("player already voted to end the game")]
    AlreadyVoted,
}
