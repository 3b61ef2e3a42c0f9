pub mod channel;
pub mod command;
pub mod config;
pub mod error;
pub mod game;
pub mod message;
pub mod persisted;
pub mod phase;
pub mod player;
pub mod roster;
pub mod vote;
