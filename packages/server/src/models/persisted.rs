use serde::{Deserialize, Serialize};

use super::{game::Game, message::OutboundMessage};

/// Private channel opened between the bot and a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PmChannel {
    pub player_id: String,
    pub channel_id: String,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersistedData {
    #[serde(default)]
    pub channels_activated: Vec<String>,
    #[serde(default)]
    pub pm_channels: Vec<PmChannel>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub sync_messages: Vec<OutboundMessage>,
}
