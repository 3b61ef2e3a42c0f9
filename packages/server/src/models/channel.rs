use super::persisted::PmChannel;

/// Activated channels and the private channels linked to each player.
#[derive(Debug, Clone, Default)]
pub struct ChannelDirectory {
    activated: Vec<String>,
    pm_channels: Vec<PmChannel>,
}

impl ChannelDirectory {
    pub fn new(activated: Vec<String>, pm_channels: Vec<PmChannel>) -> Self {
        Self {
            activated,
            pm_channels,
        }
    }

    pub fn is_activated(&self, channel_id: &str) -> bool {
        self.activated.iter().any(|id| id == channel_id)
    }

    /// Returns false if the channel was already activated.
    pub fn activate(&mut self, channel_id: &str) -> bool {
        if self.is_activated(channel_id) {
            return false;
        }
        self.activated.push(channel_id.to_string());
        true
    }

    /// Returns false if the channel was not activated.
    pub fn deactivate(&mut self, channel_id: &str) -> bool {
        let before = self.activated.len();
        self.activated.retain(|id| id != channel_id);
        self.activated.len() != before
    }

    pub fn pm_channel(&self, player_id: &str) -> Option<&str> {
        self.pm_channels
            .iter()
            .find(|pm| pm.player_id == player_id)
            .map(|pm| pm.channel_id.as_str())
    }

    /// Links the first private channel seen for a player. Returns false if one was already linked.
    pub fn link_pm(&mut self, player_id: &str, channel_id: &str) -> bool {
        if self.pm_channel(player_id).is_some() {
            return false;
        }
        self.pm_channels.push(PmChannel {
            player_id: player_id.to_string(),
            channel_id: channel_id.to_string(),
        });
        true
    }

    pub fn activated(&self) -> &[String] {
        &self.activated
    }

    pub fn pm_channels(&self) -> &[PmChannel] {
        &self.pm_channels
    }
}
