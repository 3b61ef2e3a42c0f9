use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::channel::ChannelDirectory;
use crate::models::config::BotConfig;
use crate::models::persisted::PersistedData;
use crate::services::delivery::MessageDelivery;
use crate::services::message_queue::OutboundMessageQueue;
use crate::services::session_registry::SessionRegistry;
use crate::services::store::StateStore;

/// Shared bot state. Handlers lock `channels`, then `sessions`, then `outbound`,
/// never in another order.
#[derive(Clone)]
pub struct AppState {
    pub channels: Arc<Mutex<ChannelDirectory>>,
    pub sessions: Arc<Mutex<SessionRegistry>>,
    pub outbound: Arc<Mutex<OutboundMessageQueue>>,
    pub config: Arc<BotConfig>,
    pub store: Arc<dyn StateStore>,
    pub delivery: Arc<dyn MessageDelivery>,
}

impl AppState {
    /// Builds the state from whatever `store` holds. A store that fails to load is
    /// logged and the bot starts empty.
    pub fn new(
        config: BotConfig,
        store: Arc<dyn StateStore>,
        delivery: Arc<dyn MessageDelivery>,
    ) -> Self {
        let data = match store.load() {
            Ok(Some(data)) => {
                info!(
                    "Restored {} games and {} pending messages",
                    data.games.len(),
                    data.sync_messages.len()
                );
                data
            }
            Ok(None) => PersistedData::default(),
            Err(e) => {
                error!("Failed to load saved state, starting empty: {}", e);
                PersistedData::default()
            }
        };

        AppState {
            channels: Arc::new(Mutex::new(ChannelDirectory::new(
                data.channels_activated,
                data.pm_channels,
            ))),
            sessions: Arc::new(Mutex::new(SessionRegistry::from_games(data.games))),
            outbound: Arc::new(Mutex::new(OutboundMessageQueue::with_pending(
                config.sync_message_timeout,
                data.sync_messages,
            ))),
            config: Arc::new(config),
            store,
            delivery,
        }
    }

    pub async fn snapshot(&self) -> PersistedData {
        let channels = self.channels.lock().await;
        let sessions = self.sessions.lock().await;
        let outbound = self.outbound.lock().await;
        snapshot_of(&channels, &sessions, &outbound)
    }

    pub async fn persist(&self) {
        let data = self.snapshot().await;
        save_or_log(self.store.as_ref(), &data);
    }
}

pub fn snapshot_of(
    channels: &ChannelDirectory,
    sessions: &SessionRegistry,
    outbound: &OutboundMessageQueue,
) -> PersistedData {
    PersistedData {
        channels_activated: channels.activated().to_vec(),
        pm_channels: channels.pm_channels().to_vec(),
        games: sessions.snapshot(),
        sync_messages: outbound.pending().cloned().collect(),
    }
}

/// Persistence failures never stop the bot.
pub fn save_or_log(store: &dyn StateStore, data: &PersistedData) {
    if let Err(e) = store.save(data) {
        error!("Failed to save state: {}", e);
    }
}
