use futures::future::{self, BoxFuture, FutureExt};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use crate::models::config::BotConfig;
use crate::models::message::{InboundMessage, OutboundMessage};
use crate::models::persisted::PersistedData;
use crate::services::delivery::{DeliveryError, MessageDelivery};
use crate::services::store::MemoryStore;
use crate::state::AppState;

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryMode {
    /// Acknowledge every message straight away.
    Ack,
    /// Answer every message with an error.
    Fail,
    /// Never acknowledge.
    Hang,
}

/// Delivery double that remembers every message handed to it.
#[derive(Clone)]
pub struct RecordingDelivery {
    mode: DeliveryMode,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
}

impl RecordingDelivery {
    pub fn new(mode: DeliveryMode) -> Self {
        Self {
            mode,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn into_delivery(self) -> Arc<dyn MessageDelivery> {
        Arc::new(self)
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    pub fn contents(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.content).collect()
    }

    pub fn channels(&self) -> Vec<String> {
        self.messages().into_iter().map(|m| m.channel_id).collect()
    }
}

impl MessageDelivery for RecordingDelivery {
    fn deliver(&self, message: OutboundMessage) -> BoxFuture<'static, Result<(), DeliveryError>> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
        match self.mode {
            DeliveryMode::Ack => future::ready(Ok(())).boxed(),
            DeliveryMode::Fail => future::ready(Err(DeliveryError::Rejected(500))).boxed(),
            DeliveryMode::Hang => future::pending::<Result<(), DeliveryError>>().boxed(),
        }
    }
}

pub const TEST_ADMIN: &str = "admin";

pub fn test_config() -> BotConfig {
    BotConfig {
        admins: vec![TEST_ADMIN.to_string()],
        sync_message_timeout: Duration::from_millis(500),
        ..BotConfig::default()
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub delivery: RecordingDelivery,
    pub store: Arc<MemoryStore>,
}

/// State backed by an in-memory store and an acknowledging delivery double.
pub fn test_state() -> TestHarness {
    test_state_with(PersistedData::default())
}

pub fn test_state_with(data: PersistedData) -> TestHarness {
    setup_test_env();
    let delivery = RecordingDelivery::new(DeliveryMode::Ack);
    let store = Arc::new(MemoryStore::with_data(data));
    let state = AppState::new(test_config(), store.clone(), delivery.clone().into_delivery());
    TestHarness {
        state,
        delivery,
        store,
    }
}

pub fn message(channel_id: &str, author_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        channel_id: channel_id.to_string(),
        author_id: author_id.to_string(),
        author_name: format!("Player{}", author_id),
        content: content.to_string(),
        is_private: false,
    }
}

pub fn private_message(channel_id: &str, author_id: &str, content: &str) -> InboundMessage {
    InboundMessage {
        is_private: true,
        ..message(channel_id, author_id, content)
    }
}
