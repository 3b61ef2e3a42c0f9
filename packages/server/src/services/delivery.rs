use futures::future::BoxFuture;
use reqwest::Client;

use crate::models::message::OutboundMessage;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("delivery request failed: {0}")]
    RequestFailed(String),
    #[error("delivery endpoint answered {0}")]
    Rejected(u16),
}

/// Hands an outbound message to the chat platform. The returned future resolves
/// once the platform has acknowledged the send.
pub trait MessageDelivery: Send + Sync {
    fn deliver(&self, message: OutboundMessage) -> BoxFuture<'static, Result<(), DeliveryError>>;
}

/// Posts each message as JSON to the platform adapter.
#[derive(Clone)]
pub struct HttpDelivery {
    client: Client,
    url: String,
}

impl HttpDelivery {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

impl MessageDelivery for HttpDelivery {
    fn deliver(&self, message: OutboundMessage) -> BoxFuture<'static, Result<(), DeliveryError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let response = client
                .post(&url)
                .json(&message)
                .send()
                .await
                .map_err(|e| DeliveryError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(DeliveryError::Rejected(status.as_u16()));
            }
            Ok(())
        })
    }
}
