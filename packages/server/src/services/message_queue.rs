use log::{debug, warn};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use super::delivery::MessageDelivery;
use crate::models::message::OutboundMessage;

struct InFlight {
    message_id: Uuid,
    sent_at: Instant,
    handle: JoinHandle<()>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing pending.
    Idle,
    /// A message is still waiting for its acknowledgment.
    Busy,
    Sent(Uuid),
}

/// Process-wide FIFO of notifications. Only one message is in flight at a time;
/// an unacknowledged send is abandoned after `send_timeout` and never retried.
pub struct OutboundMessageQueue {
    pending: VecDeque<OutboundMessage>,
    in_flight: Option<InFlight>,
    send_timeout: Duration,
}

impl OutboundMessageQueue {
    pub fn new(send_timeout: Duration) -> Self {
        Self::with_pending(send_timeout, Vec::new())
    }

    pub fn with_pending(send_timeout: Duration, pending: Vec<OutboundMessage>) -> Self {
        OutboundMessageQueue {
            pending: pending.into(),
            in_flight: None,
            send_timeout,
        }
    }

    pub fn enqueue(&mut self, message: OutboundMessage) {
        self.pending.push_back(message);
    }

    pub fn push(&mut self, channel_id: &str, content: impl Into<String>) {
        self.enqueue(OutboundMessage::new(channel_id, content));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.in_flight.is_none()
    }

    pub fn pending(&self) -> impl Iterator<Item = &OutboundMessage> {
        self.pending.iter()
    }

    /// Clears the in-flight slot once its delivery finished or timed out.
    fn settle(&mut self) {
        let Some(in_flight) = &self.in_flight else {
            return;
        };
        if in_flight.handle.is_finished() {
            self.in_flight = None;
        } else if in_flight.sent_at.elapsed() >= self.send_timeout {
            warn!(
                "Outbound message {} not acknowledged within {:?}, moving on",
                in_flight.message_id, self.send_timeout
            );
            in_flight.handle.abort();
            self.in_flight = None;
        }
    }

    /// Sends the head of the queue if nothing is in flight. Must run inside a tokio runtime.
    pub fn tick(&mut self, delivery: &Arc<dyn MessageDelivery>) -> TickOutcome {
        self.settle();
        if self.in_flight.is_some() {
            return TickOutcome::Busy;
        }
        let Some(message) = self.pending.pop_front() else {
            return TickOutcome::Idle;
        };

        let message_id = message.message_id;
        debug!("Sending outbound message {} to {}", message_id, message.channel_id);
        let send = delivery.deliver(message);
        let handle = tokio::spawn(async move {
            match send.await {
                Ok(()) => debug!("Outbound message {} acknowledged", message_id),
                Err(e) => warn!("Outbound message {} failed: {}", message_id, e),
            }
        });
        self.in_flight = Some(InFlight {
            message_id,
            sent_at: Instant::now(),
            handle,
        });
        TickOutcome::Sent(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_setup::{DeliveryMode, RecordingDelivery};

    const TIMEOUT: Duration = Duration::from_millis(500);

    fn queue_with(contents: &[&str]) -> OutboundMessageQueue {
        let mut queue = OutboundMessageQueue::new(TIMEOUT);
        for content in contents {
            queue.push("chan", *content);
        }
        queue
    }

    async fn let_tasks_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_one_message_in_flight() {
        let recorder = RecordingDelivery::new(DeliveryMode::Hang);
        let delivery = recorder.clone().into_delivery();
        let mut queue = queue_with(&["a", "b"]);

        assert!(matches!(queue.tick(&delivery), TickOutcome::Sent(_)));
        assert!(!queue.is_ready());
        assert_eq!(queue.tick(&delivery), TickOutcome::Busy);
        assert_eq!(recorder.contents(), vec!["a"]);
        assert_eq!(queue.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn acknowledgment_frees_the_queue_in_fifo_order() {
        let recorder = RecordingDelivery::new(DeliveryMode::Ack);
        let delivery = recorder.clone().into_delivery();
        let mut queue = OutboundMessageQueue::new(TIMEOUT);
        queue.push("chan-1", "first");
        queue.push("chan-2", "second");
        queue.push("chan-1", "third");

        for _ in 0..3 {
            assert!(matches!(queue.tick(&delivery), TickOutcome::Sent(_)));
            let_tasks_run().await;
        }
        assert_eq!(queue.tick(&delivery), TickOutcome::Idle);
        assert!(queue.is_ready());
        assert_eq!(recorder.contents(), vec!["first", "second", "third"]);
        assert_eq!(
            recorder.channels(),
            vec!["chan-1", "chan-2", "chan-1"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_moves_on_without_resending() {
        let recorder = RecordingDelivery::new(DeliveryMode::Hang);
        let delivery = recorder.clone().into_delivery();
        let mut queue = queue_with(&["a", "b"]);

        queue.tick(&delivery);
        tokio::time::advance(TIMEOUT - Duration::from_millis(1)).await;
        assert_eq!(queue.tick(&delivery), TickOutcome::Busy);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(matches!(queue.tick(&delivery), TickOutcome::Sent(_)));
        assert_eq!(recorder.contents(), vec!["a", "b"]);
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_delivery_is_not_retried() {
        let recorder = RecordingDelivery::new(DeliveryMode::Fail);
        let delivery = recorder.clone().into_delivery();
        let mut queue = queue_with(&["a"]);

        queue.tick(&delivery);
        let_tasks_run().await;
        assert_eq!(queue.tick(&delivery), TickOutcome::Idle);
        assert_eq!(recorder.contents(), vec!["a"]);
    }

    #[test]
    fn restored_messages_keep_their_order() {
        let messages = vec![
            OutboundMessage::new("chan", "one"),
            OutboundMessage::new("chan", "two"),
        ];
        let queue = OutboundMessageQueue::with_pending(TIMEOUT, messages.clone());
        let pending: Vec<_> = queue.pending().cloned().collect();
        assert_eq!(pending, messages);
        assert!(queue.is_ready());
    }
}
