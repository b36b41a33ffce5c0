//! Per-subject realtime fan-out.
//!
//! Every subject with subscribers owns a bounded broadcast channel. Publishing
//! never waits on subscribers: a subscriber that falls more than the buffer
//! size behind loses the oldest events and learns how many on its next
//! receive. A subject's channel goes away with its last subscription.

use chrono::Utc;
use dashmap::DashMap;
use futures::stream::{self, Stream};
use geotrack_core::config::MAX_SUBSCRIBER_BUFFER;
use geotrack_core::models::{DispatchEvent, EventPayload, Subject};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use uuid::Uuid;

/// Default per-subscriber buffer
pub const DEFAULT_BUFFER: usize = 256;

type Channels = DashMap<Subject, broadcast::Sender<DispatchEvent>>;

/// Outcome of a receive on a subscription
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Event(DispatchEvent),
    /// The subscriber fell behind and this many events were dropped
    Lagged(u64),
}

/// Subject-keyed publish/subscribe hub
#[derive(Debug)]
pub struct Dispatcher {
    channels: Arc<Channels>,
    buffer: usize,
}

impl Dispatcher {
    /// `buffer` is clamped to `1..=MAX_SUBSCRIBER_BUFFER`
    pub fn new(buffer: usize) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            buffer: buffer.clamp(1, MAX_SUBSCRIBER_BUFFER),
        }
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Publish to every current subscriber of `subject`, returning how many received it
    pub fn publish(&self, subject: &Subject, payload: EventPayload) -> usize {
        let Some(sender) = self.channels.get(subject) else {
            return 0;
        };
        let event = DispatchEvent {
            subject: subject.clone(),
            published_at: Utc::now(),
            payload,
        };
        // Err only means every receiver went away between lookup and send
        sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, subject: Subject) -> Subscription {
        // The entry guard is held while subscribing, so a concurrent drop
        // of the last subscription cannot remove the channel underneath us
        let receiver = self
            .channels
            .entry(subject.clone())
            .or_insert_with(|| broadcast::channel(self.buffer).0)
            .subscribe();

        let subscription = Subscription {
            id: Uuid::new_v4(),
            subject,
            receiver: Some(receiver),
            missed: 0,
            channels: Arc::downgrade(&self.channels),
        };
        tracing::debug!(subject = %subscription.subject, id = %subscription.id, "Subscribed");
        subscription
    }

    /// End a subscription. Dropping it has the same effect.
    pub fn unsubscribe(&self, subscription: Subscription) {
        drop(subscription);
    }

    pub fn subscriber_count(&self, subject: &Subject) -> usize {
        self.channels
            .get(subject)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Number of subjects that currently have a channel
    pub fn subject_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER)
    }
}

/// A subscriber's view of one subject
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    subject: Subject,
    /// Always `Some` until the subscription is dropped
    receiver: Option<broadcast::Receiver<DispatchEvent>>,
    missed: u64,
    channels: Weak<Channels>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// True once any event was dropped for this subscriber
    pub fn is_lagging(&self) -> bool {
        self.missed > 0
    }

    /// Total events dropped for this subscriber
    pub fn missed_events(&self) -> u64 {
        self.missed
    }

    /// Wait for the next event, `None` once the subject's channel is gone
    pub async fn recv(&mut self) -> Option<Received> {
        let result = self.receiver.as_mut()?.recv().await;
        match result {
            Ok(event) => Some(Received::Event(event)),
            Err(RecvError::Lagged(n)) => Some(self.lagged(n)),
            Err(RecvError::Closed) => None,
        }
    }

    /// Next event if one is already buffered
    pub fn try_recv(&mut self) -> Option<Received> {
        let result = self.receiver.as_mut()?.try_recv();
        match result {
            Ok(event) => Some(Received::Event(event)),
            Err(TryRecvError::Lagged(n)) => Some(self.lagged(n)),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => None,
        }
    }

    fn lagged(&mut self, n: u64) -> Received {
        self.missed += n;
        tracing::warn!(subject = %self.subject, id = %self.id, dropped = n, "Subscriber lagging");
        Received::Lagged(n)
    }

    /// Consume the subscription as a stream of receives
    pub fn into_stream(self) -> impl Stream<Item = Received> {
        stream::unfold(self, |mut subscription| async move {
            subscription
                .recv()
                .await
                .map(|received| (received, subscription))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Release our receiver first so concurrent drops cannot both see a peer
        drop(self.receiver.take());
        if let Some(channels) = self.channels.upgrade() {
            channels.remove_if(&self.subject, |_, sender| sender.receiver_count() == 0);
        }
        tracing::debug!(
            subject = %self.subject,
            id = %self.id,
            missed = self.missed,
            "Unsubscribed"
        );
    }
}
