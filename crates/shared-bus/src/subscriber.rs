//! # Event Subscriber
//!
//! Defines the subscription side of the event bus.

use crate::events::{ArbitrationEvent, EventFilter};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Trait for subscribing to events from the bus.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Keeps the bus's per-filter subscription count accurate.
pub(crate) struct SubscriptionTracker {
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    key: String,
}

impl SubscriptionTracker {
    pub(crate) fn new(subscriptions: Arc<RwLock<HashMap<String, usize>>>, key: String) -> Self {
        Self { subscriptions, key }
    }
}

impl Drop for SubscriptionTracker {
    fn drop(&mut self) {
        let mut subs = self.subscriptions.write();
        if let Some(count) = subs.get_mut(&self.key) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                subs.remove(&self.key);
            }
        }
        debug!(filter = %self.key, "Subscription dropped");
    }
}

/// A subscription handle for receiving events.
///
/// Dropping it releases the underlying receiver.
pub struct Subscription {
    receiver: broadcast::Receiver<ArbitrationEvent>,
    filter: EventFilter,
    tracker: SubscriptionTracker,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<ArbitrationEvent>,
        filter: EventFilter,
        tracker: SubscriptionTracker,
    ) -> Self {
        Self {
            receiver,
            filter,
            tracker,
        }
    }

    /// Receive the next matching event; `None` once the bus is dropped.
    pub async fn recv(&mut self) -> Option<ArbitrationEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                }
            }
        }
    }

    /// Receive the next matching event without waiting.
    pub fn try_recv(&mut self) -> Result<Option<ArbitrationEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            }
        }
    }

    /// Every matching event currently buffered.
    pub fn drain(&mut self) -> Vec<ArbitrationEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Convert into a `Stream` of matching events.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            _tracker: self.tracker,
        }
    }
}

/// A `tokio_stream::Stream` over matching events.
pub struct EventStream {
    inner: BroadcastStream<ArbitrationEvent>,
    filter: EventFilter,
    _tracker: SubscriptionTracker,
}

impl EventStream {
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Stream for EventStream {
    type Item = ArbitrationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if self.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Event stream lagged, some events dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
