//! # Shared Bus - Arbitration Event Bus
//!
//! Lifecycle events emitted by the consensus engine and the conflict
//! resolver, published to any number of in-process listeners.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Consensus (ar-01)│    publish()       │ Logging/learning │
//! │ Resolver  (ar-02)│ ──────┐            │    listeners     │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐           │
//!                      │  Event Bus   │ ──────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery
//!
//! Publishing is fire-and-forget. An event with no subscribers is dropped,
//! and a slow subscriber only loses its own backlog; neither outcome is
//! visible to the engine that published.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{ArbitrationEvent, EngineId, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Engine id of the consensus engine.
pub const CONSENSUS_ENGINE: EngineId = 1;

/// Engine id of the conflict resolver.
pub const CONFLICT_RESOLVER: EngineId = 2;

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
