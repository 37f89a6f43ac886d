//! Cross-crate flows. Every engine here talks to the others only through
//! `InMemoryEventBus`.

pub mod choreography;
pub mod consensus_flows;
pub mod conflict_flows;
