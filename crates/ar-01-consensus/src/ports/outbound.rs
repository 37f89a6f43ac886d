//! Driven ports (Outbound dependencies)
//!
//! The only outbound dependency is the event bus. Any `EventPublisher`
//! works; tests use `InMemoryEventBus` or a counting mock.

pub use shared_bus::EventPublisher;
