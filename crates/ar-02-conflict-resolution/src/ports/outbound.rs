//! Driven ports (Outbound dependencies)

pub use shared_bus::EventPublisher;
