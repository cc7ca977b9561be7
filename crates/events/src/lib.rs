//! Session events and in-process distribution.
//!
//! Registry and ledger commands produce events; the session applies them and
//! fans them out to any subscribers (renderers, tests) through an [`EventBus`].

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::InMemoryEventBus;
